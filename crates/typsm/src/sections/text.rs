// this_file: crates/typsm/src/sections/text.rs

use std::any::Any;

use typsm_core::error::Result;
use typsm_core::resolver::{AutofillScope, ResolverTable};
use typsm_core::section::{invalid_setting, Autofill, DrawContext, Environment, Section, SectionSettings};
use typsm_core::traits::Canvas;
use typsm_core::tree::SettingsTree;
use typsm_core::value::{Setting, Value};

use super::{collection, glyphs_for, Column};

pub const TEXT_SECTION: &str = "text";

/// Pangrams by script name, tried in the order a collection covers scripts
const PANGRAMS: &[(&str, &str)] = &[
    ("Latin", "The quick brown fox jumps over the lazy dog"),
    ("Cyrillic", "Съешь же ещё этих мягких французских булок"),
    ("Greek", "Ξεσκεπάζω την ψυχοφθόρα βδελυγμία"),
];

const LABEL_SIZE: f32 = 8.0;

/// The same sample in every font of the collection, at each size
#[derive(Default)]
pub struct TextSection {
    settings: SectionSettings,
    sample: String,
    sizes: Vec<f32>,
    label: bool,
}

impl TextSection {
    /// A pangram for the best covered script with one, else the Latin one
    fn resolve_sample(&mut self, scope: &AutofillScope<'_>) -> Result<Value> {
        let coverage = collection(scope)?.script_support();
        let sample = coverage
            .iter()
            .find_map(|(script, _)| {
                PANGRAMS
                    .iter()
                    .find(|(name, _)| script.as_str() == *name)
                    .map(|(_, pangram)| *pangram)
            })
            .unwrap_or(PANGRAMS[0].1);
        Ok(Value::from(sample))
    }

    pub fn sample(&self) -> &str {
        &self.sample
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }
}

impl Section for TextSection {
    fn name(&self) -> &'static str {
        TEXT_SECTION
    }

    fn settings(&self) -> &SectionSettings {
        &self.settings
    }

    fn draw_page(&self, canvas: &mut dyn Canvas, ctx: &DrawContext<'_>) -> Result<()> {
        let mut column = Column::new_page(canvas);
        for font in ctx.fonts.fonts() {
            if self.label {
                let origin = column.line(canvas, LABEL_SIZE * 2.0);
                canvas.text(&font.full_name(), origin, LABEL_SIZE)?;
            }
            let glyphs = glyphs_for(font.as_ref(), &self.sample);
            for size in &self.sizes {
                let origin = column.line(canvas, size * 1.3);
                canvas.glyph_run(font.as_ref(), &glyphs, origin, *size)?;
            }
            column.skip(12.0);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Autofill for TextSection {
    fn defaults() -> SettingsTree {
        SettingsTree::new()
            .with("sample", Setting::Fill)
            .with("sizes", Value::from(vec![10, 14, 24]))
            .with("label", true)
    }

    fn resolvers() -> ResolverTable<Self> {
        ResolverTable::new().with(&["sample"], Self::resolve_sample)
    }

    fn settings_mut(&mut self) -> &mut SectionSettings {
        &mut self.settings
    }

    fn did_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        let resolved = &self.settings.resolved;
        self.sample = resolved
            .get_str(&["sample"])
            .ok_or_else(|| invalid_setting(TEXT_SECTION, "sample", "expected a string"))?
            .to_string();
        self.label = resolved
            .get_bool(&["label"])
            .ok_or_else(|| invalid_setting(TEXT_SECTION, "label", "expected true or false"))?;

        let invalid = || invalid_setting(TEXT_SECTION, "sizes", "expected a list of positive numbers");
        let sizes = resolved.get_list(&["sizes"]).ok_or_else(invalid)?;
        self.sizes = sizes
            .iter()
            .map(|size| size.as_f64().filter(|s| *s > 0.0).map(|s| s as f32))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        Ok(())
    }
}
