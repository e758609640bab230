// this_file: crates/typsm/src/sections/glyphs.rs

use std::any::Any;
use std::collections::HashMap;

use typsm_core::error::{Result, SettingsError};
use typsm_core::resolver::{AutofillScope, ResolverTable};
use typsm_core::section::{invalid_setting, Autofill, DrawContext, Environment, Section, SectionSettings};
use typsm_core::traits::{Canvas, GlyphId, Point};
use typsm_core::tree::SettingsTree;
use typsm_core::value::{Setting, Value};
use typsm_core::FONT_COLLECTION;
use typsm_unicode::{CATEGORY_QUERIES, OTHER_CATEGORY};

use super::{collection, Column, MARGIN};

pub const GLYPHS_SECTION: &str = "glyphs";

const LABEL_SIZE: f32 = 9.0;

/// The glyph set of one font, grid by grid in category order
#[derive(Default)]
pub struct GlyphsSection {
    settings: SectionSettings,
    font: String,
    glyph_size: f32,
    columns: usize,
    categories: Vec<String>,
}

impl GlyphsSection {
    fn resolve_font(&mut self, scope: &AutofillScope<'_>) -> Result<Value> {
        let fonts = collection(scope)?;
        let first = fonts.first().ok_or(SettingsError::MissingFontCollection(FONT_COLLECTION))?;
        Ok(Value::from(first.full_name()))
    }

    fn resolve_categories(&mut self, _scope: &AutofillScope<'_>) -> Result<Value> {
        let names: Vec<&str> = CATEGORY_QUERIES
            .iter()
            .map(|(name, _)| *name)
            .chain(std::iter::once(OTHER_CATEGORY))
            .collect();
        Ok(Value::from(names))
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    /// Categories shown, in display order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

impl Section for GlyphsSection {
    fn name(&self) -> &'static str {
        GLYPHS_SECTION
    }

    fn settings(&self) -> &SectionSettings {
        &self.settings
    }

    fn draw_page(&self, canvas: &mut dyn Canvas, ctx: &DrawContext<'_>) -> Result<()> {
        let face = ctx
            .fonts
            .font_by_family_style(&self.font)
            .ok_or(SettingsError::MissingFontCollection(FONT_COLLECTION))?;
        let (width, _) = canvas.page_size();
        let cell = (width - 2.0 * MARGIN) / self.columns as f32;
        let row_height = (self.glyph_size * 1.5).max(cell * 0.5);

        let order = face.glyph_order();
        let glyph_ids: HashMap<&str, GlyphId> = order
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index as GlyphId))
            .collect();

        let mut column = Column::new_page(canvas);
        let origin = column.line(canvas, 20.0);
        canvas.text(&format!("Glyph Set: {}", face.full_name()), origin, 14.0)?;

        for (category, names) in ctx.classifier.categorize(face.as_ref()) {
            if !self.categories.contains(&category) {
                continue;
            }
            column.skip(LABEL_SIZE);
            let origin = column.line(canvas, LABEL_SIZE * 1.6);
            canvas.text(&format!("{category} ({})", names.len()), origin, LABEL_SIZE)?;

            for row in names.chunks(self.columns) {
                let origin = column.line(canvas, row_height);
                for (index, name) in row.iter().enumerate() {
                    let Some(&glyph_id) = glyph_ids.get(name.as_str()) else {
                        log::debug!("{}: no glyph named {name}", face.full_name());
                        continue;
                    };
                    let x = origin.x + index as f32 * cell;
                    canvas.glyph_run(face.as_ref(), &[glyph_id], Point::new(x, origin.y), self.glyph_size)?;
                }
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Autofill for GlyphsSection {
    fn defaults() -> SettingsTree {
        SettingsTree::new()
            .with("font", Setting::Auto)
            .with("glyph_size", 24)
            .with("columns", 12)
            .with("categories", Setting::Auto)
    }

    fn resolvers() -> ResolverTable<Self> {
        ResolverTable::new()
            .with(&["font"], Self::resolve_font)
            .with(&["categories"], Self::resolve_categories)
    }

    fn settings_mut(&mut self) -> &mut SectionSettings {
        &mut self.settings
    }

    fn did_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        let resolved = &self.settings.resolved;
        self.font = resolved
            .get_str(&["font"])
            .ok_or_else(|| invalid_setting(GLYPHS_SECTION, "font", "expected a font name"))?
            .to_string();
        self.glyph_size = resolved
            .get_f64(&["glyph_size"])
            .filter(|size| *size > 0.0)
            .ok_or_else(|| invalid_setting(GLYPHS_SECTION, "glyph_size", "expected a positive number"))?
            as f32;
        self.columns = resolved
            .get_value(&["columns"])
            .and_then(Value::as_i64)
            .filter(|columns| *columns > 0)
            .ok_or_else(|| invalid_setting(GLYPHS_SECTION, "columns", "expected a positive integer"))?
            as usize;
        self.categories = resolved
            .get_string_list(&["categories"])
            .ok_or_else(|| invalid_setting(GLYPHS_SECTION, "categories", "expected a list of names"))?;
        Ok(())
    }
}
