// this_file: crates/typsm/src/sections/title.rs

use std::any::Any;

use typsm_core::error::Result;
use typsm_core::resolver::{AutofillScope, ResolverTable};
use typsm_core::section::{invalid_setting, Autofill, DrawContext, Environment, Section, SectionSettings};
use typsm_core::traits::{Canvas, Point};
use typsm_core::tree::SettingsTree;
use typsm_core::value::{Setting, Value};

use super::{collection, glyphs_for, MARGIN};

pub const TITLE_SECTION: &str = "title";

/// Cover page: collection title, every style set in itself, copyrights
#[derive(Default)]
pub struct TitleSection {
    settings: SectionSettings,
    title: String,
    subtitle: String,
    show_copyright: bool,
}

impl TitleSection {
    fn resolve_title(&mut self, scope: &AutofillScope<'_>) -> Result<Value> {
        let fonts = collection(scope)?;
        Ok(Value::from(fonts.common_family_names().join(" / ")))
    }
}

impl Section for TitleSection {
    fn name(&self) -> &'static str {
        TITLE_SECTION
    }

    fn settings(&self) -> &SectionSettings {
        &self.settings
    }

    fn draw_page(&self, canvas: &mut dyn Canvas, ctx: &DrawContext<'_>) -> Result<()> {
        canvas.new_page();
        let (width, height) = canvas.page_size();

        let mut y = height * 0.3;
        canvas.text(&self.title, Point::new(MARGIN, y), 36.0)?;
        if !self.subtitle.is_empty() {
            y += 28.0;
            canvas.text(&self.subtitle, Point::new(MARGIN, y), 14.0)?;
        }

        y += 24.0;
        canvas.rule(Point::new(MARGIN, y), width - 2.0 * MARGIN)?;
        y += 16.0;
        for font in ctx.fonts.fonts() {
            y += 26.0;
            let name = font.full_name();
            canvas.glyph_run(font.as_ref(), &glyphs_for(font.as_ref(), &name), Point::new(MARGIN, y), 20.0)?;
        }

        if self.show_copyright {
            let mut y = height - MARGIN;
            for line in ctx.fonts.copyrights().iter().rev() {
                canvas.text(line, Point::new(MARGIN, y), 7.0)?;
                y -= 10.0;
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Autofill for TitleSection {
    fn defaults() -> SettingsTree {
        SettingsTree::new()
            .with("title", Setting::Auto)
            .with("subtitle", "Type Specimen")
            .with("show_copyright", true)
    }

    fn resolvers() -> ResolverTable<Self> {
        ResolverTable::new().with(&["title"], Self::resolve_title)
    }

    fn settings_mut(&mut self) -> &mut SectionSettings {
        &mut self.settings
    }

    fn did_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        let resolved = &self.settings.resolved;
        self.title = resolved
            .get_str(&["title"])
            .ok_or_else(|| invalid_setting(TITLE_SECTION, "title", "expected a string"))?
            .to_string();
        self.subtitle = resolved
            .get_str(&["subtitle"])
            .ok_or_else(|| invalid_setting(TITLE_SECTION, "subtitle", "expected a string"))?
            .to_string();
        self.show_copyright = resolved
            .get_bool(&["show_copyright"])
            .ok_or_else(|| invalid_setting(TITLE_SECTION, "show_copyright", "expected true or false"))?;
        Ok(())
    }
}
