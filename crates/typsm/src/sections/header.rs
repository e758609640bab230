// this_file: crates/typsm/src/sections/header.rs

use std::any::Any;

use typsm_core::error::Result;
use typsm_core::resolver::{AutofillScope, ResolverTable};
use typsm_core::section::{invalid_setting, Autofill, DrawContext, Environment, Section, SectionSettings};
use typsm_core::traits::{Canvas, Point};
use typsm_core::tree::SettingsTree;
use typsm_core::value::{Setting, Value};

use super::{collection, MARGIN};

pub const HEADER_SECTION: &str = "header";

/// Collection name and folio at the top of every page
#[derive(Default)]
pub struct HeaderSection {
    settings: SectionSettings,
    text: String,
    size: f32,
}

impl HeaderSection {
    fn resolve_text(&mut self, scope: &AutofillScope<'_>) -> Result<Value> {
        Ok(Value::from(collection(scope)?.collection_name()))
    }
}

impl Section for HeaderSection {
    fn name(&self) -> &'static str {
        HEADER_SECTION
    }

    fn settings(&self) -> &SectionSettings {
        &self.settings
    }

    fn draws_across_all_pages(&self) -> bool {
        true
    }

    fn draw_page(&self, canvas: &mut dyn Canvas, _ctx: &DrawContext<'_>) -> Result<()> {
        let Some(page) = canvas.current_page() else {
            return Ok(());
        };
        let (width, _) = canvas.page_size();
        let baseline = MARGIN * 0.75;

        canvas.text(&self.text, Point::new(MARGIN, baseline), self.size)?;

        let folio = format!("{} / {}", page + 1, canvas.page_count());
        let folio_width = canvas.text_width(&folio, self.size);
        canvas.text(&folio, Point::new(width - MARGIN - folio_width, baseline), self.size)?;

        canvas.rule(Point::new(MARGIN, baseline + 4.0), width - 2.0 * MARGIN)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Autofill for HeaderSection {
    fn defaults() -> SettingsTree {
        SettingsTree::new()
            .with("text", Setting::Auto)
            .with("size", 8)
    }

    fn resolvers() -> ResolverTable<Self> {
        ResolverTable::new().with(&["text"], Self::resolve_text)
    }

    fn settings_mut(&mut self) -> &mut SectionSettings {
        &mut self.settings
    }

    fn did_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        let resolved = &self.settings.resolved;
        self.text = resolved
            .get_str(&["text"])
            .ok_or_else(|| invalid_setting(HEADER_SECTION, "text", "expected a string"))?
            .to_string();
        let size = resolved
            .get_f64(&["size"])
            .filter(|size| *size > 0.0)
            .ok_or_else(|| invalid_setting(HEADER_SECTION, "size", "expected a positive number"))?;
        self.size = size as f32;
        Ok(())
    }
}
