//! Built-in sections
//!
//! - [`TitleSection`] (`title`) - Cover page
//! - [`GlyphsSection`] (`glyphs`) - Categorized glyph set of one font
//! - [`TextSection`] (`text`) - A sample line at several sizes, per font
//! - [`HeaderSection`] (`header`) - Running header on every page

use typsm_core::error::{Result, SettingsError};
use typsm_core::resolver::AutofillScope;
use typsm_core::traits::{Canvas, FontFace, GlyphId, Point};
use typsm_core::{FontCollection, FONT_COLLECTION};

pub mod glyphs;
pub mod header;
pub mod text;
pub mod title;

pub use glyphs::GlyphsSection;
pub use header::HeaderSection;
pub use text::TextSection;
pub use title::TitleSection;

/// Page margin on every side, in points
pub const MARGIN: f32 = 56.0;

/// The collection a resolver may consult
pub(crate) fn collection<'a>(scope: &AutofillScope<'a>) -> Result<&'a FontCollection> {
    scope
        .env
        .fonts
        .ok_or(SettingsError::MissingFontCollection(FONT_COLLECTION))
}

/// Glyphs for `text` in `font`; characters the font lacks are left out
pub(crate) fn glyphs_for(font: &dyn FontFace, text: &str) -> Vec<GlyphId> {
    text.chars().filter_map(|ch| font.glyph_id(ch)).collect()
}

/// Top-to-bottom placement inside the page margins, breaking onto a new
/// page when a line does not fit
pub(crate) struct Column {
    y: f32,
    top: f32,
    bottom: f32,
}

impl Column {
    /// Start on a fresh page
    pub(crate) fn new_page(canvas: &mut dyn Canvas) -> Self {
        canvas.new_page();
        let (_, height) = canvas.page_size();
        // Leave room for a running header
        let top = MARGIN * 1.5;
        Self {
            y: top,
            top,
            bottom: height - MARGIN,
        }
    }

    /// Baseline origin for a line `height` points tall
    pub(crate) fn line(&mut self, canvas: &mut dyn Canvas, height: f32) -> Point {
        if self.y + height > self.bottom && self.y > self.top {
            canvas.new_page();
            self.y = self.top;
        }
        // Baseline sits at 80% of the line
        let origin = Point::new(MARGIN, self.y + height * 0.8);
        self.y += height;
        origin
    }

    pub(crate) fn skip(&mut self, space: f32) {
        self.y = (self.y + space).min(self.bottom);
    }
}
