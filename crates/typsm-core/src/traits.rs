//! The contracts between the settings engine and its collaborators
//!
//! The engine never parses font binaries, classifies glyphs, or writes PDF
//! operators itself. It talks to those jobs through these traits:
//!
//! - [`FontFace`] - One loaded font file and the metadata resolvers need
//! - [`FontProvider`] - Finds font files on disk and loads them
//! - [`GlyphClassifier`] - Sorts a font's glyphs into display categories
//! - [`Canvas`] - Pages and marks, consumed by sections when drawing

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

/// Unique identifier for a glyph within a font
pub type GlyphId = u32;

/// Ordering key for fonts in a collection: width class, weight class, italic
pub type SortKey = (u16, u16, bool);

/// A loaded font file
///
/// Names follow the usual preference: typographic family/subfamily names
/// when the font has them, the legacy ones otherwise.
pub trait FontFace: Send + Sync {
    /// Where the font was loaded from
    fn path(&self) -> &Path;

    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    fn family_name(&self) -> String;

    fn style_name(&self) -> String;

    fn copyright(&self) -> Option<String> {
        None
    }

    fn designer(&self) -> Option<String> {
        None
    }

    /// `head.fontRevision`, rounded to three decimals
    fn version(&self) -> Option<f64> {
        None
    }

    fn year_created(&self) -> Option<i32> {
        None
    }

    fn sort_key(&self) -> SortKey;

    fn units_per_em(&self) -> u16;

    /// Glyph names in glyph id order
    fn glyph_order(&self) -> Vec<String>;

    /// Find the glyph that represents this character
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// All (code point, glyph) pairs from the character map
    fn code_points(&self) -> Vec<(u32, GlyphId)>;

    /// Advance width in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    /// OpenType feature tags from GSUB and GPOS, sorted and unique
    fn feature_tags(&self) -> Vec<String> {
        Vec::new()
    }

    /// Scripts covered by the character map, with the number of code points
    /// each one contributes, most covered first
    fn script_coverage(&self) -> Vec<(String, usize)> {
        Vec::new()
    }

    /// `Family Style`, used to address one font of a collection
    fn full_name(&self) -> String {
        format!("{} {}", self.family_name(), self.style_name())
    }

    /// Glyph id for a glyph name
    fn glyph_by_name(&self, name: &str) -> Option<GlyphId> {
        self.glyph_order()
            .iter()
            .position(|n| n == name)
            .map(|index| index as GlyphId)
    }
}

/// Finds and loads font files
pub trait FontProvider {
    /// Font files at `path`: the file itself, or the direct children of a
    /// directory that carry a font extension
    fn discover(&self, path: &Path) -> Result<Vec<PathBuf>>;

    fn load(&self, path: &Path) -> Result<Arc<dyn FontFace>>;
}

/// Groups a font's glyph names into ordered, named categories
pub trait GlyphClassifier {
    fn categorize(&self, face: &dyn FontFace) -> Vec<(String, Vec<String>)>;
}

/// A point in page space, origin at the top-left corner, y growing down
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where sections put their marks
///
/// Pages are created explicitly. Drawing always targets the current page,
/// which is the most recently created one unless another was selected.
pub trait Canvas {
    fn new_page(&mut self);

    fn page_count(&self) -> usize;

    /// Zero-based index of the page being drawn on
    fn current_page(&self) -> Option<usize>;

    fn select_page(&mut self, index: usize) -> Result<()>;

    /// Width and height of a page in points
    fn page_size(&self) -> (f32, f32);

    /// Set a line of text in the interface face. Returns its width.
    fn text(&mut self, text: &str, origin: Point, size: f32) -> Result<f32>;

    /// Width [`text`](Self::text) would return, without drawing
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    /// Draw glyph outlines of `font` along a baseline starting at `origin`.
    /// Returns the advance of the whole run.
    fn glyph_run(
        &mut self,
        font: &dyn FontFace,
        glyphs: &[GlyphId],
        origin: Point,
        size: f32,
    ) -> Result<f32>;

    /// A horizontal hairline
    fn rule(&mut self, from: Point, width: f32) -> Result<()>;

    /// Write the finished document
    fn save(&mut self, path: &Path) -> Result<()>;
}
