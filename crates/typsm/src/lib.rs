//! typsm - type specimens from a folder of fonts
//!
//! Point typsm at a directory of fonts and it writes a PDF specimen next to
//! them, along with a `settings.yaml` describing the specimen. Edit that
//! document to change what gets drawn; leave a value as `<auto>` to have it
//! worked out again on every run, or as `<fill>` to have it worked out once
//! and written back.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use std::path::Path;
//!
//! let director = typsm::open(Path::new("fonts/AcmeSans"))?;
//! let pdf = typsm::render(&director, None, Local::now().naive_local())?;
//! director.persist()?;
//! println!("wrote {}", pdf.display());
//! # Ok::<(), typsm::error::SettingsError>(())
//! ```
//!
//! # Crates
//!
//! - `typsm-core` (re-exported at the root): settings trees, sections, the
//!   director and the YAML codec
//! - [`fontdb`]: font discovery and metadata
//! - [`unicode`]: glyph categorization
//! - [`export`]: the PDF canvas

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

pub use typsm_core::{codec, director, error, fonts, resolver, section, traits, tree, value};
pub use typsm_export as export;
pub use typsm_fontdb as fontdb;
pub use typsm_unicode as unicode;

use typsm_core::error::{Result, SettingsError};
use typsm_core::traits::Canvas;
use typsm_core::{Director, Registry, SectionRecord, SettingsDocument, SettingsTree, FONT_COLLECTION};
use typsm_export::PdfCanvas;
use typsm_fontdb::FontDatabase;
use typsm_unicode::GlyphSorter;

pub mod sections;

use sections::{
    glyphs::GLYPHS_SECTION, header::HEADER_SECTION, text::TEXT_SECTION, title::TITLE_SECTION,
    GlyphsSection, HeaderSection, TextSection, TitleSection,
};

/// Every built-in section, with [`default_document`] for new specimens
pub fn default_registry() -> Registry {
    Registry::new()
        .register::<TitleSection>(TITLE_SECTION)
        .register::<GlyphsSection>(GLYPHS_SECTION)
        .register::<TextSection>(TEXT_SECTION)
        .register::<HeaderSection>(HEADER_SECTION)
        .with_default_document(default_document())
}

/// Cover, glyph set, text sample and running header, all left to autofill
pub fn default_document() -> SettingsDocument {
    SettingsDocument::new(
        [FONT_COLLECTION, TITLE_SECTION, GLYPHS_SECTION, TEXT_SECTION, HEADER_SECTION]
            .into_iter()
            .map(|template| SectionRecord::new(template, SettingsTree::new()))
            .collect(),
    )
}

/// Load the specimen at `input_path` with the built-in sections
pub fn open(input_path: &Path) -> Result<Director> {
    Director::load(input_path, default_registry(), &FontDatabase::new())
}

/// Draw `director`'s sections to a PDF and save it
///
/// The file goes to `output_dir` (default: the specimen directory), named
/// after the collection and `now`. Returns its path.
pub fn render(director: &Director, output_dir: Option<&Path>, now: NaiveDateTime) -> Result<PathBuf> {
    let fonts = director
        .font_collection()
        .ok_or(SettingsError::MissingFontCollection(FONT_COLLECTION))?;
    let mut canvas = PdfCanvas::default().with_title(fonts.collection_name());
    director.draw(&mut canvas, &GlyphSorter::new())?;

    let path = director.output_path(output_dir, now)?;
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }
    canvas.save(&path)?;
    log::info!("-- saved {}", path.display());
    Ok(path)
}

/// Common imports for typical usage
pub mod prelude {
    pub use crate::sections::{GlyphsSection, HeaderSection, TextSection, TitleSection};
    pub use crate::{default_registry, open, render};
    pub use typsm_core::{
        Autofill, Canvas, Director, FontCollection, Result, Section, Setting, SettingsError, SettingsTree,
        Value,
    };
}
