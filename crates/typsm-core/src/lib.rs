//! Typsm Core: settings that fill themselves in
//!
//! A type specimen is a stack of sections (a cover, glyph overviews, text
//! samples, running headers). Each section carries a tree of settings, and
//! any leaf of that tree may be left for the program to work out:
//!
//! - `<auto>` - computed on every run; the marker is written back
//! - `<fill>` - computed once; the computed value is written back
//!
//! ## The Pieces
//!
//! - [`SettingsTree`] - Ordered, nested settings and the merge/flatten rules
//! - [`resolver`] - How a token becomes a value: bound resolver, then default
//! - [`Section`] and [`Autofill`] - What a section is and how one is built
//! - [`FontCollection`] - The section every specimen is about
//! - [`Director`] - Reads the document, builds sections, draws, persists
//! - [`SettingsDocument`] - The YAML document on disk
//!
//! Font parsing, glyph sorting and PDF output live behind the traits in
//! [`traits`], implemented by sibling crates.
//!
//! ## Merging Settings
//!
//! ```rust
//! use typsm_core::{Setting, SettingsTree};
//!
//! let defaults = SettingsTree::new()
//!     .with("subtitle", "cool")
//!     .with("title", Setting::Auto);
//! let user = SettingsTree::new()
//!     .with("title", "Acme Sans")
//!     .with("extra", 1);
//!
//! let raw = SettingsTree::merge(&defaults, &user);
//! assert_eq!(raw.keys().collect::<Vec<_>>(), vec!["subtitle", "title", "extra"]);
//! assert_eq!(raw.get_str(&["title"]), Some("Acme Sans"));
//! ```

pub mod codec;
pub mod director;
pub mod error;
pub mod fonts;
pub mod resolver;
pub mod section;
pub mod traits;
pub mod tree;
pub mod value;

pub use codec::{SectionRecord, SettingsDocument};
pub use director::{Director, Registry, SETTINGS_FILE_NAME};
pub use error::{FontLoadError, Result, SettingsError};
pub use fonts::{FontCollection, FONT_COLLECTION};
pub use resolver::{AutofillScope, Resolver, ResolverTable};
pub use section::{autofill, invalid_setting, Autofill, DrawContext, Environment, Section, SectionSettings};
pub use traits::{Canvas, FontFace, FontProvider, GlyphClassifier, GlyphId, Point, SortKey};
pub use tree::{KeyPath, SettingsTree};
pub use value::{Setting, TokenKind, Value, AUTO_TOKEN, FILL_TOKEN};
