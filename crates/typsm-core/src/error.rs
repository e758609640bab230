//! Error types for typsm

use std::path::PathBuf;

use thiserror::Error;

use crate::tree::KeyPath;
use crate::value::TokenKind;

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Main error type for typsm
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unresolved {kind} token at `{path}` in section `{section}`: no resolver and no default")]
    UnresolvedToken {
        section: &'static str,
        path: KeyPath,
        kind: TokenKind,
    },

    #[error("Invalid setting `{path}`: {reason}")]
    InvalidSetting { path: String, reason: String },

    #[error("Malformed settings document {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Settings document could not be encoded: {0}")]
    Encode(String),

    #[error("No `{0}` section is registered or loaded")]
    MissingFontCollection(&'static str),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font discovery and loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("'{0}' does not exist")]
    FontNotFound(PathBuf),

    #[error("{0} is not a font file")]
    NotAFontFile(PathBuf),

    #[error("Invalid font data in {0}")]
    InvalidData(PathBuf),

    #[error("{0}: WOFF2 fonts are not supported")]
    UnsupportedFormat(PathBuf),

    #[error("Font collection is empty")]
    EmptyCollection,
}
