// this_file: crates/typsm-fontdb/src/discovery.rs

//! Finding font files on disk

use std::path::{Path, PathBuf};

use typsm_core::error::{FontLoadError, Result};
use walkdir::WalkDir;

/// Extensions treated as font files
pub const FONT_EXTENSIONS: &[&str] = &["otf", "ttf", "woff", "woff2"];

/// Whether `path` carries one of the [`FONT_EXTENSIONS`]
pub fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.iter().any(|f| f.eq_ignore_ascii_case(ext)))
}

/// Font files at `path`
///
/// A file is returned as is when it has a font extension. A directory
/// yields its direct children with a font extension, sorted by name;
/// subdirectories are not searched.
pub fn discover_fonts(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(FontLoadError::FontNotFound(path.to_path_buf()).into());
    }

    if !path.is_dir() {
        if is_font_file(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Err(FontLoadError::NotAFontFile(path.to_path_buf()).into());
    }

    let mut fonts = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_font_file(entry.path()) {
            fonts.push(entry.into_path());
        }
    }
    log::debug!("found {} font(s) in {}", fonts.len(), path.display());
    Ok(fonts)
}
