//! Where fonts come from: discovery, loading and metadata for typsm
//!
//! [`FontDatabase`] is the [`FontProvider`] the director uses. It finds
//! font files with [`discover_fonts`] and turns each into a [`FontFile`],
//! parsed with `read-fonts`/`skrifa`, caching by canonical path so a font
//! listed twice is read once.
//!
//! ## What gets read
//!
//! Everything a specimen prints about a font is read once at load time:
//! names (typographic names win over the legacy ones), copyright, designer,
//! revision, creation year, the OS/2 width/weight/italic sort key, glyph
//! names and the character map. Outlines and advances are read on demand
//! from the raw data.
//!
//! WOFF files are unwrapped to plain sfnt data on load. WOFF2 is
//! recognized and refused.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, TimeDelta};
use icu_properties::props::Script;
use icu_properties::{CodePointMapData, PropertyNamesLong};
use parking_lot::Mutex;
use read_fonts::tables::os2::SelectionFlags;
use read_fonts::types::{GlyphId, GlyphId16};
use read_fonts::{FontRef, TableProvider};
use skrifa::string::StringId;
use skrifa::MetadataProvider;

use typsm_core::error::{FontLoadError, Result};
use typsm_core::traits::{FontFace, FontProvider, GlyphId as TypsmGlyphId, SortKey};

pub mod discovery;
pub mod sfnt;
pub mod woff;

pub use discovery::{discover_fonts, is_font_file, FONT_EXTENSIONS};
pub use sfnt::{SfntBuilder, CFF_FLAVOR, TRUETYPE_FLAVOR};

/// Sort key for fonts without an OS/2 table: normal width, regular, upright
const DEFAULT_SORT_KEY: SortKey = (5, 400, false);

/// A font file brought into memory with its metadata read
pub struct FontFile {
    path: PathBuf,
    /// sfnt bytes; WOFF input is stored unwrapped
    data: Vec<u8>,
    family_name: String,
    style_name: String,
    copyright: Option<String>,
    designer: Option<String>,
    version: Option<f64>,
    year_created: Option<i32>,
    sort_key: SortKey,
    units_per_em: u16,
    glyph_order: Vec<String>,
    /// Sorted by code point
    code_points: Vec<(u32, TypsmGlyphId)>,
    feature_tags: Vec<String>,
}

impl FontFile {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FontLoadError::FontNotFound(path.to_path_buf()).into(),
            _ => typsm_core::SettingsError::Io(e),
        })?;

        if woff::is_woff2(&data) {
            return Err(FontLoadError::UnsupportedFormat(path.to_path_buf()).into());
        }
        let data = if woff::is_woff(&data) {
            woff::decode(&data, path)?
        } else {
            data
        };
        Self::from_data(path, data)
    }

    /// Reads metadata from sfnt `data`; `path` is recorded as the origin
    pub fn from_data(path: impl AsRef<Path>, data: Vec<u8>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let font = FontRef::from_index(&data, 0)
            .map_err(|_| FontLoadError::InvalidData(path.clone()))?;

        let name = |ids: &[StringId]| {
            ids.iter().find_map(|id| {
                font.localized_strings(*id)
                    .english_or_first()
                    .map(|s| s.to_string())
                    .filter(|s| !s.is_empty())
            })
        };
        let family_name = name(&[StringId::TYPOGRAPHIC_FAMILY_NAME, StringId::FAMILY_NAME])
            .unwrap_or_else(|| file_stem(&path));
        let style_name = name(&[StringId::TYPOGRAPHIC_SUBFAMILY_NAME, StringId::SUBFAMILY_NAME])
            .unwrap_or_else(|| "Regular".to_string());
        let copyright = name(&[StringId::COPYRIGHT_NOTICE]);
        let designer = name(&[StringId::DESIGNER]);

        let head = font.head().ok();
        let units_per_em = head.as_ref().map(|h| h.units_per_em()).unwrap_or(1000);
        let version = head
            .as_ref()
            .map(|h| (h.font_revision().to_f64() * 1000.0).round() / 1000.0);
        let year_created = head.as_ref().and_then(|h| year_from_timestamp(h.created().as_secs()));

        let sort_key = font
            .os2()
            .map(|os2| {
                (
                    os2.us_width_class(),
                    os2.us_weight_class(),
                    os2.fs_selection().contains(SelectionFlags::ITALIC),
                )
            })
            .unwrap_or(DEFAULT_SORT_KEY);

        let mut code_points: Vec<(u32, TypsmGlyphId)> = font
            .charmap()
            .mappings()
            .map(|(cp, gid)| (cp, gid.to_u32()))
            .collect();
        code_points.sort_unstable();

        let glyph_order = read_glyph_order(&font, &code_points);
        let feature_tags = read_feature_tags(&font);

        log::debug!("loaded {} {} from {}", family_name, style_name, path.display());

        Ok(Self {
            path,
            data,
            family_name,
            style_name,
            copyright,
            designer,
            version,
            year_created,
            sort_key,
            units_per_em,
            glyph_order,
            code_points,
            feature_tags,
        })
    }

    /// Creates a FontRef on demand for table lookups
    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, 0).ok()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyph_order.len()
    }
}

impl FontFace for FontFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn family_name(&self) -> String {
        self.family_name.clone()
    }

    fn style_name(&self) -> String {
        self.style_name.clone()
    }

    fn copyright(&self) -> Option<String> {
        self.copyright.clone()
    }

    fn designer(&self) -> Option<String> {
        self.designer.clone()
    }

    fn version(&self) -> Option<f64> {
        self.version
    }

    fn year_created(&self) -> Option<i32> {
        self.year_created
    }

    fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_order(&self) -> Vec<String> {
        self.glyph_order.clone()
    }

    fn glyph_id(&self, ch: char) -> Option<TypsmGlyphId> {
        let cp = ch as u32;
        self.code_points
            .binary_search_by_key(&cp, |(c, _)| *c)
            .ok()
            .map(|index| self.code_points[index].1)
    }

    fn code_points(&self) -> Vec<(u32, TypsmGlyphId)> {
        self.code_points.clone()
    }

    fn advance_width(&self, glyph_id: TypsmGlyphId) -> f32 {
        self.font_ref()
            .and_then(|font| {
                let hmtx = font.hmtx().ok()?;
                hmtx.advance(GlyphId::new(glyph_id))
            })
            .map(f32::from)
            .unwrap_or(self.units_per_em as f32 / 2.0)
    }

    fn feature_tags(&self) -> Vec<String> {
        self.feature_tags.clone()
    }

    fn script_coverage(&self) -> Vec<(String, usize)> {
        script_coverage(self.code_points.iter().map(|(cp, _)| *cp))
    }
}

/// Glyph names from `post`, falling back to `uniXXXX` for mapped glyphs
/// and `glyphNNNNN` for the rest
fn read_glyph_order(font: &FontRef<'_>, code_points: &[(u32, TypsmGlyphId)]) -> Vec<String> {
    let num_glyphs = font.maxp().map(|m| m.num_glyphs()).unwrap_or(0);
    let post = font.post().ok();

    let mut first_code_point: HashMap<TypsmGlyphId, u32> = HashMap::new();
    for (cp, gid) in code_points {
        first_code_point.entry(*gid).or_insert(*cp);
    }

    (0..num_glyphs)
        .map(|gid| {
            let from_post = post
                .as_ref()
                .and_then(|p| p.glyph_name(GlyphId16::new(gid)))
                .filter(|n| !n.is_empty())
                .map(str::to_string);
            from_post.unwrap_or_else(|| match (gid, first_code_point.get(&u32::from(gid))) {
                (0, _) => ".notdef".to_string(),
                (_, Some(cp)) if *cp <= 0xFFFF => format!("uni{cp:04X}"),
                (_, Some(cp)) => format!("u{cp:05X}"),
                (_, None) => format!("glyph{gid:05}"),
            })
        })
        .collect()
}

/// Feature tags from GSUB and GPOS, sorted and unique
fn read_feature_tags(font: &FontRef<'_>) -> Vec<String> {
    let mut tags = Vec::new();
    if let Ok(list) = font.gsub().and_then(|gsub| gsub.feature_list()) {
        tags.extend(list.feature_records().iter().map(|r| r.feature_tag().to_string()));
    }
    if let Ok(list) = font.gpos().and_then(|gpos| gpos.feature_list()) {
        tags.extend(list.feature_records().iter().map(|r| r.feature_tag().to_string()));
    }
    tags.sort();
    tags.dedup();
    tags
}

/// Count code points per script, most covered first. Common, inherited and
/// unknown code points are not counted.
pub fn script_coverage(code_points: impl Iterator<Item = u32>) -> Vec<(String, usize)> {
    let scripts = CodePointMapData::<Script>::new();
    let names = PropertyNamesLong::<Script>::new();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for cp in code_points {
        let script = scripts.get32(cp);
        if script == Script::Common || script == Script::Inherited || script == Script::Unknown {
            continue;
        }
        if let Some(name) = names.get(script) {
            *counts.entry(name.to_string()).or_default() += 1;
        }
    }

    let mut coverage: Vec<(String, usize)> = counts.into_iter().collect();
    coverage.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    coverage
}

/// `head.created` counts seconds from 1904-01-01
fn year_from_timestamp(seconds: i64) -> Option<i32> {
    if seconds <= 0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1904, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let created = epoch.checked_add_signed(TimeDelta::try_seconds(seconds)?)?;
    Some(created.year())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Your font library: discovers and loads fonts, each file once
pub struct FontDatabase {
    /// Maps canonical paths to their loaded fonts
    path_cache: Mutex<HashMap<PathBuf, Arc<FontFile>>>,
}

impl FontDatabase {
    /// Starts with an empty library
    pub fn new() -> Self {
        Self {
            path_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Loads a font file, or returns the copy loaded earlier
    pub fn load_font(&self, path: impl AsRef<Path>) -> Result<Arc<FontFile>> {
        let path = path.as_ref();
        let cache_key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if let Some(font) = self.path_cache.lock().get(&cache_key) {
            return Ok(font.clone());
        }

        let font = Arc::new(FontFile::from_file(path)?);
        self.path_cache.lock().insert(cache_key, font.clone());
        Ok(font)
    }

    /// Number of distinct font files loaded
    pub fn font_count(&self) -> usize {
        self.path_cache.lock().len()
    }

    /// Forget every loaded font
    pub fn clear(&self) {
        self.path_cache.lock().clear();
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl FontProvider for FontDatabase {
    fn discover(&self, path: &Path) -> Result<Vec<PathBuf>> {
        discover_fonts(path)
    }

    fn load(&self, path: &Path) -> Result<Arc<dyn FontFace>> {
        let font: Arc<dyn FontFace> = self.load_font(path)?;
        Ok(font)
    }
}
