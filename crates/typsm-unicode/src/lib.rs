// this_file: crates/typsm-unicode/src/lib.rs

//! Sorting a font's glyphs into the groups a specimen shows
//!
//! Each glyph name is split into a root and suffixes (`one.tosf` is `one`
//! with suffix `tosf`). The root's code point, looked up in the font's
//! character map, gives a Unicode general category; the suffixes give a
//! suffix category such as small caps or tabular oldstyle figures. A fixed,
//! ordered list of category queries then claims each glyph: the first
//! category whose tests all pass wins, and unclaimed glyphs land in `Other`.

use std::collections::HashMap;

use icu_properties::props::GeneralCategory;
use icu_properties::{CodePointMapData, CodePointMapDataBorrowed, PropertyNamesShort, PropertyNamesShortBorrowed};
use typsm_core::traits::{FontFace, GlyphClassifier};

mod glyph;

pub use glyph::GlyphInfo;

/// Glyphs never shown in a glyph overview
pub const IGNORED_GLYPHS: &[&str] = &[".notdef", ".null", "CR", "space", "uni00A0", "uni2009"];

/// Name of the category collecting glyphs no query claimed
pub const OTHER_CATEGORY: &str = "Other";

const PUNCTUATION: &[&str] = &["Pc", "Pd", "Pe", "Pf", "Pi", "Po", "Ps"];
const FIGURES: &[&str] = &["Nd", "Sc"];
const MARKS: &[&str] = &["Mc", "Me", "Mn"];

/// One test a glyph must pass to join a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphQuery {
    /// The glyph's own code point lies in this inclusive range
    CodePoint(u32, u32),
    /// The root's general category is one of these
    Category(&'static [&'static str]),
    /// A suffix belongs to this suffix category
    Suffix(&'static str),
}

impl GlyphQuery {
    pub fn matches(&self, glyph: &GlyphInfo) -> bool {
        match *self {
            GlyphQuery::CodePoint(low, high) => glyph
                .unicode
                .is_some_and(|cp| cp != 0 && (low..=high).contains(&cp)),
            GlyphQuery::Category(categories) => glyph
                .category
                .as_deref()
                .is_some_and(|category| categories.contains(&category)),
            GlyphQuery::Suffix(name) => glyph.suffix_category == Some(name),
        }
    }
}

/// Categories in the order they are tried and shown
pub const CATEGORY_QUERIES: &[(&str, &[GlyphQuery])] = &[
    ("Uppercases", &[GlyphQuery::CodePoint(0x41, 0x5A)]),
    ("Accented Uppercases", &[GlyphQuery::Category(&["Lu"])]),
    ("Lowercases", &[GlyphQuery::CodePoint(0x61, 0x7A)]),
    ("Accented Lowercases", &[GlyphQuery::Category(&["Ll"])]),
    (
        "Case Sensitive Forms",
        &[GlyphQuery::Suffix("case"), GlyphQuery::Category(PUNCTUATION)],
    ),
    ("Punctuation", &[GlyphQuery::Category(PUNCTUATION)]),
    (
        "Proportional Oldstyle Figures",
        &[GlyphQuery::Suffix("onum.pnum"), GlyphQuery::Category(FIGURES)],
    ),
    (
        "Proportional Lining Figures",
        &[GlyphQuery::Suffix("lnum.pnum"), GlyphQuery::Category(FIGURES)],
    ),
    (
        "Tabular Oldstyle Figures",
        &[GlyphQuery::Suffix("onum.tnum"), GlyphQuery::Category(FIGURES)],
    ),
    (
        "Tabular Lining Figures",
        &[GlyphQuery::Suffix("lnum.tnum"), GlyphQuery::Category(FIGURES)],
    ),
    ("Default Figures", &[GlyphQuery::Category(FIGURES)]),
    ("Mathematical Symbols", &[GlyphQuery::Category(&["Sm"])]),
    ("Arrows & Other Symbols", &[GlyphQuery::Category(&["So"])]),
    ("Marks", &[GlyphQuery::Category(MARKS)]),
    ("Other Figures", &[GlyphQuery::Category(&["No"])]),
];

/// Sorts glyphs into [`CATEGORY_QUERIES`] order
pub struct GlyphSorter {
    categories: CodePointMapDataBorrowed<'static, GeneralCategory>,
    category_names: PropertyNamesShortBorrowed<'static, GeneralCategory>,
    ignore: Vec<String>,
}

impl GlyphSorter {
    /// Create a sorter with ICU data baked in and the default ignore list
    pub fn new() -> Self {
        Self {
            categories: CodePointMapData::<GeneralCategory>::new(),
            category_names: PropertyNamesShort::<GeneralCategory>::new(),
            ignore: IGNORED_GLYPHS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the glyph names left out of every category
    pub fn with_ignore_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = names.into_iter().map(Into::into).collect();
        self
    }

    /// Two-letter general category of a code point, e.g. `Lu`
    pub fn general_category(&self, code_point: u32) -> Option<String> {
        let category = self.categories.get32(code_point);
        self.category_names.get(category).map(str::to_string)
    }

    /// Work out code points and categories for every glyph of `face`
    pub fn analyze(&self, face: &dyn FontFace) -> Vec<GlyphInfo> {
        let order = face.glyph_order();
        let mut reverse_cmap: HashMap<&str, u32> = HashMap::new();
        for (code_point, glyph_id) in face.code_points() {
            if let Some(name) = order.get(glyph_id as usize) {
                reverse_cmap
                    .entry(name.as_str())
                    .and_modify(|existing| *existing = (*existing).min(code_point))
                    .or_insert(code_point);
            }
        }

        order
            .iter()
            .map(|name| {
                let mut glyph = GlyphInfo::new(name, |root| reverse_cmap.get(root).copied());
                glyph.category = glyph
                    .pseudo_unicode
                    .and_then(|cp| self.general_category(cp));
                glyph
            })
            .collect()
    }

    /// The category a glyph joins
    pub fn category_of(&self, glyph: &GlyphInfo) -> &'static str {
        CATEGORY_QUERIES
            .iter()
            .find(|(_, queries)| queries.iter().all(|q| q.matches(glyph)))
            .map(|(name, _)| *name)
            .unwrap_or(OTHER_CATEGORY)
    }
}

impl Default for GlyphSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphClassifier for GlyphSorter {
    fn categorize(&self, face: &dyn FontFace) -> Vec<(String, Vec<String>)> {
        let mut grouped: HashMap<&'static str, Vec<String>> = HashMap::new();
        for glyph in self.analyze(face) {
            if self.ignore.contains(&glyph.name) {
                continue;
            }
            grouped
                .entry(self.category_of(&glyph))
                .or_default()
                .push(glyph.name);
        }

        CATEGORY_QUERIES
            .iter()
            .map(|(name, _)| *name)
            .chain(std::iter::once(OTHER_CATEGORY))
            .filter_map(|name| grouped.remove(name).map(|glyphs| (name.to_string(), glyphs)))
            .collect()
    }
}


#[cfg(test)]
mod proptests;
