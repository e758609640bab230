// this_file: crates/typsm-unicode/src/glyph.rs

/// Suffix spellings grouped by the feature they stand for
const SUFFIX_CATEGORIES: &[(&str, &[&str])] = &[
    ("smcp", &["smcp", "sc", "small"]),
    ("numr", &["numr", "numerator"]),
    ("dnom", &["dnom", "dnominator"]),
    ("sups", &["sup", "sups", "superior", "superiors"]),
    ("sinf", &["sinf", "inf", "inferior", "infs"]),
    ("onum.tnum", &["ot", "OT", "onum.tnum", "tnum.onum", "tosf"]),
    ("onum.pnum", &["op", "OP", "onum.pnum", "pnum.onum", "osf"]),
    ("lnum.tnum", &["lt", "LT", "lnum.tnum", "tnum.lnum", "tf"]),
    ("lnum.pnum", &["lf", "Lf", "lnum.pnum", "pnum.lnum"]),
    ("case", &["case", "cap"]),
];

/// What the sorter knows about one glyph
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphInfo {
    pub name: String,
    /// Code point mapped to this very glyph
    pub unicode: Option<u32>,
    /// Longest dot-separated prefix of the name that has a code point, or
    /// the first component when none does
    pub root: String,
    pub suffixes: Vec<String>,
    /// Code point of the root
    pub pseudo_unicode: Option<u32>,
    pub suffix_category: Option<&'static str>,
    /// Two-letter general category of the root's code point
    pub category: Option<String>,
}

impl GlyphInfo {
    /// Split `name` and look up code points with `lookup` (name → code point)
    pub fn new(name: &str, lookup: impl Fn(&str) -> Option<u32>) -> Self {
        let parts: Vec<&str> = name.split('.').collect();

        let found = (1..=parts.len()).rev().find_map(|len| {
            let root = parts[..len].join(".");
            lookup(&root).map(|cp| (len, root, cp))
        });
        let (root_len, root, pseudo_unicode) = match found {
            Some((len, root, cp)) => (len, root, Some(cp)),
            None => (1, parts[0].to_string(), None),
        };
        let suffixes: Vec<String> = parts[root_len..].iter().map(|s| s.to_string()).collect();

        Self {
            name: name.to_string(),
            unicode: lookup(name),
            suffix_category: suffix_category(&suffixes),
            root,
            suffixes,
            pseudo_unicode,
            category: None,
        }
    }
}

/// The feature a glyph's suffixes point at. The whole suffix is tried
/// first (`onum.tnum`), then each component in order.
fn suffix_category(suffixes: &[String]) -> Option<&'static str> {
    if suffixes.is_empty() {
        return None;
    }
    let joined = suffixes.join(".");
    std::iter::once(joined.as_str())
        .chain(suffixes.iter().map(String::as_str))
        .find_map(|suffix| {
            SUFFIX_CATEGORIES
                .iter()
                .find(|(_, spellings)| spellings.contains(&suffix))
                .map(|(category, _)| *category)
        })
}
