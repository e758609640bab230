use proptest::prelude::*;

use super::tests::GlyphList;
use super::*;

// Property: every glyph not on the ignore list lands in exactly one category
proptest! {
    #[test]
    fn prop_each_glyph_in_one_category(
        names in prop::collection::vec("[A-Za-z]{1,6}(\\.[a-z]{2,4}){0,2}", 1..40),
        code_points in prop::collection::vec(prop::option::of(0x20u32..0x3000), 40),
    ) {
        let mut seen = std::collections::HashSet::new();
        let glyphs: Vec<(&str, Option<u32>)> = names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .zip(code_points.iter())
            .map(|(name, cp)| (name.as_str(), *cp))
            .collect();
        let face = GlyphList::new(&glyphs);

        let categories = GlyphSorter::new().categorize(&face);
        let mut placed: Vec<&str> = categories
            .iter()
            .flat_map(|(_, glyphs)| glyphs.iter().map(String::as_str))
            .collect();
        placed.sort_unstable();

        let mut expected: Vec<&str> = glyphs
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| !IGNORED_GLYPHS.contains(name))
            .collect();
        expected.sort_unstable();

        prop_assert_eq!(placed, expected);
    }
}
