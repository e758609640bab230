// this_file: crates/typsm/tests/specimen.rs

#[path = "../../typsm-fontdb/tests/support/mod.rs"]
mod support;

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use lopdf::Document;
use typsm::codec::{SectionRecord, SettingsDocument};
use typsm::error::SettingsError;
use typsm::prelude::*;
use typsm::sections::{GlyphsSection, TextSection};
use typsm::value::Value;

fn now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|d| d.and_hms_opt(14, 5, 0))
        .unwrap()
}

fn section<'a, S: 'static>(director: &'a Director) -> &'a S {
    director
        .sections()
        .iter()
        .find_map(|s| s.as_any().downcast_ref::<S>())
        .unwrap()
}

fn page_text(document: &Document, page: u32) -> String {
    let pages = document.get_pages();
    let content = document.get_page_content(pages[&page]).unwrap();
    String::from_utf8_lossy(&content).into_owned()
}

#[test]
fn test_first_run_when_folder_has_fonts_then_default_specimen_is_built() {
    let dir = tempfile::tempdir().unwrap();
    support::acme_family(dir.path());

    let director = open(dir.path()).unwrap();

    assert!(dir.path().join("settings.yaml").is_file());
    let names: Vec<&str> = director.sections().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["fonts", "title", "glyphs", "text", "header"]);

    let fonts = director.font_collection().unwrap();
    assert_eq!(fonts.common_style_names(), vec!["Light", "Regular", "Bold"]);
    assert_eq!(fonts.collection_name(), "Acme Sans");

    let title = &director.sections()[1].settings().resolved;
    assert_eq!(title.get_str(&["title"]), Some("Acme Sans"));

    let glyphs: &GlyphsSection = section(&director);
    assert_eq!(glyphs.font(), "Acme Sans Light");
    assert_eq!(glyphs.categories().first().map(String::as_str), Some("Uppercases"));
    assert_eq!(glyphs.categories().last().map(String::as_str), Some("Other"));

    let text: &TextSection = section(&director);
    assert_eq!(text.sizes(), &[10.0, 14.0, 24.0]);
    assert_eq!(
        text.settings().resolved.get_str(&["sample"]),
        Some("The quick brown fox jumps over the lazy dog")
    );
}

#[test]
fn test_render_when_default_specimen_then_pdf_has_headed_pages() {
    let dir = tempfile::tempdir().unwrap();
    support::acme_family(dir.path());
    let out = dir.path().join("out");

    let director = open(dir.path()).unwrap();
    let pdf = render(&director, Some(&out), now()).unwrap();

    assert_eq!(pdf, out.join("20240309-1405-specimen-AcmeSans.pdf"));
    let document = Document::load(&pdf).unwrap();
    // Cover, glyph set, text samples
    assert_eq!(document.get_pages().len(), 3);

    let cover = page_text(&document, 1);
    assert!(cover.contains("(Acme Sans) Tj"), "{cover}");
    assert!(cover.contains("(Type Specimen) Tj"));
    assert!(cover.contains("Copyright 2021 The Acme Sans Authors"));
    assert!(cover.contains("(1 / 3) Tj"));

    let glyph_page = page_text(&document, 2);
    assert!(glyph_page.contains("(Glyph Set: Acme Sans Light) Tj"));
    assert!(glyph_page.contains("(Uppercases \\(2\\)) Tj") || glyph_page.contains("(Uppercases (2)) Tj"));
    assert!(page_text(&document, 3).contains("(3 / 3) Tj"));
}

#[test]
fn test_persist_then_reload_keeps_auto_and_fill_semantics() {
    let dir = tempfile::tempdir().unwrap();
    support::acme_family(dir.path());

    let director = open(dir.path()).unwrap();
    director.persist().unwrap();

    let saved = SettingsDocument::read(&dir.path().join("settings.yaml")).unwrap();
    let fonts = &saved.records[0].settings;
    assert_eq!(fonts.get(&["font_directory"]), Some(&Setting::Auto));
    assert_eq!(
        fonts.get_string_list(&["font_paths"]),
        Some(vec![
            "b-light.ttf".to_string(),
            "c-regular.ttf".to_string(),
            "a-bold.ttf".to_string()
        ])
    );
    let title = &saved.records[1].settings;
    assert_eq!(title.get(&["title"]), Some(&Setting::Auto));
    assert_eq!(title.get_str(&["subtitle"]), Some("Type Specimen"));
    // A filled sample is written out and no longer recomputed
    let text = &saved.records[3].settings;
    assert_eq!(
        text.get_str(&["sample"]),
        Some("The quick brown fox jumps over the lazy dog")
    );

    let reloaded = open(dir.path()).unwrap();
    for (before, after) in director.sections().iter().zip(reloaded.sections()) {
        assert_eq!(before.settings().resolved, after.settings().resolved);
    }
}

#[test]
fn test_user_settings_when_edited_then_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    support::acme_family(dir.path());
    fs::write(
        dir.path().join("settings.yaml"),
        "- template: fonts\n\
         - template: glyphs\n  settings:\n    font: Acme Sans Bold\n    columns: 4\n    categories: [Lowercases]\n\
         - template: text\n  settings:\n    sample: Hamburgefonstiv\n    sizes: [48]\n",
    )
    .unwrap();

    let director = open(dir.path()).unwrap();
    let glyphs: &GlyphsSection = section(&director);
    assert_eq!(glyphs.font(), "Acme Sans Bold");
    assert_eq!(glyphs.categories(), &["Lowercases".to_string()]);

    let text: &TextSection = section(&director);
    assert_eq!(text.sizes(), &[48.0]);
    assert_eq!(
        text.settings().resolved.get_value(&["sample"]),
        Some(&Value::from("Hamburgefonstiv"))
    );
}

#[test]
fn test_invalid_setting_when_columns_is_zero_then_load_fails() {
    let dir = tempfile::tempdir().unwrap();
    support::acme_family(dir.path());
    SettingsDocument::new(vec![
        SectionRecord::new("fonts", SettingsTree::new()),
        SectionRecord::new("glyphs", SettingsTree::new().with("columns", 0)),
    ])
    .write(&dir.path().join("settings.yaml"))
    .unwrap();

    match open(dir.path()) {
        Err(SettingsError::InvalidSetting { path, .. }) => assert_eq!(path, "glyphs.columns"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("zero columns accepted"),
    }
}

#[test]
fn test_invalid_setting_when_value_has_wrong_type_then_load_fails() {
    let cases: Vec<(&str, &str, Setting)> = vec![
        ("title", "subtitle", Setting::from(5)),
        ("title", "show_copyright", Setting::from("no")),
        ("text", "sample", Setting::from(42)),
        ("text", "label", Setting::from("off")),
        ("header", "text", Setting::from(Value::from(vec![1, 2]))),
    ];

    for (template, key, setting) in cases {
        let dir = tempfile::tempdir().unwrap();
        support::acme_family(dir.path());
        SettingsDocument::new(vec![
            SectionRecord::new("fonts", SettingsTree::new()),
            SectionRecord::new(template, SettingsTree::new().with(key, setting)),
        ])
        .write(&dir.path().join("settings.yaml"))
        .unwrap();

        let expected = format!("{template}.{key}");
        match open(dir.path()) {
            Err(SettingsError::InvalidSetting { path, .. }) => assert_eq!(path, expected),
            Err(other) => panic!("{expected}: unexpected error: {other}"),
            Ok(_) => panic!("{expected}: wrong type accepted"),
        }
    }
}

#[test]
fn test_default_registry_knows_every_builtin() {
    let registry = default_registry();
    for name in ["fonts", "title", "glyphs", "text", "header"] {
        assert!(registry.contains(name), "{name} missing");
        assert!(registry.default_document().contains_template(name));
    }
}

#[test]
fn test_open_when_folder_missing_then_error() {
    assert!(open(Path::new("/nonexistent/specimen")).is_err());
}
