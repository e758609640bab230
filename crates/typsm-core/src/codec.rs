// this_file: crates/typsm-core/src/codec.rs

//! Reading and writing the settings document
//!
//! The document is a YAML sequence of section records:
//!
//! ```yaml
//! - template: fonts
//!   settings:
//!     font_directory: <auto>
//!
//! - template: title
//! ```
//!
//! Key order survives the trip in both directions. Autofill tokens are plain
//! strings in the file and [`Setting::Auto`]/[`Setting::Fill`] in memory;
//! nothing else in the crate sees the string spelling.

use std::fs;
use std::path::Path;

use serde_yaml_ng::{Mapping, Number, Value as Yaml};

use crate::error::{Result, SettingsError};
use crate::tree::SettingsTree;
use crate::value::{Setting, TokenKind, Value, AUTO_TOKEN, FILL_TOKEN};

/// One section entry of the document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionRecord {
    /// Registered name of the section type
    pub template: String,
    pub settings: SettingsTree,
}

impl SectionRecord {
    pub fn new(template: impl Into<String>, settings: SettingsTree) -> Self {
        Self {
            template: template.into(),
            settings,
        }
    }
}

/// The whole settings document, records in file order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsDocument {
    pub records: Vec<SectionRecord>,
}

impl SettingsDocument {
    pub fn new(records: Vec<SectionRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_template(&self, template: &str) -> bool {
        self.records.iter().any(|r| r.template == template)
    }

    /// Read and parse the document at `path`
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|reason| SettingsError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse document text. An empty text is an empty document.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let yaml: Yaml = serde_yaml_ng::from_str(text).map_err(|e| e.to_string())?;
        let items = match yaml {
            Yaml::Null => return Ok(Self::default()),
            Yaml::Sequence(items) => items,
            other => return Err(format!("expected a list of sections, found {}", kind_of(&other))),
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| record_from_yaml(item).map_err(|e| format!("section {}: {e}", index + 1)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    /// Render the document as text, one blank-line separated block per record
    pub fn to_yaml(&self) -> Result<String> {
        let mut blocks = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let block = Yaml::Sequence(vec![record_to_yaml(record)?]);
            blocks.push(serde_yaml_ng::to_string(&block).map_err(|e| SettingsError::Encode(e.to_string()))?);
        }
        if blocks.is_empty() {
            return Ok("[]\n".to_string());
        }
        Ok(blocks.join("\n"))
    }

    /// Replace the file at `path` with this document
    ///
    /// The text goes to a sibling temporary file first and is renamed over
    /// the target, so readers see either the old or the new document.
    pub fn write(&self, path: &Path) -> Result<()> {
        let text = self.to_yaml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, text)?;
        fs::rename(&temp_path, path)?;
        log::debug!("wrote settings to {}", path.display());
        Ok(())
    }
}

fn record_from_yaml(item: Yaml) -> std::result::Result<SectionRecord, String> {
    let mut map = match item {
        Yaml::Mapping(map) => map,
        other => return Err(format!("expected a mapping, found {}", kind_of(&other))),
    };

    // `type` is the older spelling of `template`
    let template = match map.remove("template").or_else(|| map.remove("type")) {
        Some(Yaml::String(name)) => name,
        Some(other) => return Err(format!("`template` must be a string, found {}", kind_of(&other))),
        None => return Err("missing `template`".to_string()),
    };

    let settings = match map.remove("settings") {
        None | Some(Yaml::Null) => SettingsTree::new(),
        Some(Yaml::Mapping(settings)) => tree_from_mapping(settings)?,
        Some(other) => return Err(format!("`settings` must be a mapping, found {}", kind_of(&other))),
    };

    Ok(SectionRecord { template, settings })
}

fn tree_from_mapping(map: Mapping) -> std::result::Result<SettingsTree, String> {
    let mut tree = SettingsTree::new();
    for (key, value) in map {
        let key = match key {
            Yaml::String(key) => key,
            Yaml::Number(n) => n.to_string(),
            Yaml::Bool(b) => b.to_string(),
            other => return Err(format!("unsupported key {}", kind_of(&other))),
        };
        let setting = setting_from_yaml(value).map_err(|e| format!("{key}: {e}"))?;
        tree.insert(key, setting);
    }
    Ok(tree)
}

fn setting_from_yaml(value: Yaml) -> std::result::Result<Setting, String> {
    match value {
        Yaml::String(s) if s == AUTO_TOKEN => Ok(Setting::Auto),
        Yaml::String(s) if s == FILL_TOKEN => Ok(Setting::Fill),
        Yaml::Mapping(map) => Ok(Setting::Table(tree_from_mapping(map)?)),
        other => Ok(Setting::Literal(value_from_yaml(other)?)),
    }
}

fn value_from_yaml(value: Yaml) -> std::result::Result<Value, String> {
    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(value_from_yaml)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Yaml::Mapping(_) => return Err("mappings inside lists are not supported".to_string()),
        Yaml::Tagged(tagged) => return Err(format!("unsupported tag {}", tagged.tag)),
    })
}

fn record_to_yaml(record: &SectionRecord) -> Result<Yaml> {
    let mut map = Mapping::new();
    map.insert(Yaml::from("template"), Yaml::from(record.template.clone()));
    if !record.settings.is_empty() {
        let settings = tree_to_yaml(&record.settings, &record.template)?;
        map.insert(Yaml::from("settings"), settings);
    }
    Ok(Yaml::Mapping(map))
}

fn tree_to_yaml(tree: &SettingsTree, prefix: &str) -> Result<Yaml> {
    let mut map = Mapping::new();
    for (key, setting) in tree.iter() {
        let path = format!("{prefix}.{key}");
        map.insert(Yaml::from(key), setting_to_yaml(setting, &path)?);
    }
    Ok(Yaml::Mapping(map))
}

fn setting_to_yaml(setting: &Setting, path: &str) -> Result<Yaml> {
    Ok(match setting {
        Setting::Auto => Yaml::from(TokenKind::Auto.as_str()),
        Setting::Fill => Yaml::from(TokenKind::Fill.as_str()),
        Setting::Table(tree) => tree_to_yaml(tree, path)?,
        // A literal spelled like a token would read back as that token
        Setting::Literal(Value::String(s)) if s == AUTO_TOKEN || s == FILL_TOKEN => {
            return Err(SettingsError::Encode(format!("{path}: literal {s:?} reads back as a token")));
        }
        Setting::Literal(value) => value_to_yaml(value),
    })
}

fn value_to_yaml(value: &Value) -> Yaml {
    match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Bool(*b),
        Value::Integer(i) => Yaml::Number(Number::from(*i)),
        Value::Float(f) => Yaml::Number(Number::from(*f)),
        Value::String(s) => Yaml::String(s.clone()),
        Value::List(items) => Yaml::Sequence(items.iter().map(value_to_yaml).collect()),
    }
}

fn kind_of(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a list",
        Yaml::Mapping(_) => "a mapping",
        Yaml::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "\
- template: fonts
  settings:
    font_directory: <auto>
    font_paths:
    - Acme-Regular.otf
    - Acme-Bold.otf

- template: title
  settings:
    subtitle: Specimen
    zebra: 1
    apple:
      size: 12.5
      name: <fill>

- template: header
";

    #[test]
    fn test_parse_maps_tokens_and_keeps_order() {
        let doc = SettingsDocument::parse(DOCUMENT).unwrap();
        assert_eq!(doc.records.len(), 3);

        let fonts = &doc.records[0];
        assert_eq!(fonts.template, "fonts");
        assert_eq!(fonts.settings.get(&["font_directory"]), Some(&Setting::Auto));

        let title = &doc.records[1].settings;
        assert_eq!(title.keys().collect::<Vec<_>>(), vec!["subtitle", "zebra", "apple"]);
        assert_eq!(title.get(&["apple", "name"]), Some(&Setting::Fill));
        assert_eq!(title.get_f64(&["apple", "size"]), Some(12.5));
        assert_eq!(title.get_value(&["zebra"]), Some(&Value::Integer(1)));

        assert!(doc.records[2].settings.is_empty());
    }

    #[test]
    fn test_written_text_reads_back_identically() {
        let doc = SettingsDocument::parse(DOCUMENT).unwrap();
        let text = doc.to_yaml().unwrap();
        assert_eq!(SettingsDocument::parse(&text).unwrap(), doc);
        assert!(text.contains("font_directory: <auto>"));
        assert!(text.contains("\n\n- template: title"));
    }

    #[test]
    fn test_empty_settings_are_omitted() {
        let doc = SettingsDocument::new(vec![SectionRecord::new("header", SettingsTree::new())]);
        let text = doc.to_yaml().unwrap();
        assert!(!text.contains("settings"));
        assert!(text.contains("template: header"));
    }

    #[test]
    fn test_type_alias_and_empty_text() {
        let doc = SettingsDocument::parse("- type: glyphs\n").unwrap();
        assert_eq!(doc.records[0].template, "glyphs");

        assert!(SettingsDocument::parse("").unwrap().is_empty());
        assert!(SettingsDocument::parse("[]").unwrap().is_empty());
        assert_eq!(SettingsDocument::default().to_yaml().unwrap(), "[]\n");
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        assert!(SettingsDocument::parse("template: fonts").is_err());
        assert!(SettingsDocument::parse("- settings: {}").is_err());
        assert!(SettingsDocument::parse("- template: x\n  settings: [1]").is_err());
        assert!(SettingsDocument::parse("- template: x\n  settings:\n    a: [{b: 1}]").is_err());
    }

    #[test]
    fn test_literal_spelled_as_token_is_not_written() {
        let settings = SettingsTree::new().with("sample", Setting::Table(SettingsTree::new().with("text", "<fill>")));
        let document = SettingsDocument::new(vec![SectionRecord::new("text", settings)]);

        match document.to_yaml() {
            Err(SettingsError::Encode(reason)) => assert!(reason.starts_with("text.sample.text:"), "{reason}"),
            other => panic!("unexpected result: {other:?}"),
        }

        let list = SettingsTree::new().with("names", Value::from(vec!["<auto>"]));
        let document = SettingsDocument::new(vec![SectionRecord::new("text", list)]);
        assert!(document.to_yaml().is_ok());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acme-settings.yaml");
        std::fs::write(&path, "- template: stale\n").unwrap();

        let document = SettingsDocument::parse(DOCUMENT).unwrap();
        document.write(&path).unwrap();

        assert_eq!(SettingsDocument::read(&path).unwrap(), document);
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["acme-settings.yaml".to_string()]);
    }

    #[test]
    fn test_unicode_survives() {
        let doc = SettingsDocument::new(vec![SectionRecord::new(
            "text",
            SettingsTree::new().with("sample", "Ærøskøbing → Łódź"),
        )]);
        let text = doc.to_yaml().unwrap();
        let back = SettingsDocument::parse(&text).unwrap();
        assert_eq!(back.records[0].settings.get_str(&["sample"]), Some("Ærøskøbing → Łódź"));
    }
}
