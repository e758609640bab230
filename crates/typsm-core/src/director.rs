// this_file: crates/typsm-core/src/director.rs

//! The director owns a specimen run
//!
//! It finds and reads the settings document, builds one section per record,
//! draws them in order and writes the reduced settings back.

use std::any::TypeId;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::codec::{SectionRecord, SettingsDocument};
use crate::error::{FontLoadError, Result, SettingsError};
use crate::fonts::{FontCollection, FONT_COLLECTION};
use crate::section::{autofill, Autofill, DrawContext, Environment, Section};
use crate::traits::{Canvas, FontProvider, GlyphClassifier};
use crate::tree::SettingsTree;

/// File name of a freshly created settings document
pub const SETTINGS_FILE_NAME: &str = "settings.yaml";

type Factory = fn(&Environment<'_>, &SettingsTree) -> Result<Box<dyn Section>>;

struct RegistryEntry {
    name: &'static str,
    type_id: TypeId,
    build: Factory,
}

fn build<S: Autofill>(env: &Environment<'_>, settings: &SettingsTree) -> Result<Box<dyn Section>> {
    Ok(Box::new(autofill::<S>(env, settings)?))
}

/// Section types known by name, plus the document used when none exists
pub struct Registry {
    entries: Vec<RegistryEntry>,
    default_document: SettingsDocument,
}

impl Registry {
    /// A registry that knows the font collection and nothing else
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            default_document: SettingsDocument::default(),
        }
        .register::<FontCollection>(FONT_COLLECTION)
    }

    /// Register `S` under `name`. Registering a name again replaces it.
    pub fn register<S: Autofill>(mut self, name: &'static str) -> Self {
        self.entries.retain(|e| e.name != name);
        self.entries.push(RegistryEntry {
            name,
            type_id: TypeId::of::<S>(),
            build: build::<S>,
        });
        self
    }

    /// Document written when a specimen directory has no settings yet
    pub fn with_default_document(mut self, document: SettingsDocument) -> Self {
        self.default_document = document;
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn default_document(&self) -> &SettingsDocument {
        &self.default_document
    }

    fn factory(&self, name: &str) -> Option<Factory> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.build)
    }

    /// The registered name of a built section's concrete type
    pub fn name_of(&self, section: &dyn Section) -> Option<&'static str> {
        let type_id = section.as_any().type_id();
        self.entries
            .iter()
            .find(|e| e.type_id == type_id)
            .map(|e| e.name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads, builds, draws and persists one specimen
pub struct Director {
    input_path: PathBuf,
    root_dir: PathBuf,
    settings_path: PathBuf,
    registry: Registry,
    sections: Vec<Box<dyn Section>>,
    font_index: Option<usize>,
}

impl Director {
    /// Open the specimen at `input_path`, a directory or a file inside one
    pub fn load(input_path: &Path, registry: Registry, provider: &dyn FontProvider) -> Result<Self> {
        if !input_path.exists() {
            return Err(FontLoadError::FontNotFound(input_path.to_path_buf()).into());
        }
        if !registry.contains(FONT_COLLECTION) {
            return Err(SettingsError::MissingFontCollection(FONT_COLLECTION));
        }

        let root_dir = if input_path.is_dir() {
            input_path.to_path_buf()
        } else {
            match input_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        };

        let (settings_path, document) = match find_settings_file(&root_dir)? {
            Some(path) => {
                log::info!("-- loading settings from {}", path.display());
                let document = SettingsDocument::read(&path)?;
                (path, document)
            }
            None => {
                let path = root_dir.join(SETTINGS_FILE_NAME);
                log::info!("-- no settings file found, creating {}", path.display());
                let document = registry.default_document().clone();
                document.write(&path)?;
                (path, document)
            }
        };

        let mut director = Self {
            input_path: input_path.to_path_buf(),
            root_dir,
            settings_path,
            registry,
            sections: Vec::new(),
            font_index: None,
        };
        director.instantiate_sections(&document, provider)?;
        Ok(director)
    }

    /// Build one section per known record, replacing any built before
    ///
    /// Font collection records are built first so the others can query the
    /// collection while resolving. The resulting list keeps document order.
    pub fn instantiate_sections(
        &mut self,
        document: &SettingsDocument,
        provider: &dyn FontProvider,
    ) -> Result<()> {
        let mut env = Environment {
            input_path: &self.input_path,
            root_dir: &self.root_dir,
            provider,
            fonts: None,
        };

        let mut collections: Vec<(usize, Box<dyn Section>)> = Vec::new();
        for (index, record) in document.records.iter().enumerate() {
            if record.template == FONT_COLLECTION {
                let factory = self
                    .registry
                    .factory(FONT_COLLECTION)
                    .ok_or(SettingsError::MissingFontCollection(FONT_COLLECTION))?;
                collections.push((index, factory(&env, &record.settings)?));
            }
        }
        if collections.len() > 1 {
            log::warn!(
                "{} `{FONT_COLLECTION}` sections found; only the first one is used",
                collections.len()
            );
        }

        env.fonts = collections
            .first()
            .and_then(|(_, section)| section.as_any().downcast_ref::<FontCollection>());

        let mut others: Vec<(usize, Box<dyn Section>)> = Vec::new();
        for (index, record) in document.records.iter().enumerate() {
            if record.template == FONT_COLLECTION {
                continue;
            }
            match self.registry.factory(&record.template) {
                Some(factory) => others.push((index, factory(&env, &record.settings)?)),
                None => log::warn!("unknown section type `{}`, skipped", record.template),
            }
        }

        let mut built: Vec<(usize, Box<dyn Section>)> = collections;
        built.extend(others);
        built.sort_by_key(|(index, _)| *index);
        self.sections = built.into_iter().map(|(_, section)| section).collect();
        self.font_index = self
            .sections
            .iter()
            .position(|s| s.as_any().is::<FontCollection>());
        Ok(())
    }

    pub fn font_collection(&self) -> Option<&FontCollection> {
        self.font_index
            .and_then(|index| self.sections.get(index))
            .and_then(|s| s.as_any().downcast_ref::<FontCollection>())
    }

    pub fn sections(&self) -> &[Box<dyn Section>] {
        &self.sections
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Draw every section onto `canvas`
    ///
    /// Sections draw in document order. Those that decorate every page wait
    /// until the rest are done and then draw once on each page.
    pub fn draw(&self, canvas: &mut dyn Canvas, classifier: &dyn GlyphClassifier) -> Result<()> {
        let fonts = self
            .font_collection()
            .ok_or(SettingsError::MissingFontCollection(FONT_COLLECTION))?;
        let ctx = DrawContext { fonts, classifier };

        let mut deferred = Vec::new();
        for (index, section) in self.sections.iter().enumerate() {
            if Some(index) == self.font_index || section.as_any().is::<FontCollection>() {
                continue;
            }
            if section.draws_across_all_pages() {
                deferred.push(section);
            } else {
                section.draw(canvas, &ctx)?;
            }
        }

        for section in deferred {
            for page in 0..canvas.page_count() {
                canvas.select_page(page)?;
                section.draw(canvas, &ctx)?;
            }
        }
        Ok(())
    }

    /// `<dir>/<YYYYMMDD-HHMM>-specimen-<collection>.pdf`, `dir` defaulting to
    /// the root directory
    pub fn output_path(&self, output_dir: Option<&Path>, now: NaiveDateTime) -> Result<PathBuf> {
        let fonts = self
            .font_collection()
            .ok_or(SettingsError::MissingFontCollection(FONT_COLLECTION))?;
        let dir = output_dir.unwrap_or(&self.root_dir);
        Ok(dir.join(format!(
            "{}-specimen-{}.pdf",
            now.format("%Y%m%d-%H%M"),
            fonts.collection_filename()
        )))
    }

    /// The document as it would be written back: every section's fill tree
    pub fn settings_document(&self) -> SettingsDocument {
        let records = self
            .sections
            .iter()
            .filter_map(|section| match self.registry.name_of(section.as_ref()) {
                Some(name) => Some(SectionRecord::new(name, section.settings().fill.clone())),
                None => {
                    log::warn!("section `{}` has no registered name, not saved", section.name());
                    None
                }
            })
            .collect();
        SettingsDocument::new(records)
    }

    /// Replace the settings file with [`settings_document`](Self::settings_document)
    pub fn persist(&self) -> Result<()> {
        log::info!("-- saving settings to {}", self.settings_path.display());
        self.settings_document().write(&self.settings_path)
    }
}

/// First `*settings.yaml` file in `dir`, in name order
fn find_settings_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(SETTINGS_FILE_NAME));
        if matches && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}
