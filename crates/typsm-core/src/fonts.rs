//! The font collection section
//!
//! Every specimen is about one collection of fonts. This section finds them,
//! records where they are, and answers questions about them for the other
//! sections and for output naming. It supplies data and draws nothing.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{FontLoadError, Result};
use crate::resolver::{AutofillScope, ResolverTable};
use crate::section::{invalid_setting, Autofill, Environment, Section, SectionSettings};
use crate::traits::FontFace;
use crate::tree::SettingsTree;
use crate::value::{Setting, Value};

/// Registry name of the font collection section
pub const FONT_COLLECTION: &str = "fonts";

/// Loaded fonts plus the settings that locate them
///
/// `font_directory` and `font_paths` are stored relative to the settings
/// document's directory.
#[derive(Default)]
pub struct FontCollection {
    settings: SectionSettings,
    fonts: Vec<Arc<dyn FontFace>>,
    /// Set when `font_paths` was discovered (and sorted) during this run
    discovered: bool,
}

impl Section for FontCollection {
    fn name(&self) -> &'static str {
        FONT_COLLECTION
    }

    fn settings(&self) -> &SectionSettings {
        &self.settings
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Autofill for FontCollection {
    fn defaults() -> SettingsTree {
        SettingsTree::new()
            .with("font_directory", Setting::Auto)
            .with("font_paths", Setting::Auto)
    }

    fn resolvers() -> ResolverTable<Self> {
        ResolverTable::new()
            .with(&["font_directory"], Self::resolve_font_directory)
            .with(&["font_paths"], Self::resolve_font_paths)
    }

    fn settings_mut(&mut self) -> &mut SectionSettings {
        &mut self.settings
    }

    fn before_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        self.discovered = false;
        self.fonts.clear();
        Ok(())
    }

    fn after_autofill(&mut self, env: &Environment<'_>) -> Result<()> {
        if !self.discovered {
            let listed = self
                .settings
                .resolved
                .get_string_list(&["font_paths"])
                .ok_or_else(|| invalid_setting(FONT_COLLECTION, "font_paths", "expected a list of paths"))?;
            self.fonts = load_listed(env, &listed)?;
        }
        if self.fonts.is_empty() {
            return Err(FontLoadError::EmptyCollection.into());
        }

        let paths: Vec<Value> = self
            .fonts
            .iter()
            .map(|font| Value::from(relative_to(font.path(), env.root_dir)))
            .collect();
        self.settings.resolved.set(&["font_paths"], Value::List(paths));

        log::info!(
            "-- loaded {} font(s): {}",
            self.fonts.len(),
            self.collection_name()
        );
        Ok(())
    }
}

impl FontCollection {
    fn resolve_font_directory(&mut self, scope: &AutofillScope<'_>) -> Result<Value> {
        let env = scope.env;
        Ok(Value::from(relative_to(env.input_path, env.root_dir)))
    }

    fn resolve_font_paths(&mut self, scope: &AutofillScope<'_>) -> Result<Value> {
        let env = scope.env;
        let directory = scope
            .resolved
            .get_str(&["font_directory"])
            .ok_or_else(|| {
                invalid_setting(FONT_COLLECTION, "font_directory", "must be resolved before font_paths")
            })?;

        let found = env.provider.discover(&env.root_dir.join(directory))?;
        let mut fonts = found
            .iter()
            .map(|path| env.provider.load(path))
            .collect::<Result<Vec<_>>>()?;
        fonts.sort_by_key(|font| font.sort_key());

        let paths = fonts
            .iter()
            .map(|font| Value::from(relative_to(font.path(), env.root_dir)))
            .collect();
        self.fonts = fonts;
        self.discovered = true;
        Ok(Value::List(paths))
    }

    /// The loaded fonts, in collection order
    pub fn fonts(&self) -> &[Arc<dyn FontFace>] {
        &self.fonts
    }

    pub fn first(&self) -> Option<&Arc<dyn FontFace>> {
        self.fonts.first()
    }

    /// Absolute locations of the fonts, in collection order
    pub fn absolute_font_paths(&self) -> Vec<PathBuf> {
        self.fonts.iter().map(|f| f.path().to_path_buf()).collect()
    }

    /// Family names in collection order, duplicates removed
    pub fn common_family_names(&self) -> Vec<String> {
        dedupe(self.fonts.iter().map(|f| f.family_name()))
    }

    /// Style names in collection order, duplicates removed
    pub fn common_style_names(&self) -> Vec<String> {
        dedupe(self.fonts.iter().map(|f| f.style_name()))
    }

    pub fn copyrights(&self) -> Vec<String> {
        dedupe(self.fonts.iter().filter_map(|f| f.copyright()))
    }

    /// `Family` for a multi-style collection, `Family-Style` for a single style
    pub fn collection_name(&self) -> String {
        let families = self.common_family_names().concat();
        let styles = self.common_style_names();
        if styles.len() > 1 {
            families
        } else {
            format!("{}-{}", families, styles.concat())
        }
    }

    /// [`collection_name`](Self::collection_name) without spaces
    pub fn collection_filename(&self) -> String {
        self.collection_name().replace(' ', "")
    }

    /// The font called `Family Style`, or the first font when none matches
    pub fn font_by_family_style(&self, name: &str) -> Option<&Arc<dyn FontFace>> {
        self.fonts
            .iter()
            .find(|f| f.full_name() == name)
            .or_else(|| self.fonts.first())
    }

    pub fn fonts_by_style(&self, style: &str) -> Vec<&Arc<dyn FontFace>> {
        self.fonts
            .iter()
            .filter(|f| f.style_name() == style)
            .collect()
    }

    /// Script coverage of the first font
    ///
    /// Only the first font is inspected; collections are assumed to share
    /// their character set.
    pub fn script_support(&self) -> Vec<(String, usize)> {
        self.fonts
            .first()
            .map(|f| f.script_coverage())
            .unwrap_or_default()
    }
}

/// Load fonts listed relative to the root directory, in listed order.
/// A listed directory contributes its fonts in discovery order.
fn load_listed(env: &Environment<'_>, listed: &[String]) -> Result<Vec<Arc<dyn FontFace>>> {
    let mut fonts = Vec::new();
    for entry in listed {
        for path in env.provider.discover(&env.root_dir.join(entry))? {
            fonts.push(env.provider.load(&path)?);
        }
    }
    Ok(fonts)
}

/// `path` relative to `root` when it lies inside it, `.` for the root itself
fn relative_to(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

fn dedupe(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
