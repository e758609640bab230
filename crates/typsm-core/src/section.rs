// this_file: crates/typsm-core/src/section.rs

//! Sections: independently configured parts of a specimen
//!
//! A section type declares its defaults and resolvers through [`Autofill`]
//! and its drawing through [`Section`]. [`autofill`] builds an instance:
//!
//! 1. `raw` = defaults merged with the user's settings
//! 2. `before_autofill`, then `will_autofill`
//! 3. every leaf of `raw`, in flattened order, lands in `resolved` and `fill`:
//!    - `<auto>`: resolved value in `resolved`, the token itself in `fill`
//!    - `<fill>`: resolved value in both
//!    - anything else: copied to both
//! 4. `did_autofill`, then `after_autofill`
//!
//! Any error aborts construction; there are no half-built sections.

use std::any::Any;
use std::path::Path;

use crate::error::{Result, SettingsError};
use crate::fonts::FontCollection;
use crate::resolver::{resolve, AutofillScope, ResolverTable};
use crate::traits::{Canvas, FontProvider, GlyphClassifier};
use crate::tree::SettingsTree;
use crate::value::{Setting, TokenKind};

/// What the director lends a section while it is being built
pub struct Environment<'a> {
    /// The path the director was opened with
    pub input_path: &'a Path,
    /// Directory holding the settings document
    pub root_dir: &'a Path,
    pub provider: &'a dyn FontProvider,
    /// The font collection, once it has been built
    pub fonts: Option<&'a FontCollection>,
}

/// What the director lends a section while it draws
pub struct DrawContext<'a> {
    pub fonts: &'a FontCollection,
    pub classifier: &'a dyn GlyphClassifier,
}

/// The trees a section owns once built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionSettings {
    /// The type's template, as produced for this instance
    pub defaults: SettingsTree,
    /// Defaults merged with user settings, tokens included
    pub raw: SettingsTree,
    /// Concrete values used at runtime
    pub resolved: SettingsTree,
    /// What gets written back to storage
    pub fill: SettingsTree,
}

/// A built section as the director sees it
pub trait Section: Any {
    /// Used in logs and error messages
    fn name(&self) -> &'static str;

    fn settings(&self) -> &SectionSettings;

    /// Sections that decorate every page (running headers, folios) are drawn
    /// after all other sections, once per page
    fn draws_across_all_pages(&self) -> bool {
        false
    }

    fn draw(&self, canvas: &mut dyn Canvas, ctx: &DrawContext<'_>) -> Result<()> {
        log::info!("-- drawing {}", self.name());
        self.draw_page(canvas, ctx)
    }

    fn draw_page(&self, _canvas: &mut dyn Canvas, _ctx: &DrawContext<'_>) -> Result<()> {
        log::warn!("{} must override draw_page(); nothing drawn", self.name());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
}

/// How a section type fills in its settings
///
/// The `before_`/`after_` hooks belong to framework section types; the
/// `will_`/`did_` hooks are the ones concrete sections normally override.
pub trait Autofill: Section + Default {
    /// Template settings for a fresh instance
    fn defaults() -> SettingsTree;

    fn resolvers() -> ResolverTable<Self> {
        ResolverTable::new()
    }

    fn settings_mut(&mut self) -> &mut SectionSettings;

    fn before_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        Ok(())
    }

    fn will_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        Ok(())
    }

    fn did_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        Ok(())
    }

    fn after_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
        Ok(())
    }
}

/// Build a section of type `S` from the user's settings
pub fn autofill<S: Autofill>(env: &Environment<'_>, user_settings: &SettingsTree) -> Result<S> {
    let mut section = S::default();
    let name = section.name();

    let defaults = S::defaults();
    let raw = SettingsTree::merge(&defaults, user_settings);

    section.before_autofill(env)?;
    section.will_autofill(env)?;

    let resolvers = S::resolvers();
    let mut resolved = SettingsTree::new();
    let mut fill = SettingsTree::new();

    for (path, setting) in raw.flatten() {
        match setting.token() {
            Some(kind) => {
                let scope = AutofillScope {
                    env,
                    resolved: &resolved,
                };
                let value = resolve(name, &path, kind, &mut section, &resolvers, &defaults, &scope)?;
                match kind {
                    TokenKind::Auto => fill.set(path.segments(), Setting::Auto),
                    TokenKind::Fill => fill.set(path.segments(), value.clone()),
                }
                resolved.set(path.segments(), value);
            }
            None => {
                fill.set(path.segments(), setting.clone());
                resolved.set(path.segments(), setting.clone());
            }
        }
    }
    debug_assert!(!resolved.has_tokens());

    *section.settings_mut() = SectionSettings {
        defaults,
        raw,
        resolved,
        fill,
    };

    section.did_autofill(env)?;
    section.after_autofill(env)?;

    log::debug!("{name}: settings resolved");
    Ok(section)
}

/// Report a resolved value that is missing or has the wrong type
pub fn invalid_setting(section: &str, key: &str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidSetting {
        path: format!("{section}.{key}"),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::error::FontLoadError;
    use crate::traits::FontFace;
    use crate::tree::KeyPath;
    use crate::value::Value;

    struct NoFonts;

    impl FontProvider for NoFonts {
        fn discover(&self, path: &Path) -> Result<Vec<PathBuf>> {
            Err(FontLoadError::FontNotFound(path.to_path_buf()).into())
        }

        fn load(&self, path: &Path) -> Result<Arc<dyn FontFace>> {
            Err(FontLoadError::FontNotFound(path.to_path_buf()).into())
        }
    }

    fn env() -> Environment<'static> {
        Environment {
            input_path: Path::new("/tmp/specimen"),
            root_dir: Path::new("/tmp/specimen"),
            provider: &NoFonts,
            fonts: None,
        }
    }

    macro_rules! section_boilerplate {
        ($name:literal) => {
            fn name(&self) -> &'static str {
                $name
            }

            fn settings(&self) -> &SectionSettings {
                &self.settings
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        };
    }

    #[derive(Default)]
    struct Demo {
        settings: SectionSettings,
        hooks: Vec<&'static str>,
    }

    impl Section for Demo {
        section_boilerplate!("demo");
    }

    impl Autofill for Demo {
        fn defaults() -> SettingsTree {
            SettingsTree::new()
                .with("subtitle", "cool")
                .with(
                    "info",
                    SettingsTree::new().with("name", Setting::Fill).with("age", "37"),
                )
                .with("class_test", Setting::Auto)
        }

        fn resolvers() -> ResolverTable<Self> {
            ResolverTable::new()
                .with(&["class_test"], |_, _| Ok(Value::from("auto class")))
                .with(&["info", "name"], |_, _| Ok(Value::from("auto name")))
        }

        fn settings_mut(&mut self) -> &mut SectionSettings {
            &mut self.settings
        }

        fn before_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
            self.hooks.push("before");
            Ok(())
        }

        fn will_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
            self.hooks.push("will");
            Ok(())
        }

        fn did_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
            self.hooks.push("did");
            Ok(())
        }

        fn after_autofill(&mut self, _env: &Environment<'_>) -> Result<()> {
            self.hooks.push("after");
            Ok(())
        }
    }

    #[test]
    fn test_auto_falls_back_to_default_and_keeps_token_in_fill() {
        let user = SettingsTree::new().with("subtitle", Setting::Auto);
        let demo: Demo = autofill(&env(), &user).unwrap();

        assert_eq!(demo.settings.resolved.get_str(&["subtitle"]), Some("cool"));
        assert_eq!(demo.settings.fill.get(&["subtitle"]), Some(&Setting::Auto));
    }

    #[test]
    fn test_fill_is_consumed_in_both_trees() {
        let demo: Demo = autofill(&env(), &SettingsTree::new()).unwrap();

        assert_eq!(
            demo.settings.resolved.get_str(&["info", "name"]),
            Some("auto name")
        );
        assert_eq!(demo.settings.fill.get_str(&["info", "name"]), Some("auto name"));
        assert!(!demo.settings.fill.flatten().iter().any(|(_, s)| **s == Setting::Fill));
    }

    #[test]
    fn test_resolver_wins_over_default() {
        #[derive(Default)]
        struct Shadowed {
            settings: SectionSettings,
        }
        impl Section for Shadowed {
            section_boilerplate!("shadowed");
        }
        impl Autofill for Shadowed {
            fn defaults() -> SettingsTree {
                SettingsTree::new().with("subtitle", "from defaults")
            }
            fn resolvers() -> ResolverTable<Self> {
                ResolverTable::new().with(&["subtitle"], |_, _| Ok(Value::from("from resolver")))
            }
            fn settings_mut(&mut self) -> &mut SectionSettings {
                &mut self.settings
            }
        }

        let user = SettingsTree::new().with("subtitle", Setting::Auto);
        let section: Shadowed = autofill(&env(), &user).unwrap();
        assert_eq!(
            section.settings.resolved.get_str(&["subtitle"]),
            Some("from resolver")
        );
    }

    #[test]
    fn test_unresolvable_token_fails_construction() {
        let user = SettingsTree::new().with("nowhere", Setting::Fill);
        let result: Result<Demo> = autofill(&env(), &user);

        match result {
            Err(SettingsError::UnresolvedToken { section, path, kind }) => {
                assert_eq!(section, "demo");
                assert_eq!(path, KeyPath::parse("nowhere"));
                assert_eq!(kind, TokenKind::Fill);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("construction should fail"),
        }
    }

    #[test]
    fn test_hooks_run_in_order() {
        let demo: Demo = autofill(&env(), &SettingsTree::new()).unwrap();
        assert_eq!(demo.hooks, vec!["before", "will", "did", "after"]);
    }

    #[test]
    fn test_resolved_has_no_tokens_and_keeps_raw_order() {
        let user = SettingsTree::new().with("extra", 1).with("subtitle", "mine");
        let demo: Demo = autofill(&env(), &user).unwrap();

        assert!(!demo.settings.resolved.has_tokens());
        let order: Vec<String> = demo
            .settings
            .resolved
            .flatten()
            .iter()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(
            order,
            vec!["subtitle", "info.name", "info.age", "class_test", "extra"]
        );
        assert_eq!(demo.settings.resolved.get_str(&["subtitle"]), Some("mine"));
    }

    #[test]
    fn test_resolver_sees_only_earlier_keys() {
        #[derive(Default)]
        struct Chained {
            settings: SectionSettings,
        }
        impl Section for Chained {
            section_boilerplate!("chained");
        }
        fn shout(_: &mut Chained, scope: &AutofillScope<'_>) -> Result<Value> {
            Ok(match scope.resolved.get_str(&["base"]) {
                Some(base) => Value::from(base.to_uppercase()),
                None => Value::Null,
            })
        }
        impl Autofill for Chained {
            fn defaults() -> SettingsTree {
                SettingsTree::new()
                    .with("before", Setting::Auto)
                    .with("base", "abc")
                    .with("after", Setting::Auto)
            }
            fn resolvers() -> ResolverTable<Self> {
                ResolverTable::new()
                    .with(&["before"], shout)
                    .with(&["after"], shout)
            }
            fn settings_mut(&mut self) -> &mut SectionSettings {
                &mut self.settings
            }
        }

        let section: Chained = autofill(&env(), &SettingsTree::new()).unwrap();
        let resolved = &section.settings.resolved;
        assert_eq!(resolved.get_value(&["before"]), Some(&Value::Null));
        assert_eq!(resolved.get_str(&["after"]), Some("ABC"));
    }

    #[test]
    fn test_defaults_are_fresh_per_instance() {
        let first: Demo = autofill(&env(), &SettingsTree::new()).unwrap();
        let mut first_defaults = first.settings.defaults.clone();
        first_defaults.set(&["info", "age"], "99");

        let second: Demo = autofill(&env(), &SettingsTree::new()).unwrap();
        assert_eq!(second.settings.defaults.get_str(&["info", "age"]), Some("37"));
    }
}
