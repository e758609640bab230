//! Token resolution
//!
//! Every section declares a static [`ResolverTable`]: key paths mapped to
//! plain functions. A token at a path with a resolver is computed by that
//! function; otherwise the section's defaults are consulted; otherwise the
//! token is unresolvable and section construction fails.

use std::fmt;

use crate::error::{Result, SettingsError};
use crate::section::Environment;
use crate::tree::{KeyPath, SettingsTree};
use crate::value::{Setting, TokenKind, Value};

/// What a resolver gets to look at besides its own section
///
/// `resolved` is the tree built so far in the current pass: keys ordered
/// before the token being resolved are present, later keys are not.
pub struct AutofillScope<'a> {
    pub env: &'a Environment<'a>,
    pub resolved: &'a SettingsTree,
}

/// Computes the value of one token for a section of type `S`
pub type Resolver<S> = fn(&mut S, &AutofillScope<'_>) -> Result<Value>;

/// Key path → resolver mapping declared by a section type
pub struct ResolverTable<S> {
    entries: Vec<(&'static [&'static str], Resolver<S>)>,
}

impl<S> ResolverTable<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind `resolver` to `path`. A later binding of the same path wins.
    pub fn with(mut self, path: &'static [&'static str], resolver: Resolver<S>) -> Self {
        self.entries.retain(|(existing, _)| *existing != path);
        self.entries.push((path, resolver));
        self
    }

    pub fn lookup(&self, path: &KeyPath) -> Option<Resolver<S>> {
        self.entries
            .iter()
            .find(|(segments, _)| path.matches(segments))
            .map(|(_, resolver)| *resolver)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> Default for ResolverTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for ResolverTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(path, _)| path.join(".")))
            .finish()
    }
}

/// Resolve the token found at `path`
///
/// A bound resolver always takes precedence over a default at the same
/// path. A default that is itself a token (or a table still holding tokens)
/// does not count as a value.
pub fn resolve<S>(
    section: &'static str,
    path: &KeyPath,
    kind: TokenKind,
    state: &mut S,
    resolvers: &ResolverTable<S>,
    defaults: &SettingsTree,
    scope: &AutofillScope<'_>,
) -> Result<Setting> {
    if let Some(resolver) = resolvers.lookup(path) {
        log::debug!("{section}: resolving {kind} `{path}` with bound resolver");
        return resolver(state, scope).map(Setting::Literal);
    }

    match defaults.get(path.segments()) {
        Some(Setting::Literal(value)) => {
            log::debug!("{section}: resolving {kind} `{path}` from defaults");
            Ok(Setting::Literal(value.clone()))
        }
        Some(Setting::Table(table)) if !table.has_tokens() => Ok(Setting::Table(table.clone())),
        _ => Err(SettingsError::UnresolvedToken {
            section,
            path: path.clone(),
            kind,
        }),
    }
}
