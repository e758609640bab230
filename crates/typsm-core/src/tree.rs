// this_file: crates/typsm-core/src/tree.rs

//! Ordered settings trees and path operations
//!
//! Key order is part of the contract: it decides the order in which tokens
//! are resolved and the order in which keys are written back to storage.
//! [`SettingsTree::merge`] therefore keeps the base order and only appends
//! keys the override introduces.

use std::fmt;
use std::ops::Deref;

use crate::value::{Setting, Value};

/// A path of keys into a nested [`SettingsTree`], displayed dotted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn new<S: AsRef<str>>(segments: &[S]) -> Self {
        Self(segments.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// Parse a dotted path such as `info.name`
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether this path spells exactly `segments`
    pub fn matches(&self, segments: &[&str]) -> bool {
        self.0.len() == segments.len() && self.0.iter().zip(segments).all(|(a, b)| a == b)
    }

    fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }
}

impl Deref for KeyPath {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments)
    }
}

/// Insertion-ordered mapping from key to [`Setting`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsTree {
    entries: Vec<(String, Setting)>,
}

impl SettingsTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for declaring defaults
    pub fn with(mut self, key: impl Into<String>, setting: impl Into<Setting>) -> Self {
        self.insert(key, setting);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setting)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn entry(&self, key: &str) -> Option<&Setting> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Setting> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert at the top level. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, setting: impl Into<Setting>) {
        let key = key.into();
        let setting = setting.into();
        match self.entry_mut(&key) {
            Some(slot) => *slot = setting,
            None => self.entries.push((key, setting)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Setting> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Look up a nested path
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Setting> {
        let (last, parents) = path.split_last()?;
        let mut tree = self;
        for key in parents {
            tree = tree.entry(key.as_ref())?.as_table()?;
        }
        tree.entry(last.as_ref())
    }

    pub fn contains<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.get(path).is_some()
    }

    /// Set a nested path, creating intermediate tables as needed
    ///
    /// An intermediate key holding a non-table value is replaced by a table.
    /// An empty path is ignored.
    pub fn set<S: AsRef<str>>(&mut self, path: &[S], setting: impl Into<Setting>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut tree = self;
        for key in parents {
            let key = key.as_ref();
            if !matches!(tree.entry(key), Some(Setting::Table(_))) {
                tree.insert(key, SettingsTree::new());
            }
            tree = match tree.entry_mut(key) {
                Some(Setting::Table(child)) => child,
                _ => unreachable!("intermediate key was just made a table"),
            };
        }
        tree.insert(last.as_ref(), setting);
    }

    /// Merge `overrides` onto `base`
    ///
    /// Keys keep `base`'s order; a key present in both takes the override's
    /// value in `base`'s position; keys only in `overrides` are appended in
    /// their own order. The result owns all of its data.
    pub fn merge(base: &SettingsTree, overrides: &SettingsTree) -> SettingsTree {
        let mut merged = base.clone();
        for (key, setting) in overrides.iter() {
            merged.insert(key, setting.clone());
        }
        merged
    }

    /// Leaves in depth-first insertion order
    ///
    /// Tables are recursed into; literals and tokens are leaves. An empty
    /// table yields nothing.
    pub fn flatten(&self) -> Vec<(KeyPath, &Setting)> {
        let mut leaves = Vec::new();
        self.collect_leaves(&KeyPath::default(), &mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, prefix: &KeyPath, leaves: &mut Vec<(KeyPath, &'a Setting)>) {
        for (key, setting) in &self.entries {
            let path = prefix.child(key);
            match setting {
                Setting::Table(child) => child.collect_leaves(&path, leaves),
                leaf => leaves.push((path, leaf)),
            }
        }
    }

    /// Whether any leaf is still an autofill token
    pub fn has_tokens(&self) -> bool {
        self.flatten().iter().any(|(_, setting)| setting.is_token())
    }

    pub fn get_value<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        self.get(path)?.as_value()
    }

    pub fn get_str<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        self.get_value(path)?.as_str()
    }

    pub fn get_bool<S: AsRef<str>>(&self, path: &[S]) -> Option<bool> {
        self.get_value(path)?.as_bool()
    }

    pub fn get_f64<S: AsRef<str>>(&self, path: &[S]) -> Option<f64> {
        self.get_value(path)?.as_f64()
    }

    pub fn get_list<S: AsRef<str>>(&self, path: &[S]) -> Option<&[Value]> {
        self.get_value(path)?.as_list()
    }

    /// A list of strings; non-string items are skipped
    pub fn get_string_list<S: AsRef<str>>(&self, path: &[S]) -> Option<Vec<String>> {
        let items = self.get_list(path)?;
        Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        )
    }
}
