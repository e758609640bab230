//! Leaf values and autofill tokens
//!
//! A settings leaf is either a concrete [`Value`] or one of the two autofill
//! tokens. Tokens only exist as strings at the storage boundary (see
//! [`crate::codec`]); everywhere else they are variants of [`Setting`].

use std::fmt;

use crate::tree::SettingsTree;

/// Storage spelling of the AUTO token
pub const AUTO_TOKEN: &str = "<auto>";
/// Storage spelling of the FILL token
pub const FILL_TOKEN: &str = "<fill>";

/// Which autofill protocol a token requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Recomputed on every run, persisted as the token itself
    Auto,
    /// Computed once, persisted as the computed value
    Fill,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Auto => AUTO_TOKEN,
            TokenKind::Fill => FILL_TOKEN,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete settings value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numbers of either flavor, as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// One entry of a [`SettingsTree`]: a leaf or a nested table
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Literal(Value),
    Auto,
    Fill,
    Table(SettingsTree),
}

impl Setting {
    /// The token kind, if this leaf is a token
    pub fn token(&self) -> Option<TokenKind> {
        match self {
            Setting::Auto => Some(TokenKind::Auto),
            Setting::Fill => Some(TokenKind::Fill),
            _ => None,
        }
    }

    pub fn is_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Setting::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&SettingsTree> {
        match self {
            Setting::Table(tree) => Some(tree),
            _ => None,
        }
    }
}

impl From<TokenKind> for Setting {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Auto => Setting::Auto,
            TokenKind::Fill => Setting::Fill,
        }
    }
}

impl From<Value> for Setting {
    fn from(value: Value) -> Self {
        Setting::Literal(value)
    }
}

impl From<SettingsTree> for Setting {
    fn from(tree: SettingsTree) -> Self {
        Setting::Table(tree)
    }
}

macro_rules! literal_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Setting {
                fn from(value: $ty) -> Self {
                    Setting::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from!(bool, i64, i32, u32, f64, f32, &str, String);
