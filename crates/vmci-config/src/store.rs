//! Named-constant store model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single constant published by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    /// Numeric constant (feature bits, sizes, counts).
    Int(i64),
}

impl ConfigValue {
    /// Whether this value enables whatever it names.
    ///
    /// Booleans are taken as-is; numbers are truthy when non-zero.
    pub fn is_truthy(self) -> bool {
        match self {
            ConfigValue::Bool(b) => b,
            ConfigValue::Int(n) => n != 0,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Int(n)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Int(i64::from(n))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Read-only view of the host runtime's named constants.
///
/// Implementations never fail a lookup: an unknown name is `None`.
pub trait ConfigStore {
    /// Look up a constant by exact name.
    fn get(&self, name: &str) -> Option<ConfigValue>;

    /// Names of all constants in the store.
    fn names(&self) -> Vec<&str>;

    /// Whether `name` is present and truthy. Absence reads as `false`.
    fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(ConfigValue::is_truthy)
    }
}

/// A config store held in memory, keyed by constant name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfigStore {
    #[serde(default)]
    constants: BTreeMap<String, ConfigValue>,
}

impl MemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a constant, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.constants.insert(name.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Iterate constants in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ConfigValue)> {
        self.constants.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, name: &str) -> Option<ConfigValue> {
        self.constants.get(name).copied()
    }

    fn names(&self) -> Vec<&str> {
        self.constants.keys().map(String::as_str).collect()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for MemoryConfigStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            constants: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
