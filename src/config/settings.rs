//! Layered key/value settings.

use std::collections::HashMap;

/// Merged configuration for one start cycle.
///
/// Two ordered layers: built-in defaults, then keys from an optional override
/// file. Lookups return the override value when present, else the default.
/// Immutable once constructed.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl Settings {
    pub(crate) fn new(defaults: HashMap<String, String>, overrides: HashMap<String, String>) -> Self {
        Self { defaults, overrides }
    }

    /// Look up a key, override layer first.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }

    /// Look up a key with a caller-supplied fallback.
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// True if the override layer shadows this key.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.overrides.contains_key(key)
    }

    /// Number of keys visible across both layers.
    pub fn len(&self) -> usize {
        let mut keys: Vec<&str> = self.defaults.keys().map(String::as_str).collect();
        keys.extend(self.overrides.keys().map(String::as_str));
        keys.sort_unstable();
        keys.dedup();
        keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty() && self.overrides.is_empty()
    }
}
