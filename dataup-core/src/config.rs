//! # Configuration
//!
//! A plain string key/value store. Applications seed it with defaults and
//! then layer environment overrides on top:
//!
//! ```rust
//! use dataup_core::DataupConfig;
//!
//! let mut config = DataupConfig::new();
//! config.set("http.port", "8080");
//! config.merge_env("DATAUP__", vec![("DATAUP__HTTP__PORT".to_string(), "9090".to_string())]);
//!
//! assert_eq!(config.snapshot().get_u16("http.port"), Some(9090));
//! ```
//!
//! `DATAUP__HTTP__PORT` normalizes to `http.port`: the prefix is stripped,
//! the rest lower-cased and `__` turned into `.`.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DataupConfig {
    values: HashMap<String, String>,
}

impl DataupConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Set a key only if nothing set it yet.
    pub fn set_default<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Apply every `(name, value)` pair whose name starts with `prefix`.
    pub fn merge_env<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                if !normalized.is_empty() {
                    self.set(normalized, value);
                }
            }
        }
    }

    /// [`merge_env`](Self::merge_env) over the process environment.
    pub fn load_env(&mut self, prefix: &str) {
        self.merge_env(prefix, std::env::vars());
    }

    pub fn snapshot(&self) -> DataupConfigSnapshot {
        DataupConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataupConfigSnapshot {
    map: HashMap<String, String>,
}

impl DataupConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.parse::<u16>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}
