//! Provider credentials
//!
//! Credentials are an opaque string-to-string map. Each adapter documents
//! the keys it requires and checks for their presence when it is built;
//! nothing else about the values is validated here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Vendor-specific credential data
///
/// The `Debug` implementation lists the keys but never the values.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(HashMap<String, String>);

impl Credentials {
    /// Create an empty credentials map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Parse credentials from a JSON object whose values are all strings
    ///
    /// A flattened Google service-account key file has this shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::config("credentials must be a JSON object"))?;

        let mut data = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let value = value.as_str().ok_or_else(|| {
                Error::config(format!("credential value for key {key} is not a string"))
            })?;
            data.insert(key.clone(), value.to_string());
        }

        Ok(Self(data))
    }

    /// Read credentials from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&contents)
    }

    /// Get a value, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Get a value that the named provider requires
    pub fn require(&self, provider: &str, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            Error::config(format!(
                "missing key {key} in {provider} dns provider credentials data"
            ))
        })
    }

    /// Check that every key in `keys` is present
    pub fn require_all(&self, provider: &str, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.require(provider, key)?;
        }
        Ok(())
    }

    /// Whether the map contains `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }
}

impl From<HashMap<String, String>> for Credentials {
    fn from(data: HashMap<String, String>) -> Self {
        Self(data)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.0.keys().collect();
        keys.sort();
        f.debug_struct("Credentials").field("keys", &keys).finish()
    }
}
