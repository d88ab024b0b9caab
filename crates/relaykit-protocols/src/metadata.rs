//! Binding metadata and structural decoding.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::BindingError;

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;

/// Component metadata: a name plus an untyped string-to-string property map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Component instance name.
    pub name: String,
    /// Raw configuration values, as loaded by the hosting runtime.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Metadata {
    /// Create empty metadata with the given component name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    /// Add a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Decode the untyped property map into a typed settings struct.
///
/// Values pass through unchanged - no trimming, case-folding, or format
/// validation. A missing required field surfaces as
/// [`BindingError::Metadata`].
pub fn decode_properties<T: DeserializeOwned>(
    properties: &HashMap<String, String>,
) -> Result<T, BindingError> {
    let value =
        serde_json::to_value(properties).map_err(|e| BindingError::Metadata(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| BindingError::Metadata(e.to_string()))
}
