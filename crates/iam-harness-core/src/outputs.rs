// crates/iam-harness-core/src/outputs.rs
// ============================================================================
// Module: Scenario Outputs
// Description: Named outputs read back from a provisioned stack.
// Purpose: Provide strict, typed access to scalar and map outputs.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An [`OutputSet`] is populated once after provisioning and is read-only
//! afterwards. Lookups never fall back to defaults: a missing name is an
//! [`OutputError::NotFound`] and a shape mismatch is an
//! [`OutputError::KindMismatch`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::OutputError;

// ============================================================================
// SECTION: Values
// ============================================================================

/// Single stack output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    /// Scalar string output.
    Scalar(String),
    /// String-to-string map output.
    Map(BTreeMap<String, String>),
}

impl OutputValue {
    /// Converts an engine JSON value into an output.
    ///
    /// Strings are kept verbatim, objects become string maps with nested
    /// values rendered as text, and every other value is rendered as text.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(fields) => Self::Map(
                fields.iter().map(|(key, value)| (key.clone(), render_scalar(value))).collect(),
            ),
            other => Self::Scalar(render_scalar(other)),
        }
    }

    /// Returns a label for the output shape.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Map(_) => "map",
        }
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Output Set
// ============================================================================

/// Outputs of a provisioned scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputSet {
    /// Outputs keyed by name.
    values: BTreeMap<String, OutputValue>,
}

impl OutputSet {
    /// Creates an empty output set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Returns a copy with a scalar output added.
    #[must_use]
    pub fn with_scalar(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), OutputValue::Scalar(value.into()));
        self
    }

    /// Returns a copy with a map output added.
    #[must_use]
    pub fn with_map<K, V, I>(mut self, name: impl Into<String>, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = entries.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        self.values.insert(name.into(), OutputValue::Map(map));
        self
    }

    /// Returns true when no outputs were reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over output names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns an output of any shape.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::NotFound`] when the output is absent.
    pub fn get(&self, name: &str) -> Result<&OutputValue, OutputError> {
        self.values.get(name).ok_or_else(|| OutputError::NotFound {
            name: name.to_string(),
        })
    }

    /// Returns a scalar output.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output is absent or is a map.
    pub fn string(&self, name: &str) -> Result<&str, OutputError> {
        match self.get(name)? {
            OutputValue::Scalar(value) => Ok(value),
            other => Err(OutputError::KindMismatch {
                name: name.to_string(),
                expected: "scalar",
                actual: other.kind(),
            }),
        }
    }

    /// Returns a map output.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output is absent or is a scalar.
    pub fn map(&self, name: &str) -> Result<&BTreeMap<String, String>, OutputError> {
        match self.get(name)? {
            OutputValue::Map(value) => Ok(value),
            other => Err(OutputError::KindMismatch {
                name: name.to_string(),
                expected: "map",
                actual: other.kind(),
            }),
        }
    }

    /// Returns one entry of a map output.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output or the entry is absent.
    pub fn map_entry(&self, name: &str, key: &str) -> Result<&str, OutputError> {
        self.map(name)?.get(key).map(String::as_str).ok_or_else(|| OutputError::MissingEntry {
            name: name.to_string(),
            key: key.to_string(),
        })
    }

    /// Confirms every listed output is present.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::NotFound`] for the first absent output.
    pub fn require(&self, names: &[&str]) -> Result<(), OutputError> {
        names.iter().try_for_each(|name| self.get(name).map(|_| ()))
    }
}

impl FromIterator<(String, OutputValue)> for OutputSet {
    fn from_iter<T: IntoIterator<Item = (String, OutputValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "outputs_tests.rs"]
mod outputs_tests;
