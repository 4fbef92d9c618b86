// Queue Item

use serde::{Deserialize, Serialize};

/// Opaque queue payload. The store never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(serde_json::Value);

impl Item {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for Item {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Self(serde_json::Value::String(value))
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Self(serde_json::Value::String(value.to_string()))
    }
}
