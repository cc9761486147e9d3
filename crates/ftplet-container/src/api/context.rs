//! Context handed to plugins at initialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Server-wide information available to plugins when they are initialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginContext {
    /// Name of the hosting server.
    pub server_name: String,
    /// Arbitrary plugin settings keyed by string.
    pub settings: HashMap<String, serde_json::Value>,
}

impl PluginContext {
    /// Creates a new context with no settings.
    pub fn new(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
            settings: HashMap::new(),
        }
    }

    /// Inserts a setting.
    pub fn with_setting(mut self, key: &str, value: serde_json::Value) -> Self {
        self.settings.insert(key.to_string(), value);
        self
    }

    /// Gets a setting by key.
    pub fn get_setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }

    /// Gets a string setting.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 setting.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.settings.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool setting.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.settings.get(key).and_then(|v| v.as_bool())
    }
}
