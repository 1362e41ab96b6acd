//=========================================================================
// Tuning Manager
//=========================================================================
//
// Read-only tuning parameters loaded from a flat JSON object.
//
//   { "ship_speed": 4.5, "lives": 3, "show_fps": true }
//
//=========================================================================

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;
use serde_json::Value;

use crate::error::ConfigError;

//=== TuningManager =======================================================

#[derive(Debug, Default)]
pub struct TuningManager {
    params: HashMap<String, Value>,
}

impl TuningManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let params: HashMap<String, Value> = serde_json::from_str(text)?;
        Ok(Self { params })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let tuning = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(target: "services", "Loaded {} tuning parameters from {:?}", tuning.len(), path);
        Ok(tuning)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.params.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.params.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.params.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.params.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
