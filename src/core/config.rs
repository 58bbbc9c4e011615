//! Configuration management for slot arrays.
//!
//! This module provides:
//! - `ArrayConfig`, the construction parameters of every slot array
//! - `ArrayConfigBuilder` for programmatic and YAML construction
//! - `Config`, the file-level settings used by the `metric-slots` binary

use crate::core::{ArrayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of slots allocated for a new array
pub const DEFAULT_CAPACITY: usize = 128;

/// Default number of slots added each time an array is extended
pub const DEFAULT_ALLOC_INCREMENT: usize = 128;

/// Default ceiling on the number of slots an array may hold
pub const DEFAULT_MAX_CAPACITY: usize = i32::MAX as usize;

/// Construction parameters for a slot array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayConfig {
    /// Slots allocated (and zero-filled) at construction
    pub initial_capacity: usize,
    /// Keep slots `0..size` in non-decreasing order
    pub sorted: bool,
    /// A full array at `max_capacity` evicts instead of failing on roll-right
    pub fixed: bool,
    /// Capacity ceiling
    pub max_capacity: usize,
    /// Capacity floor that shrinking never crosses
    pub min_capacity: usize,
    /// Growth step when the array is extended
    pub allocation_increment: usize,
    /// Free slots that must accumulate before the region is shrunk
    pub cleared_slots_free_threshold: usize,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        ArrayConfig {
            initial_capacity: DEFAULT_CAPACITY,
            sorted: false,
            fixed: false,
            max_capacity: DEFAULT_MAX_CAPACITY,
            min_capacity: 1,
            allocation_increment: DEFAULT_ALLOC_INCREMENT,
            cleared_slots_free_threshold: DEFAULT_ALLOC_INCREMENT,
        }
    }
}

impl ArrayConfig {
    /// Start a builder from the defaults
    pub fn builder() -> ArrayConfigBuilder {
        ArrayConfigBuilder::new()
    }

    /// Fixed, unsorted array of exactly `capacity` slots that never shrinks.
    pub fn sliding_window(capacity: usize) -> Self {
        ArrayConfig {
            initial_capacity: capacity,
            sorted: false,
            fixed: true,
            max_capacity: capacity,
            min_capacity: capacity,
            allocation_increment: 1,
            cleared_slots_free_threshold: capacity,
        }
    }

    /// Growable sorted array starting at `initial_capacity` slots.
    pub fn sorted_set(initial_capacity: usize) -> Self {
        ArrayConfig {
            initial_capacity,
            sorted: true,
            min_capacity: initial_capacity.min(1),
            ..ArrayConfig::default()
        }
    }

    /// Small unsorted array that grows and shrinks one slot at a time.
    pub fn stack() -> Self {
        ArrayConfig {
            initial_capacity: 1,
            sorted: false,
            fixed: false,
            max_capacity: 1024,
            min_capacity: 0,
            allocation_increment: 1,
            cleared_slots_free_threshold: 1,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_capacity == 0 {
            return Err(ArrayError::config("max_capacity must be greater than 0"));
        }

        if self.initial_capacity > self.max_capacity {
            return Err(ArrayError::config(format!(
                "initial_capacity {} exceeds max_capacity {}",
                self.initial_capacity, self.max_capacity
            )));
        }

        if self.min_capacity > self.initial_capacity {
            return Err(ArrayError::config(format!(
                "min_capacity {} exceeds initial_capacity {}",
                self.min_capacity, self.initial_capacity
            )));
        }

        if self.allocation_increment == 0 {
            return Err(ArrayError::config("allocation_increment must be greater than 0"));
        }

        Ok(())
    }

    /// Human readable mode used in error messages
    pub(crate) fn mode(&self) -> &'static str {
        match (self.sorted, self.fixed) {
            (true, true) => "fixed sorted",
            (true, false) => "sorted",
            (false, true) => "fixed unsorted",
            (false, false) => "unsorted",
        }
    }
}

/// Configuration builder for programmatic construction
#[derive(Debug, Clone, Default)]
pub struct ArrayConfigBuilder {
    config: ArrayConfig,
}

impl ArrayConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ArrayConfigBuilder {
            config: ArrayConfig::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| ArrayError::config(format!("Failed to parse YAML array config: {}", e)))?;
        Ok(self)
    }

    /// Set initial capacity
    pub fn initial_capacity(mut self, slots: usize) -> Self {
        self.config.initial_capacity = slots;
        self
    }

    /// Keep the array sorted
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.config.sorted = sorted;
        self
    }

    /// Fix the capacity ceiling
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.config.fixed = fixed;
        self
    }

    /// Set max capacity
    pub fn max_capacity(mut self, slots: usize) -> Self {
        self.config.max_capacity = slots;
        self
    }

    /// Set min capacity
    pub fn min_capacity(mut self, slots: usize) -> Self {
        self.config.min_capacity = slots;
        self
    }

    /// Set allocation increment
    pub fn allocation_increment(mut self, slots: usize) -> Self {
        self.config.allocation_increment = slots;
        self
    }

    /// Set the free-slot count that triggers a shrink
    pub fn cleared_slots_free_threshold(mut self, slots: usize) -> Self {
        self.config.cleared_slots_free_threshold = slots;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ArrayConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Settings file for the `metric-slots` binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Array parameters used by commands that build a bare array
    pub defaults: ArrayConfig,
    /// Sliding window settings
    pub window: WindowConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Sliding window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Number of samples retained
    pub capacity: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,
    /// Include targets, thread ids and line numbers
    pub structured: bool,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every event, including region allocation and release
    Trace,
    /// Region growth, shrink and reload
    Debug,
    /// Informational messages
    Info,
    /// Truncated extends and other dropped data
    Warn,
    /// Errors only
    Error,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig { capacity: 60 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Info,
            structured: false,
        }
    }
}

impl LogLevel {
    /// Convert to tracing filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Config {
    /// Parse and validate a YAML settings document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::info!("Loaded configuration from: {:?}", path);
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.defaults.validate()?;
        if self.window.capacity == 0 {
            return Err(ArrayError::config("window.capacity must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ArrayConfig::default().validate().is_ok());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ArrayConfig::sliding_window(3).validate().is_ok());
        assert!(ArrayConfig::sorted_set(16).validate().is_ok());
        assert!(ArrayConfig::sorted_set(0).validate().is_ok());
        assert!(ArrayConfig::stack().validate().is_ok());
    }

    #[test]
    fn test_capacity_ordering() {
        let result = ArrayConfig::builder().initial_capacity(10).max_capacity(5).build();
        assert!(result.is_err());

        let result = ArrayConfig::builder()
            .initial_capacity(4)
            .min_capacity(8)
            .max_capacity(16)
            .build();
        assert!(result.is_err());

        let result = ArrayConfig::builder().max_capacity(0).initial_capacity(0).min_capacity(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_increment_rejected() {
        let err = ArrayConfig::builder().allocation_increment(0).build().unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_config_builder() {
        let config = ArrayConfig::builder()
            .initial_capacity(8)
            .sorted(true)
            .fixed(true)
            .max_capacity(8)
            .min_capacity(2)
            .allocation_increment(4)
            .cleared_slots_free_threshold(3)
            .build()
            .unwrap();

        assert_eq!(config.initial_capacity, 8);
        assert!(config.sorted);
        assert!(config.fixed);
        assert_eq!(config.max_capacity, 8);
        assert_eq!(config.min_capacity, 2);
        assert_eq!(config.allocation_increment, 4);
        assert_eq!(config.cleared_slots_free_threshold, 3);
        assert_eq!(config.mode(), "fixed sorted");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
initial_capacity: 32
sorted: true
max_capacity: 1000
"#;

        let config = ArrayConfigBuilder::new().from_yaml(yaml).unwrap().build().unwrap();
        assert_eq!(config.initial_capacity, 32);
        assert!(config.sorted);
        assert!(!config.fixed);
        assert_eq!(config.max_capacity, 1000);
        assert_eq!(config.allocation_increment, DEFAULT_ALLOC_INCREMENT);
    }

    #[test]
    fn test_settings_yaml() {
        let yaml = r#"
defaults:
  initial_capacity: 4
  min_capacity: 1
window:
  capacity: 5
logging:
  level: debug
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.defaults.initial_capacity, 4);
        assert_eq!(config.window.capacity, 5);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.level.as_str(), "debug");
    }

    #[test]
    fn test_zero_window_rejected() {
        let yaml = "window:\n  capacity: 0\n";
        assert!(Config::from_yaml(yaml).is_err());
    }
}
