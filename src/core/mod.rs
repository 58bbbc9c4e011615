//! Configuration and error types shared by every slot array.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{ArrayConfig, ArrayConfigBuilder, Config, LogLevel, LoggingConfig, WindowConfig};
pub use error::{ArrayError, Result};
