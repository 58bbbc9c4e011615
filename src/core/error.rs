//! Error types for slot arrays and their containers.

use thiserror::Error;

/// Failures surfaced by slot arrays, containers and configuration loading
#[derive(Error, Debug)]
pub enum ArrayError {
    /// Growth past `max_capacity` with truncation disallowed
    #[error("Allocation overflow: {requested} slots requested, maximum capacity is {max}")]
    AllocationOverflow {
        /// Slots the operation needed
        requested: usize,
        /// Capacity ceiling
        max: usize,
    },

    /// A batch stopped part way through
    #[error("Partial insert failure: {inserted} values inserted before: {source}")]
    PartialInsertFailure {
        /// Values stored before the failure
        inserted: usize,
        /// The failure that stopped the batch
        #[source]
        source: Box<ArrayError>,
    },

    /// Index outside the populated slots
    #[error("Invalid index {index}: valid range is 0..{len}")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Logical length it was checked against
        len: usize,
    },

    /// The slot region was destroyed
    #[error("Slot region has been released")]
    UseAfterRelease,

    /// Operation not available for the array's sorted/fixed mode
    #[error("Operation '{operation}' is not supported on a {mode} array")]
    InvalidOperationForMode {
        /// Rejected operation
        operation: &'static str,
        /// Mode of the array
        mode: &'static str,
    },

    /// Byte input that does not divide into whole slots
    #[error("Malformed slot bytes: length {len} is not a multiple of the slot width {width}")]
    MalformedBytes {
        /// Length of the input
        len: usize,
        /// Slot width in bytes
        width: usize,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO failure while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization failure
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for slot array operations
pub type Result<T> = std::result::Result<T, ArrayError>;

impl ArrayError {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an overflow error for a request of `requested` slots against `max`
    pub fn overflow(requested: usize, max: usize) -> Self {
        Self::AllocationOverflow { requested, max }
    }

    /// Creates an out-of-range error for `index` against a logical length
    pub fn invalid_index(index: usize, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    /// Wraps `source` as the failure that stopped a batch after `inserted` values
    pub fn partial(inserted: usize, source: ArrayError) -> Self {
        Self::PartialInsertFailure {
            inserted,
            source: Box::new(source),
        }
    }

    /// Number of values a batch insert stored before failing, if this is a partial failure
    pub fn inserted_count(&self) -> Option<usize> {
        match self {
            Self::PartialInsertFailure { inserted, .. } => Some(*inserted),
            _ => None,
        }
    }

    /// Returns true if this error is recoverable
    ///
    /// Array contract violations are never retried inside the crate, only
    /// file IO while loading configuration is worth another attempt.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns the error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::AllocationOverflow { .. } => "capacity",
            Self::PartialInsertFailure { .. } => "partial",
            Self::InvalidIndex { .. } => "index",
            Self::UseAfterRelease => "lifecycle",
            Self::InvalidOperationForMode { .. } => "mode",
            Self::MalformedBytes { .. } => "serialization",
            Self::Config(_) | Self::Yaml(_) => "config",
            Self::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ArrayError::config("min_capacity exceeds max_capacity");
        assert_eq!(
            err.to_string(),
            "Configuration error: min_capacity exceeds max_capacity"
        );
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_partial_insert_carries_count() {
        let err = ArrayError::partial(3, ArrayError::overflow(5, 4));
        assert_eq!(err.inserted_count(), Some(3));
        assert_eq!(err.category(), "partial");
        assert_eq!(
            err.to_string(),
            "Partial insert failure: 3 values inserted before: Allocation overflow: 5 slots requested, maximum capacity is 4"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_recoverability() {
        assert!(!ArrayError::UseAfterRelease.is_recoverable());
        assert!(!ArrayError::overflow(10, 8).is_recoverable());
        assert!(ArrayError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)).is_recoverable());
    }

    #[test]
    fn test_invalid_index_message() {
        let err = ArrayError::invalid_index(7, 3);
        assert_eq!(err.to_string(), "Invalid index 7: valid range is 0..3");
        assert_eq!(err.inserted_count(), None);
    }
}
