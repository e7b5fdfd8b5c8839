//! Book and service configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//!
//! ```
//! use market_core::config::BookConfig;
//!
//! let config = BookConfig::from_json_str(r#"{ "capacity": 64, "run_on_add": true }"#).unwrap();
//! assert_eq!(config.capacity, 64);
//! assert!(config.run_on_add);
//! assert_eq!(config.dispatch_capacity, 1024);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_CAPACITY: usize = 1024;
const DEFAULT_DISPATCH_CAPACITY: usize = 1024;

/// Configuration for an [`OrderBook`](crate::orderbook::OrderBook) and the
/// threaded [`BookService`](crate::engine::BookService) around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Orders to pre-allocate in the arena, queues and index
    pub capacity: usize,

    /// Service only: match after every accepted order instead of waiting
    /// for an explicit `run`
    pub run_on_add: bool,

    /// Bound of the trade notification queue used by
    /// [`TradeDispatcher`](crate::engine::TradeDispatcher)
    pub dispatch_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            run_on_add: false,
            dispatch_capacity: DEFAULT_DISPATCH_CAPACITY,
        }
    }
}

impl BookConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: BookConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch_capacity == 0 {
            return Err(ConfigError::Invalid(
                "dispatch_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BookConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BookConfig::default());
        assert!(!config.run_on_add);
    }

    #[test]
    fn test_rejects_zero_dispatch_capacity() {
        let err = BookConfig::from_json_str(r#"{ "dispatch_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = BookConfig::from_json_str("{ capacity: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = BookConfig::from_json_file("/nonexistent/book.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
