//! Layered error definitions
//!
//! Categorized by source: config / persistence / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error (fatal at startup)
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Persistence Errors =====
    /// A persistence collaborator call failed
    #[error("store '{store}' write error: {message}")]
    Persistence { store: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create persistence error
    pub fn persistence(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            store: store.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_message() {
        let err = ContractError::persistence("laps", "disk full");
        assert_eq!(err.to_string(), "store 'laps' write error: disk full");
    }

    #[test]
    fn test_validation_message() {
        let err = ContractError::config_validation("capture.format", "unknown format 'f1_2030'");
        assert!(err.to_string().contains("capture.format"));
    }
}
