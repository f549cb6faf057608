//! Error types for the SFD ledger

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    ArgumentError {
        operation: &'static str,
        expected: usize,
        got: usize,
    },
    ParseError(String),
    DecodeError(String),
    StoreError(String),
    NotFound(String),
    UnknownOperation(String),
    ConfigError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::ArgumentError {
                operation,
                expected,
                got,
            } => write!(
                f,
                "Incorrect number of arguments for {}: expecting {}, got {}",
                operation, expected, got
            ),
            LedgerError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            LedgerError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            LedgerError::StoreError(msg) => write!(f, "Store error: {}", msg),
            LedgerError::NotFound(key) => write!(f, "Account not found: {}", key),
            LedgerError::UnknownOperation(name) => {
                write!(f, "Invalid ledger function name: {}", name)
            }
            LedgerError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::StoreError(err.to_string())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::StoreError(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::DecodeError(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
