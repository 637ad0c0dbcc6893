//! Unified error types for the denom tracker
//!
//! Every failure aborts the tracking run: there is no partial-success mode.
//! A denom that simply is not held on a chain is not an error.

use crate::ibc::types::ChainName;
use thiserror::Error;

/// Main error type for all tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Missing or inconsistent registry entry. Indicates a registry defect.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Balance query failed for a chain
    #[error("Network error on {chain}: {message}")]
    Network { chain: String, message: String },

    /// Malformed bech32 address
    #[error("Invalid address '{address}': {reason}")]
    Decoding { address: String, reason: String },

    /// Response or input file could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Balance total overflow for {denom}")]
    AmountOverflow { denom: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    // Convenience constructors

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn missing_channel(destination: ChainName, source: ChainName) -> Self {
        Self::Configuration(format!(
            "no channel registered on {} for counterparty {}",
            destination, source
        ))
    }

    pub fn network(chain: impl ToString, msg: impl ToString) -> Self {
        Self::Network {
            chain: chain.to_string(),
            message: msg.to_string(),
        }
    }

    pub fn decoding(address: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decoding {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether the error came from the registry rather than the outside world
    pub fn is_configuration(&self) -> bool {
        matches!(self, TrackerError::Configuration(_))
    }
}

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Parse(e.to_string())
    }
}
