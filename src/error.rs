//! Error types for the connection-state store.

use thiserror::Error;

/// Errors raised when an update is rejected.
///
/// A rejected update leaves the store untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invalid chainId {0}")]
    InvalidChainId(String),

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
}

impl StateError {
    pub(crate) fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        StateError::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StateError>;
