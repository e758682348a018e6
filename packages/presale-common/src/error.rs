use thiserror::Error;

use crate::address::Address;

/// Failures while building an [`AllowanceTree`](crate::tree::AllowanceTree).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("duplicate allowlist entry for {address}")]
    DuplicateEntry { address: Address },

    #[error("allowlist is empty")]
    EmptyInput,
}

/// Failures while parsing the textual forms used in snapshots and messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid address {input}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("invalid hash {input}: {reason}")]
    InvalidHash { input: String, reason: String },

    #[error("invalid quantity {input}: {reason}")]
    InvalidQuantity { input: String, reason: String },
}
