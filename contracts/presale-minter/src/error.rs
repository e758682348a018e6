use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("{phase} minting is not active")]
    PhaseDisabled { phase: String },

    #[error("invalid amount: must mint at least one token")]
    ZeroAmount,

    #[error("invalid merkle proof for pre-sale allowance")]
    InvalidProof,

    #[error("exceeds pre-sale limit: already claimed {claimed}, requested {amount}, allowance {allowance}")]
    ExceedsAllowance {
        claimed: u64,
        amount: u64,
        allowance: u64,
    },

    #[error("exceeds max supply: total supply {total_supply} + {amount} > {max_supply}")]
    ExceedsMaxSupply {
        total_supply: u64,
        amount: u64,
        max_supply: u64,
    },

    #[error("insufficient payment: required {required}, sent {sent}")]
    InsufficientPayment { required: Uint128, sent: Uint128 },

    #[error("invalid merkle root: {reason}")]
    InvalidMerkleRoot { reason: String },

    #[error("max supply {max_supply} is below current total supply {total_supply}")]
    InvalidMaxSupply { max_supply: u64, total_supply: u64 },

    #[error("address {address} is not a 20-byte account")]
    InvalidAddress { address: String },

    #[error("no funds to withdraw")]
    NothingToWithdraw,
}
