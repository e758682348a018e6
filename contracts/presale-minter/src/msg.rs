use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

use crate::state::MinterConfig;

#[cw_serde]
pub struct InstantiateMsg {
    pub denom: String,
    pub pre_sale_price: Uint128,
    pub sale_price: Uint128,
    pub max_supply: u64,
    /// Initial allowlist root (hex, optional `0x` prefix)
    pub merkle_root: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Mint against the caller's allowlist entry. Payment is attached as funds.
    PreSaleMint {
        /// Tokens to mint in this call
        amount: u64,
        /// Total allowance attested by the proof
        allowance: u64,
        /// Sibling hashes from the caller's leaf to the root (hex)
        proof: Vec<String>,
    },
    /// Public sale mint. Payment is attached as funds.
    Mint { amount: u64 },
    /// Replace the allowlist root. Admin only.
    SetPreSaleRoot { merkle_root: String },
    /// Toggle the pre-sale phase. Admin only.
    FlipPreSaleState {},
    /// Toggle the public sale phase. Admin only.
    FlipSaleState {},
    /// Update the supply ceiling. Admin only.
    SetMaxSupply { max_supply: u64 },
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        denom: Option<String>,
        pre_sale_price: Option<Uint128>,
        sale_price: Option<Uint128>,
    },
    /// Send the contract's balance in `denom` (defaults to the payment denom)
    /// to `recipient` (defaults to admin). Admin only.
    Withdraw {
        recipient: Option<String>,
        denom: Option<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(MinterConfig)]
    Config {},
    #[returns(StatusResponse)]
    Status {},
    #[returns(ClaimedResponse)]
    PreSaleClaimed { address: String },
    /// Check an allowance proof against `merkle_root`, or the current root.
    #[returns(bool)]
    VerifyAllowance {
        address: String,
        allowance: u64,
        proof: Vec<String>,
        merkle_root: Option<String>,
    },
    #[returns(OwnerOfResponse)]
    OwnerOf { token_id: u64 },
}

#[cw_serde]
pub struct StatusResponse {
    pub pre_sale_active: bool,
    pub sale_active: bool,
    pub merkle_root: Option<String>,
    pub total_supply: u64,
    pub max_supply: u64,
}

#[cw_serde]
pub struct ClaimedResponse {
    pub address: String,
    pub claimed: u64,
}

#[cw_serde]
pub struct OwnerOfResponse {
    pub token_id: u64,
    pub owner: Option<Addr>,
}

// ─── Internal parameter structs (avoid too-many-arguments) ───

pub struct PreSaleMintParams {
    pub amount: u64,
    pub allowance: u64,
    pub proof: Vec<String>,
}

pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub denom: Option<String>,
    pub pre_sale_price: Option<Uint128>,
    pub sale_price: Option<Uint128>,
}
