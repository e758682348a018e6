use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<MinterConfig> = Item::new("config");
pub const PHASE: Item<PhaseState> = Item::new("phase");

/// Cumulative amount each address has minted under the allowlist.
/// Entries only grow and survive root replacement.
pub const PRE_SALE_CLAIMED: Map<&Addr, u64> = Map::new("pre_sale_claimed");

#[cw_serde]
pub struct MinterConfig {
    pub admin: Addr,
    /// Denom accepted as payment
    pub denom: String,
    /// Price per token during the pre-sale
    pub pre_sale_price: Uint128,
    /// Price per token during the public sale
    pub sale_price: Uint128,
}

#[cw_serde]
pub struct PhaseState {
    pub pre_sale_active: bool,
    pub sale_active: bool,
    /// Current allowlist root, lower-case hex without prefix
    pub merkle_root: Option<String>,
}
