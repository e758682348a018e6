use cosmwasm_std::{to_json_binary, Binary, Deps, StdError, StdResult};
use presale_common::merkle::{hash_entry, verify_merkle_proof};

use crate::collection::Collection;
use crate::execute::account_address;
use crate::msg::{ClaimedResponse, OwnerOfResponse, StatusResponse};
use crate::state::{CONFIG, PHASE, PRE_SALE_CLAIMED};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_status(deps: Deps, collection: &impl Collection) -> StdResult<Binary> {
    let phase = PHASE.load(deps.storage)?;
    to_json_binary(&StatusResponse {
        pre_sale_active: phase.pre_sale_active,
        sale_active: phase.sale_active,
        merkle_root: phase.merkle_root,
        total_supply: collection.total_supply(deps.storage)?,
        max_supply: collection.max_supply(deps.storage)?,
    })
}

pub fn query_pre_sale_claimed(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let claimed = PRE_SALE_CLAIMED.may_load(deps.storage, &addr)?.unwrap_or(0);
    to_json_binary(&ClaimedResponse { address, claimed })
}

pub fn query_verify_allowance(
    deps: Deps,
    address: String,
    allowance: u64,
    proof: Vec<String>,
    merkle_root: Option<String>,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let account =
        account_address(deps.api, &addr).map_err(|e| StdError::generic_err(e.to_string()))?;

    let root = match merkle_root {
        Some(root) => Some(root),
        None => PHASE.load(deps.storage)?.merkle_root,
    };
    let valid = match root {
        Some(root) => verify_merkle_proof(&root, &proof, &hash_entry(&account, allowance)),
        None => false,
    };
    to_json_binary(&valid)
}

pub fn query_owner_of(
    deps: Deps,
    collection: &impl Collection,
    token_id: u64,
) -> StdResult<Binary> {
    let owner = collection.owner_of(deps.storage, token_id)?;
    to_json_binary(&OwnerOfResponse { token_id, owner })
}
