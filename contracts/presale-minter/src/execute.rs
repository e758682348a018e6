use std::ops::Range;

use cosmwasm_std::{
    Addr, Api, BankMsg, DepsMut, Env, Event, MessageInfo, Response, Storage, Uint128,
};
use presale_common::merkle::{decode_hash, hash_entry, verify_merkle_proof};
use presale_common::{Address, SalePhase};

use crate::collection::Collection;
use crate::error::ContractError;
use crate::msg::{PreSaleMintParams, UpdateConfigParams};
use crate::state::{MinterConfig, CONFIG, PHASE, PRE_SALE_CLAIMED};

/// Mint against an allowlist entry.
///
/// `allowance` is the total proven by the Merkle proof; `amount` is what this
/// call mints. All checks run before any state is written.
pub fn pre_sale_mint(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    collection: &impl Collection,
    params: PreSaleMintParams,
) -> Result<Response, ContractError> {
    let PreSaleMintParams {
        amount,
        allowance,
        proof,
    } = params;

    let phase = PHASE.load(deps.storage)?;
    if !phase.pre_sale_active {
        return Err(ContractError::PhaseDisabled {
            phase: SalePhase::PreSale.as_str().to_string(),
        });
    }
    if amount == 0 {
        return Err(ContractError::ZeroAmount);
    }

    let address = account_address(deps.api, &info.sender)?;
    let leaf = hash_entry(&address, allowance);
    let root = phase.merkle_root.as_deref().ok_or(ContractError::InvalidProof)?;
    if !verify_merkle_proof(root, &proof, &leaf) {
        return Err(ContractError::InvalidProof);
    }

    let claimed = PRE_SALE_CLAIMED
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(0);
    let new_claimed = match claimed.checked_add(amount) {
        Some(total) if total <= allowance => total,
        _ => {
            return Err(ContractError::ExceedsAllowance {
                claimed,
                amount,
                allowance,
            })
        }
    };

    check_supply(deps.storage, collection, amount)?;

    let config = CONFIG.load(deps.storage)?;
    let paid = check_payment(&info, &config.denom, config.pre_sale_price, amount)?;

    PRE_SALE_CLAIMED.save(deps.storage, &info.sender, &new_claimed)?;
    let minted = collection.mint(deps.storage, &info.sender, amount)?;

    Ok(Response::new()
        .add_attribute("action", "pre_sale_mint")
        .add_attribute("minter", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("claimed", new_claimed.to_string())
        .add_attribute("allowance", allowance.to_string())
        .add_attribute("paid", paid.to_string())
        .add_events(mint_events(&info.sender, minted, SalePhase::PreSale)))
}

/// Public sale mint: no allowlist, only phase, supply and payment checks.
pub fn mint(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    collection: &impl Collection,
    amount: u64,
) -> Result<Response, ContractError> {
    let phase = PHASE.load(deps.storage)?;
    if !phase.sale_active {
        return Err(ContractError::PhaseDisabled {
            phase: SalePhase::Public.as_str().to_string(),
        });
    }
    if amount == 0 {
        return Err(ContractError::ZeroAmount);
    }

    check_supply(deps.storage, collection, amount)?;

    let config = CONFIG.load(deps.storage)?;
    let paid = check_payment(&info, &config.denom, config.sale_price, amount)?;

    let minted = collection.mint(deps.storage, &info.sender, amount)?;

    Ok(Response::new()
        .add_attribute("action", "mint")
        .add_attribute("minter", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("paid", paid.to_string())
        .add_events(mint_events(&info.sender, minted, SalePhase::Public)))
}

/// Replace the allowlist root. The claim ledger is left untouched.
pub fn set_pre_sale_root(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    merkle_root: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    let merkle_root = validate_merkle_root(&merkle_root)?;
    let mut phase = PHASE.load(deps.storage)?;
    phase.merkle_root = Some(merkle_root.clone());
    PHASE.save(deps.storage, &phase)?;

    Ok(Response::new()
        .add_attribute("action", "set_pre_sale_root")
        .add_attribute("merkle_root", merkle_root.clone())
        .add_event(Event::new("presale_root_set").add_attribute("merkle_root", merkle_root)))
}

pub fn flip_phase(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    sale_phase: SalePhase,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    let mut phase = PHASE.load(deps.storage)?;
    let active = match sale_phase {
        SalePhase::PreSale => {
            phase.pre_sale_active = !phase.pre_sale_active;
            phase.pre_sale_active
        }
        SalePhase::Public => {
            phase.sale_active = !phase.sale_active;
            phase.sale_active
        }
    };
    PHASE.save(deps.storage, &phase)?;

    Ok(Response::new()
        .add_attribute("action", "flip_phase")
        .add_attribute("phase", sale_phase.as_str())
        .add_attribute("active", active.to_string())
        .add_event(
            Event::new("presale_phase_flipped")
                .add_attribute("phase", sale_phase.as_str())
                .add_attribute("active", active.to_string()),
        ))
}

pub fn set_max_supply(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    collection: &impl Collection,
    max_supply: u64,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    let total_supply = collection.total_supply(deps.storage)?;
    if max_supply < total_supply {
        return Err(ContractError::InvalidMaxSupply {
            max_supply,
            total_supply,
        });
    }
    collection.set_max_supply(deps.storage, max_supply)?;

    Ok(Response::new()
        .add_attribute("action", "set_max_supply")
        .add_attribute("max_supply", max_supply.to_string())
        .add_event(
            Event::new("presale_max_supply_set")
                .add_attribute("max_supply", max_supply.to_string())
                .add_attribute("total_supply", total_supply.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let mut config = ensure_admin(deps.storage, &info)?;

    if let Some(admin) = params.admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(denom) = params.denom {
        config.denom = denom;
    }
    if let Some(price) = params.pre_sale_price {
        config.pre_sale_price = price;
    }
    if let Some(price) = params.sale_price {
        config.sale_price = price;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("admin", config.admin.to_string())
        .add_attribute("denom", config.denom)
        .add_attribute("pre_sale_price", config.pre_sale_price.to_string())
        .add_attribute("sale_price", config.sale_price.to_string()))
}

/// Send the contract's whole balance in `denom` out. Defaults to the
/// configured payment denom, so coins sent in any other denom can still be
/// recovered.
pub fn withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: Option<String>,
    denom: Option<String>,
) -> Result<Response, ContractError> {
    let config = ensure_admin(deps.storage, &info)?;

    let recipient = match recipient {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => config.admin.clone(),
    };
    let balance = deps
        .querier
        .query_balance(env.contract.address.to_string(), denom.unwrap_or(config.denom))?;
    if balance.amount.is_zero() {
        return Err(ContractError::NothingToWithdraw);
    }

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: recipient.to_string(),
            amount: vec![balance.clone()],
        })
        .add_attribute("action", "withdraw")
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("amount", balance.amount.to_string())
        .add_event(
            Event::new("presale_withdraw")
                .add_attribute("recipient", recipient.to_string())
                .add_attribute("amount", balance.amount.to_string())
                .add_attribute("denom", balance.denom),
        ))
}

/// Validate a hex root and normalise it to lower-case hex without prefix.
pub fn validate_merkle_root(merkle_root: &str) -> Result<String, ContractError> {
    let hash = decode_hash(merkle_root).map_err(|e| ContractError::InvalidMerkleRoot {
        reason: e.to_string(),
    })?;
    Ok(hex::encode(hash))
}

/// Resolve a bech32 account to the 20-byte form used in allowlist leaves.
pub fn account_address(api: &dyn Api, account: &Addr) -> Result<Address, ContractError> {
    let canonical = api.addr_canonicalize(account.as_str())?;
    Address::try_from(canonical.as_slice()).map_err(|_| ContractError::InvalidAddress {
        address: account.to_string(),
    })
}

fn ensure_admin(storage: &dyn Storage, info: &MessageInfo) -> Result<MinterConfig, ContractError> {
    let config = CONFIG.load(storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can perform this action".to_string(),
        });
    }
    Ok(config)
}

fn check_supply(
    storage: &dyn Storage,
    collection: &impl Collection,
    amount: u64,
) -> Result<(), ContractError> {
    let total_supply = collection.total_supply(storage)?;
    let max_supply = collection.max_supply(storage)?;
    match total_supply.checked_add(amount) {
        Some(total) if total <= max_supply => Ok(()),
        _ => Err(ContractError::ExceedsMaxSupply {
            total_supply,
            amount,
            max_supply,
        }),
    }
}

/// Returns the amount sent in `denom` once it covers `amount * unit_price`.
fn check_payment(
    info: &MessageInfo,
    denom: &str,
    unit_price: Uint128,
    amount: u64,
) -> Result<Uint128, ContractError> {
    let required = unit_price.checked_mul(Uint128::from(amount))?;
    let sent = info
        .funds
        .iter()
        .find(|c| c.denom == denom)
        .map(|c| c.amount)
        .unwrap_or(Uint128::zero());

    if sent < required {
        return Err(ContractError::InsufficientPayment { required, sent });
    }
    Ok(sent)
}

/// One event per minted token id.
fn mint_events(owner: &Addr, minted: Range<u64>, phase: SalePhase) -> Vec<Event> {
    minted
        .map(|token_id| {
            Event::new("presale_mint")
                .add_attribute("phase", phase.as_str())
                .add_attribute("token_id", token_id.to_string())
                .add_attribute("owner", owner.to_string())
        })
        .collect()
}
