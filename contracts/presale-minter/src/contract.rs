use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};
use presale_common::SalePhase;

use crate::collection::StoredCollection;
use crate::error::ContractError;
use crate::execute;
use crate::msg::{
    ExecuteMsg, InstantiateMsg, MigrateMsg, PreSaleMintParams, QueryMsg, UpdateConfigParams,
};
use crate::query;
use crate::state::{MinterConfig, PhaseState, CONFIG, PHASE};

const CONTRACT_NAME: &str = "crates.io:presale-minter";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let merkle_root = msg
        .merkle_root
        .as_deref()
        .map(execute::validate_merkle_root)
        .transpose()?;

    let config = MinterConfig {
        admin: info.sender.clone(),
        denom: msg.denom,
        pre_sale_price: msg.pre_sale_price,
        sale_price: msg.sale_price,
    };
    CONFIG.save(deps.storage, &config)?;

    let phase = PhaseState {
        pre_sale_active: false,
        sale_active: false,
        merkle_root,
    };
    PHASE.save(deps.storage, &phase)?;

    StoredCollection.initialize(deps.storage, msg.max_supply)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "presale-minter")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("max_supply", msg.max_supply.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let collection = StoredCollection;
    match msg {
        ExecuteMsg::PreSaleMint {
            amount,
            allowance,
            proof,
        } => execute::pre_sale_mint(
            deps,
            env,
            info,
            &collection,
            PreSaleMintParams {
                amount,
                allowance,
                proof,
            },
        ),
        ExecuteMsg::Mint { amount } => execute::mint(deps, env, info, &collection, amount),
        ExecuteMsg::SetPreSaleRoot { merkle_root } => {
            execute::set_pre_sale_root(deps, env, info, merkle_root)
        }
        ExecuteMsg::FlipPreSaleState {} => {
            execute::flip_phase(deps, env, info, SalePhase::PreSale)
        }
        ExecuteMsg::FlipSaleState {} => execute::flip_phase(deps, env, info, SalePhase::Public),
        ExecuteMsg::SetMaxSupply { max_supply } => {
            execute::set_max_supply(deps, env, info, &collection, max_supply)
        }
        ExecuteMsg::UpdateConfig {
            admin,
            denom,
            pre_sale_price,
            sale_price,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                denom,
                pre_sale_price,
                sale_price,
            },
        ),
        ExecuteMsg::Withdraw { recipient, denom } => {
            execute::withdraw(deps, env, info, recipient, denom)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    let collection = StoredCollection;
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Status {} => query::query_status(deps, &collection),
        QueryMsg::PreSaleClaimed { address } => query::query_pre_sale_claimed(deps, address),
        QueryMsg::VerifyAllowance {
            address,
            allowance,
            proof,
            merkle_root,
        } => query::query_verify_allowance(deps, address, allowance, proof, merkle_root),
        QueryMsg::OwnerOf { token_id } => query::query_owner_of(deps, &collection, token_id),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
