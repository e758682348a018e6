use std::ops::Range;

use cosmwasm_std::{Addr, StdError, StdResult, Storage};
use cw_storage_plus::{Item, Map};

pub const TOTAL_SUPPLY: Item<u64> = Item::new("total_supply");
pub const MAX_SUPPLY: Item<u64> = Item::new("max_supply");
pub const TOKEN_OWNERS: Map<u64, Addr> = Map::new("token_owners");

/// The collectible base the minter sells from.
///
/// Token ids are assigned sequentially: `mint` hands out the next `amount`
/// ids starting at the current total supply and returns that range.
pub trait Collection {
    fn total_supply(&self, storage: &dyn Storage) -> StdResult<u64>;

    fn max_supply(&self, storage: &dyn Storage) -> StdResult<u64>;

    fn set_max_supply(&self, storage: &mut dyn Storage, max_supply: u64) -> StdResult<()>;

    fn mint(&self, storage: &mut dyn Storage, to: &Addr, amount: u64) -> StdResult<Range<u64>>;

    fn owner_of(&self, storage: &dyn Storage, token_id: u64) -> StdResult<Option<Addr>>;
}

/// Collection kept in this contract's own storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoredCollection;

impl StoredCollection {
    pub fn initialize(&self, storage: &mut dyn Storage, max_supply: u64) -> StdResult<()> {
        TOTAL_SUPPLY.save(storage, &0)?;
        MAX_SUPPLY.save(storage, &max_supply)
    }
}

impl Collection for StoredCollection {
    fn total_supply(&self, storage: &dyn Storage) -> StdResult<u64> {
        TOTAL_SUPPLY.load(storage)
    }

    fn max_supply(&self, storage: &dyn Storage) -> StdResult<u64> {
        MAX_SUPPLY.load(storage)
    }

    fn set_max_supply(&self, storage: &mut dyn Storage, max_supply: u64) -> StdResult<()> {
        MAX_SUPPLY.save(storage, &max_supply)
    }

    fn mint(&self, storage: &mut dyn Storage, to: &Addr, amount: u64) -> StdResult<Range<u64>> {
        let start = TOTAL_SUPPLY.load(storage)?;
        let end = start
            .checked_add(amount)
            .ok_or_else(|| StdError::generic_err("token id overflow"))?;
        for token_id in start..end {
            TOKEN_OWNERS.save(storage, token_id, to)?;
        }
        TOTAL_SUPPLY.save(storage, &end)?;
        Ok(start..end)
    }

    fn owner_of(&self, storage: &dyn Storage, token_id: u64) -> StdResult<Option<Addr>> {
        TOKEN_OWNERS.may_load(storage, token_id)
    }
}
