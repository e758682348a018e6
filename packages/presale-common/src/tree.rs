use std::collections::{BTreeMap, HashMap};

use crate::address::Address;
use crate::error::TreeError;
use crate::merkle::{hash_entry, hash_pair, verify_proof, Hash};
use crate::snapshot::Snapshot;

/// A sorted-pair Merkle tree over an address -> allowance mapping.
///
/// Leaves are sorted by hash before the levels are built, so the root only
/// depends on the set of entries. When a level has an odd number of nodes the
/// last one is promoted unchanged to the next level and contributes no
/// sibling to any proof at that level.
#[derive(Clone, Debug)]
pub struct AllowanceTree {
    entries: BTreeMap<Address, u64>,
    leaf_index: HashMap<Address, usize>,
    /// `levels[0]` holds the leaves, the last level holds the root.
    levels: Vec<Vec<Hash>>,
}

impl AllowanceTree {
    /// Build the tree. Fails on an empty input or a repeated address; a
    /// partial tree is never returned.
    pub fn build<I>(entries: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = (Address, u64)>,
    {
        let mut map = BTreeMap::new();
        for (address, allowance) in entries {
            if map.insert(address, allowance).is_some() {
                return Err(TreeError::DuplicateEntry { address });
            }
        }
        if map.is_empty() {
            return Err(TreeError::EmptyInput);
        }

        let mut leaves: Vec<(Hash, Address)> = map
            .iter()
            .map(|(address, allowance)| (hash_entry(address, *allowance), *address))
            .collect();
        leaves.sort_unstable();

        let leaf_index = leaves
            .iter()
            .enumerate()
            .map(|(index, (_, address))| (*address, index))
            .collect();

        let mut levels = vec![leaves.into_iter().map(|(hash, _)| hash).collect::<Vec<_>>()];
        loop {
            let current = &levels[levels.len() - 1];
            if current.len() <= 1 {
                break;
            }
            let next: Vec<Hash> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    // Unpaired node: promoted as-is
                    _ => pair[0],
                })
                .collect();
            levels.push(next);
        }

        Ok(Self {
            entries: map,
            leaf_index,
            levels,
        })
    }

    pub fn root(&self) -> Hash {
        self.levels[self.levels.len() - 1][0]
    }

    /// Sibling hashes from the address's leaf up to the root.
    pub fn proof(&self, address: &Address) -> Option<Vec<Hash>> {
        let mut index = *self.leaf_index.get(address)?;
        let mut proof = Vec::with_capacity(self.depth());

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            index /= 2;
        }

        Some(proof)
    }

    pub fn allowance(&self, address: &Address) -> Option<u64> {
        self.entries.get(address).copied()
    }

    pub fn verify(&self, address: &Address, allowance: u64, proof: &[Hash]) -> bool {
        verify_proof(&self.root(), &hash_entry(address, allowance), proof)
    }

    /// Entries in address order.
    pub fn entries(&self) -> impl Iterator<Item = (&Address, u64)> + '_ {
        self.entries.iter().map(|(address, allowance)| (address, *allowance))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn total_amount(&self) -> u128 {
        self.entries.values().map(|amount| u128::from(*amount)).sum()
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::from_tree(self)
    }
}
