use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::ParseError;
use crate::merkle::{decode_hash, encode_hash, hash_entry, verify_proof, Hash};
use crate::tree::AllowanceTree;

/// The claim for one address: its total allowance and the proof for it.
/// This is also the content of the per-address proof files.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimEntry {
    pub amount: String,
    pub proof: Vec<String>,
}

impl ClaimEntry {
    pub fn allowance(&self) -> Result<u64, ParseError> {
        let amount = parse_quantity(&self.amount)?;
        u64::try_from(amount).map_err(|_| ParseError::InvalidQuantity {
            input: self.amount.clone(),
            reason: "allowance does not fit in 64 bits".to_string(),
        })
    }

    pub fn proof_hashes(&self) -> Result<Vec<Hash>, ParseError> {
        self.proof.iter().map(|h| decode_hash(h)).collect()
    }
}

/// Persisted output of one tree build.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub merkle_root: String,
    pub total_amount: String,
    /// Keyed by lower-case `0x` address.
    pub claims: BTreeMap<String, ClaimEntry>,
}

impl Snapshot {
    pub fn from_tree(tree: &AllowanceTree) -> Self {
        let claims = tree
            .entries()
            .map(|(address, allowance)| {
                let proof = tree
                    .proof(address)
                    .unwrap_or_default()
                    .iter()
                    .map(encode_hash)
                    .collect();
                let entry = ClaimEntry {
                    amount: format_quantity(u128::from(allowance)),
                    proof,
                };
                (address.to_string(), entry)
            })
            .collect();

        Self {
            merkle_root: encode_hash(&tree.root()),
            total_amount: format_quantity(tree.total_amount()),
            claims,
        }
    }

    pub fn root(&self) -> Result<Hash, ParseError> {
        decode_hash(&self.merkle_root)
    }

    pub fn claim(&self, address: &Address) -> Option<&ClaimEntry> {
        self.claims.get(&address.to_string())
    }

    /// Re-check a stored claim against the stored root. Returns `Ok(false)`
    /// for an address with no claim.
    pub fn verify_claim(&self, address: &Address) -> Result<bool, ParseError> {
        let Some(claim) = self.claim(address) else {
            return Ok(false);
        };
        let root = self.root()?;
        let leaf = hash_entry(address, claim.allowance()?);
        Ok(verify_proof(&root, &leaf, &claim.proof_hashes()?))
    }

    /// File name of the per-address proof file.
    pub fn claim_file_name(address: &Address) -> String {
        format!("{}.json", address)
    }
}

/// Format a quantity as `0x`-prefixed, even-length, lower-case hex.
pub fn format_quantity(value: u128) -> String {
    let digits = format!("{:x}", value);
    if digits.len() % 2 == 1 {
        format!("0x0{}", digits)
    } else {
        format!("0x{}", digits)
    }
}

/// Parse a quantity written as `0x` hex of any length or as decimal.
pub fn parse_quantity(input: &str) -> Result<u128, ParseError> {
    let trimmed = input.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(digits) => u128::from_str_radix(digits, 16),
        None => trimmed.parse::<u128>(),
    };
    parsed.map_err(|e| ParseError::InvalidQuantity {
        input: input.to_string(),
        reason: e.to_string(),
    })
}
