use sha2::{Digest, Sha256};

use crate::address::Address;
use crate::error::ParseError;

pub type Hash = [u8; 32];

/// Domain prefix for leaf hashes.
pub const LEAF_PREFIX: u8 = 0x00;
/// Domain prefix for internal node hashes.
pub const NODE_PREFIX: u8 = 0x01;

/// Compute the leaf hash for an allowance entry.
///
/// `leaf_hash = sha256( 0x00 || address[20] || uint256_be(allowance) )`
///
/// The allowance is widened to a 32-byte big-endian field so the layout is
/// identical to an ABI-packed `(address, uint256)` pair apart from the prefix.
pub fn hash_entry(address: &Address, allowance: u64) -> Hash {
    let mut amount = [0u8; 32];
    amount[24..].copy_from_slice(&allowance.to_be_bytes());

    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(address.as_bytes());
    hasher.update(amount);
    hasher.finalize().into()
}

/// Hash two nodes into their parent. The pair is sorted by byte value first,
/// so `hash_pair(a, b) == hash_pair(b, a)`.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(lo);
    hasher.update(hi);
    hasher.finalize().into()
}

/// Fold a proof into the root it implies for `leaf`.
pub fn compute_root(leaf: &Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(*leaf, |current, sibling| hash_pair(&current, sibling))
}

pub fn verify_proof(root: &Hash, leaf: &Hash, proof: &[Hash]) -> bool {
    compute_root(leaf, proof) == *root
}

/// Verify a Merkle proof given as hex strings against a hex root.
///
/// Malformed hex or values that are not 32 bytes make the proof invalid.
pub fn verify_merkle_proof(root_hex: &str, proof_hex: &[String], leaf_hash: &Hash) -> bool {
    let Ok(root) = decode_hash(root_hex) else {
        return false;
    };
    let proof: Result<Vec<Hash>, _> = proof_hex.iter().map(|h| decode_hash(h)).collect();
    match proof {
        Ok(proof) => verify_proof(&root, leaf_hash, &proof),
        Err(_) => false,
    }
}

/// Decode a 32-byte hash from hex, with or without a `0x` prefix.
pub fn decode_hash(input: &str) -> Result<Hash, ParseError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.len() != 64 {
        return Err(ParseError::InvalidHash {
            input: input.to_string(),
            reason: format!("expected 64 hex chars, got {}", digits.len()),
        });
    }
    let mut hash = [0u8; 32];
    hex::decode_to_slice(digits, &mut hash).map_err(|e| ParseError::InvalidHash {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    Ok(hash)
}

/// `0x`-prefixed lower-case hex.
pub fn encode_hash(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}
