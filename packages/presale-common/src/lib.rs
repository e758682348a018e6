pub mod address;
pub mod error;
pub mod merkle;
pub mod snapshot;
pub mod tree;
pub mod types;

pub use address::Address;
pub use error::{ParseError, TreeError};
pub use merkle::{hash_entry, verify_merkle_proof, verify_proof, Hash};
pub use snapshot::{ClaimEntry, Snapshot};
pub use tree::AllowanceTree;
pub use types::SalePhase;
