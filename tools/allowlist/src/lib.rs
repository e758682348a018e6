pub mod command;
pub mod input;
pub mod output;

pub use command::{run_build, run_verify};
pub use input::read_entries;
pub use output::{read_snapshot, write_proof_files, write_snapshot};
