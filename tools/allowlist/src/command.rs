use std::path::Path;

use anyhow::{bail, Context, Result};
use presale_common::merkle::encode_hash;
use presale_common::{Address, AllowanceTree, Snapshot};
use tracing::{debug, error, info};

use crate::input::read_entries;
use crate::output::{read_snapshot, write_proof_files, write_snapshot};

/// Build the tree from `input`, write the snapshot to `output` and, when
/// given, one proof file per address into `proof_dir`.
pub fn run_build(input: &Path, output: &Path, proof_dir: Option<&Path>) -> Result<Snapshot> {
    info!(input = %input.display(), "reading allowlist");
    let entries = read_entries(input)?;
    info!(entries = entries.len(), "building merkle tree");

    let tree = AllowanceTree::build(entries).context("Failed to build allowlist tree")?;
    let snapshot = tree.to_snapshot();
    info!(
        root = %encode_hash(&tree.root()),
        depth = tree.depth(),
        total_amount = %tree.total_amount(),
        "merkle tree built"
    );

    write_snapshot(output, &snapshot)?;
    info!(output = %output.display(), "wrote snapshot");

    if let Some(dir) = proof_dir {
        let written = write_proof_files(dir, &snapshot)?;
        info!(dir = %dir.display(), files = written, "wrote proof files");
    }

    Ok(snapshot)
}

/// Re-check every claim in `snapshot` (or only `address`) against its root.
/// Returns the number of claims checked; any failing claim is an error.
pub fn run_verify(snapshot: &Path, address: Option<&str>) -> Result<usize> {
    let snapshot = read_snapshot(snapshot)?;

    let addresses: Vec<Address> = match address {
        Some(address) => vec![address.parse::<Address>().context("Invalid --address")?],
        None => snapshot
            .claims
            .keys()
            .map(|key| key.parse::<Address>())
            .collect::<Result<Vec<_>, _>>()
            .context("Snapshot has an invalid address key")?,
    };

    let mut failures = 0usize;
    for address in &addresses {
        match snapshot.verify_claim(address) {
            Ok(true) => debug!(address = %address, "proof ok"),
            Ok(false) => {
                error!(address = %address, "proof does not verify");
                failures += 1;
            }
            Err(e) => {
                error!(address = %address, error = %e, "malformed claim");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} claims failed verification", failures, addresses.len());
    }
    info!(claims = addresses.len(), root = %snapshot.merkle_root, "all claims verified");
    Ok(addresses.len())
}
