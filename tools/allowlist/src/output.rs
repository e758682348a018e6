use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use presale_common::{Address, Snapshot};
use serde::Serialize;
use tempfile::NamedTempFile;

/// Write the full snapshot (`merkleRoot`, `totalAmount`, `claims`).
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    write_json_atomic(path, snapshot)
}

/// Write one `{amount, proof}` file per address into `dir`, named by the
/// lower-case address. Returns the number of files written.
pub fn write_proof_files(dir: &Path, snapshot: &Snapshot) -> Result<usize> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create proof directory {}", dir.display()))?;

    for (key, claim) in &snapshot.claims {
        let address: Address = key
            .parse()
            .with_context(|| format!("Snapshot has invalid address key {}", key))?;
        let path = dir.join(Snapshot::claim_file_name(&address));
        write_json_atomic(&path, claim)?;
        tracing::debug!(address = %address, path = %path.display(), "wrote proof file");
    }

    Ok(snapshot.claims.len())
}

/// Read a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

/// Serialise to a temp file next to `path`, then rename into place.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    serde_json::to_writer(&mut file, value).context("Failed to serialise JSON")?;
    file.flush().context("Failed to flush JSON")?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
