//! Filesystem helpers for reading/writing record artifacts.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::StoreError;

/// Result returned after writing a record artifact.
#[derive(Debug, Clone)]
pub struct RecordWriteOutcome {
    pub path: PathBuf,
    pub hash: String,
}

/// Loads a JSON record artifact if it exists.
pub fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(StoreError::Unavailable(format!(
                "failed reading {}: {err}",
                path.display()
            )))
        }
    };
    let value = serde_json::from_slice(&data).map_err(|err| {
        StoreError::Unavailable(format!("failed parsing {}: {err}", path.display()))
    })?;
    Ok(Some(value))
}

/// Writes a JSON record so that readers see either the old or the new file.
///
/// The payload goes to a sibling temp file, is flushed to disk, then renamed
/// over the destination. The directory is synced afterwards so the rename
/// itself survives a crash.
pub fn write_record<T: Serialize>(path: &Path, value: &T) -> Result<RecordWriteOutcome, StoreError> {
    let parent = path.parent().ok_or_else(|| {
        StoreError::Unavailable(format!("record path {} has no parent", path.display()))
    })?;
    fs::create_dir_all(parent).map_err(|err| {
        StoreError::Unavailable(format!("failed creating {}: {err}", parent.display()))
    })?;
    let payload = serde_json::to_vec_pretty(value)?;
    let hash = compute_hash(&payload);
    let tmp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));
    let written = write_synced(&tmp_path, &payload).and_then(|_| fs::rename(&tmp_path, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Unavailable(format!(
            "failed writing {}: {err}",
            path.display()
        )));
    }
    sync_dir(parent).map_err(|err| {
        StoreError::Unavailable(format!("failed syncing {}: {err}", parent.display()))
    })?;
    Ok(RecordWriteOutcome {
        path: path.to_path_buf(),
        hash,
    })
}

fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

// Directory handles cannot be fsynced on this platform.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Removes a file, treating "already gone" as success.
pub fn remove_record(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StoreError::Unavailable(format!(
            "failed removing {}: {err}",
            path.display()
        ))),
    }
}

/// Computes a lowercase hex SHA-256 hash of the provided bytes.
pub fn compute_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}
