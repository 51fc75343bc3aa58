//! Flat-file store of previously fetched snapshots.
//!
//! Nothing in the publishing pipeline reads or writes this file; it exists for
//! tooling that wants to keep a day-by-day record of past snapshots.

use std::{fs, io, path::Path};

use thiserror::Error;
use tracing::{error, warn};

use crate::CanonicalRecord;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to access history file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid history format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Loads stored snapshots, oldest first. A missing file yields no records.
pub fn load_history<P: AsRef<Path>>(path: P) -> Result<Vec<CanonicalRecord>, HistoryError> {
    let path = path.as_ref();

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "history file not found");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let mut records: Vec<CanonicalRecord> = serde_json::from_slice(&content)
        .inspect_err(|err| error!(path = %path.display(), %err, "invalid history format"))?;
    records.sort_by_key(|record| record.updated_at_unix_timestamp);

    Ok(records)
}

pub fn save_history<P: AsRef<Path>>(
    path: P,
    records: &[CanonicalRecord],
) -> Result<(), HistoryError> {
    let content = serde_json::to_vec_pretty(records)?;
    fs::write(path, content)?;
    Ok(())
}
