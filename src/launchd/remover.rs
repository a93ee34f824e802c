use super::{JobStore, Supervisor};
use crate::error::PersistenceError;
use std::fs;
use tracing::warn;

/// What a cleanup pass found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotPresent,
}

/// Unloads and deletes the descriptor for `label`.
///
/// A missing descriptor is a successful no-op: cleanup may run without a
/// prior prompt run and must not fail the calling policy. An unload
/// failure is logged and the file is still deleted, so a stale entry
/// cannot outlive the action it scheduled.
pub fn remove(
    store: &JobStore,
    supervisor: &dyn Supervisor,
    label: &str,
) -> Result<Removal, PersistenceError> {
    let path = store.descriptor_path(label);
    if !path.exists() {
        return Ok(Removal::NotPresent);
    }

    if let Err(err) = supervisor.unload(label, &path) {
        warn!(label, error = %err, "could not unload job; removing descriptor anyway");
    }

    fs::remove_file(&path).map_err(|source| PersistenceError::Delete {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Removal::Removed)
}
