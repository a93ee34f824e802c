use super::{JobDefinition, JobStore, Supervisor};
use crate::error::PersistenceError;
use std::fs;
use tracing::warn;

/// Installs `job` into the store and hands it to the supervisor.
///
/// The descriptor is staged next to its final path and moved into place
/// with a rename, so the supervisor never observes a half-written file and
/// any prior descriptor for the same label is replaced in one step.
/// Installing the same job twice yields the same end state.
pub fn install(
    store: &JobStore,
    supervisor: &dyn Supervisor,
    job: &JobDefinition,
) -> Result<(), PersistenceError> {
    let path = store.descriptor_path(&job.label);
    let staging = path.with_extension("plist.tmp");

    fs::write(&staging, job.to_plist()).map_err(|source| PersistenceError::Write {
        path: staging.display().to_string(),
        source,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&staging, fs::Permissions::from_mode(0o644)).map_err(|source| {
            PersistenceError::Permissions {
                path: staging.display().to_string(),
                source,
            }
        })?;
        // launchd enforces root:wheel ownership at load time; setting it
        // here only works in a privileged run.
        if let Err(err) = std::os::unix::fs::chown(&staging, Some(0), Some(0)) {
            warn!(error = %err, "could not set root:wheel on descriptor");
        }
    }

    fs::rename(&staging, &path).map_err(|source| PersistenceError::Replace {
        path: path.display().to_string(),
        source,
    })?;

    supervisor.load(&path).map_err(PersistenceError::Load)?;
    Ok(())
}
