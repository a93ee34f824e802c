use crate::error::SupervisorError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// The OS task supervisor that honors installed descriptor files.
///
/// A trait seam so the controller and the writer/remover are testable
/// without a live launchd.
pub trait Supervisor {
    /// Make the supervisor pick up an installed descriptor.
    fn load(&self, path: &Path) -> Result<(), SupervisorError>;

    /// Stop the job if it is running and unload its descriptor.
    fn unload(&self, label: &str, path: &Path) -> Result<(), SupervisorError>;
}

/// Drives launchd through `launchctl`.
pub struct Launchctl;

impl Supervisor for Launchctl {
    fn load(&self, path: &Path) -> Result<(), SupervisorError> {
        run_checked(Command::new("launchctl").arg("load").arg(path))
    }

    fn unload(&self, label: &str, path: &Path) -> Result<(), SupervisorError> {
        // A job that never fired has nothing to stop.
        if let Err(err) = run_checked(Command::new("launchctl").arg("stop").arg(label)) {
            debug!(label, error = %err, "stop was a no-op");
        }
        run_checked(Command::new("launchctl").arg("unload").arg(path))
    }
}

fn run_checked(command: &mut Command) -> Result<(), SupervisorError> {
    let output = command
        .output()
        .map_err(|err| SupervisorError::Spawn(err.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SupervisorError::Command(stderr.trim().to_string()));
    }
    Ok(())
}
