use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `deferctl`.
///
/// Gate suppressions (pending deferral, blocking app, nothing to defer) are
/// not errors; they surface as [`crate::controller::Outcome`] variants and
/// exit 0. Only persistence failures escalate to the invoking agent.
#[derive(Debug, Error)]
pub enum DeferError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("persistence: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("presenter: {0}")]
    Presenter(#[from] PresenterError),

    #[error("supervisor: {0}")]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Descriptor persistence errors ──────────────────────────────────────────

/// Fatal for the current invocation; the agent sees a non-zero exit.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to stage descriptor at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set permissions on {path}: {source}")]
    Permissions {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move descriptor into place at {path}: {source}")]
    Replace {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete descriptor at {path}: {source}")]
    Delete {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("supervisor rejected descriptor: {0}")]
    Load(#[from] SupervisorError),
}

// ─── Presenter errors ───────────────────────────────────────────────────────

/// Recovered locally by falling back to the configured default choice;
/// never fatal on its own.
#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("could not invoke prompt helper {helper}: {source}")]
    Spawn {
        helper: String,
        #[source]
        source: std::io::Error,
    },
}

// ─── Supervisor errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to spawn launchctl: {0}")]
    Spawn(String),

    #[error("launchctl failed: {0}")]
    Command(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = DeferError::Config(ConfigError::Validation("empty label".into()));
        assert!(err.to_string().contains("validation failed"));
        assert!(err.to_string().contains("empty label"));
    }

    #[test]
    fn persistence_error_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DeferError::Persistence(PersistenceError::Write {
            path: "/Library/LaunchDaemons/x.plist".into(),
            source: io,
        });
        assert!(err.to_string().contains("/Library/LaunchDaemons/x.plist"));
    }

    #[test]
    fn supervisor_error_wraps_into_persistence() {
        let err: PersistenceError = SupervisorError::Command("Load failed".into()).into();
        assert!(err.to_string().contains("Load failed"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let defer_err: DeferError = anyhow_err.into();
        assert!(defer_err.to_string().contains("something went wrong"));
    }
}
