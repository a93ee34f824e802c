use crate::config::{Config, UpdateCheckConfig};
use crate::launchd::JobStore;
use std::path::PathBuf;
use std::process::Command;
use sysinfo::System;
use tracing::{debug, warn};

/// The yes/no questions the controller gates on before prompting.
///
/// Must not have side effects: a probe answers, it never mutates the
/// descriptor store.
pub trait EnvironmentProbe {
    /// A descriptor for the label is already installed, regardless of its
    /// activation state.
    fn has_pending_deferral(&self) -> bool;

    /// A configured blocking app is currently running. Best-effort: process
    /// presence only, no foreground or full-screen detection.
    fn is_blocked(&self) -> bool;

    /// The external freshness check reports something to act on.
    fn updates_pending(&self) -> bool;
}

/// Production probe backed by the descriptor store, the process table and
/// the configured freshness command.
pub struct SystemProbe {
    descriptor_path: PathBuf,
    blocking_apps: Vec<String>,
    update_check: UpdateCheckConfig,
}

impl SystemProbe {
    pub fn new(store: &JobStore, config: &Config, label: &str) -> Self {
        Self {
            descriptor_path: store.descriptor_path(label),
            blocking_apps: config.blocking_apps.clone(),
            update_check: config.update_check.clone(),
        }
    }
}

impl EnvironmentProbe for SystemProbe {
    fn has_pending_deferral(&self) -> bool {
        self.descriptor_path.exists()
    }

    fn is_blocked(&self) -> bool {
        let mut system = System::new_all();
        system.refresh_processes();
        let processes = system.processes();
        if processes.is_empty() {
            // Fails open; the gate never crashes over a missing capability.
            warn!("process enumeration returned nothing; treating as not blocked");
            return false;
        }

        for process in processes.values() {
            let name = process.name();
            if let Some(app) = self
                .blocking_apps
                .iter()
                .find(|app| name_matches(name, app))
            {
                debug!(app = %app, process = %name, "blocking app is running");
                return true;
            }
        }
        false
    }

    fn updates_pending(&self) -> bool {
        let Some((binary, args)) = self.update_check.command.split_first() else {
            warn!("update check command is empty; treating updates as pending");
            return true;
        };

        match Command::new(binary).args(args).output() {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                reports_pending(&stdout, &self.update_check.pending_marker)
            }
            Err(err) => {
                // A broken check must not silently drop the managed action.
                warn!(error = %err, "update check could not run; treating updates as pending");
                true
            }
        }
    }
}

/// A blocking entry matches its process case-insensitively; an entry also
/// matches a longer bundle-style process name that contains it.
fn name_matches(process: &str, app: &str) -> bool {
    process.eq_ignore_ascii_case(app)
        || process.to_ascii_lowercase().contains(&app.to_ascii_lowercase())
}

fn reports_pending(stdout: &str, marker: &str) -> bool {
    stdout
        .lines()
        .any(|line| line.trim_start().starts_with(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_name_matches_case_insensitively() {
        assert!(name_matches("keynote", "Keynote"));
        assert!(name_matches("Keynote", "Keynote"));
    }

    #[test]
    fn entry_matches_inside_a_longer_process_name() {
        assert!(name_matches("Microsoft PowerPoint Helper", "Microsoft PowerPoint"));
    }

    #[test]
    fn unrelated_names_do_not_match() {
        assert!(!name_matches("Safari", "Keynote"));
        assert!(!name_matches("Keyno", "Keynote"));
    }

    #[test]
    fn softwareupdate_listing_reports_pending() {
        let listing = "Software Update found the following new or updated software:\n\
                       * Label: macOS Sonoma 14.5\n\
                       \tTitle: macOS Sonoma 14.5, Size: 870000K\n";
        assert!(reports_pending(listing, "*"));
    }

    #[test]
    fn empty_listing_reports_nothing_pending() {
        assert!(!reports_pending("No new software available.\n", "*"));
        assert!(!reports_pending("", "*"));
    }
}
