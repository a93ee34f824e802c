use clap::{Parser, Subcommand};

/// `deferctl` — defer disruptive managed actions to a user-chosen time.
///
/// The management agent invokes this twice per action: once in `prompt`
/// mode to offer the deferral, and once in `cleanup` mode after the
/// deferred action has run.
#[derive(Parser, Debug)]
#[command(name = "deferctl")]
#[command(version)]
#[command(
    about = "Let the end user pick when a disruptive managed action runs.",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Offer a deferral and schedule the chosen activation
    Prompt {
        /// Descriptor label (overrides the config default)
        #[arg(long)]
        label: Option<String>,

        /// Agent trigger invoked when the job fires (overrides the config default)
        #[arg(long)]
        trigger: Option<String>,

        /// Skip prompting when the freshness check reports nothing pending
        #[arg(long)]
        update_check: bool,
    },

    /// Remove a previously scheduled deferral descriptor
    Cleanup {
        /// Descriptor label (overrides the config default)
        #[arg(long)]
        label: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn prompt_accepts_overrides() {
        let cli = Cli::parse_from([
            "deferctl",
            "prompt",
            "--label",
            "com.corp.reboot",
            "--trigger",
            "reboot-now",
            "--update-check",
        ]);
        match cli.command {
            Commands::Prompt {
                label,
                trigger,
                update_check,
            } => {
                assert_eq!(label.as_deref(), Some("com.corp.reboot"));
                assert_eq!(trigger.as_deref(), Some("reboot-now"));
                assert!(update_check);
            }
            Commands::Cleanup { .. } => panic!("parsed the wrong subcommand"),
        }
    }

    #[test]
    fn cleanup_defaults_label_to_config() {
        let cli = Cli::parse_from(["deferctl", "cleanup"]);
        match cli.command {
            Commands::Cleanup { label } => assert!(label.is_none()),
            Commands::Prompt { .. } => panic!("parsed the wrong subcommand"),
        }
    }
}
