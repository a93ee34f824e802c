use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Where the supervisor's job-definition files live.
    #[serde(default = "default_jobs_dir")]
    pub jobs_dir: PathBuf,

    /// Reverse-domain label naming the persisted descriptor.
    #[serde(default = "default_label")]
    pub label: String,

    /// Opaque trigger the agent uses to route the re-invocation.
    #[serde(default = "default_trigger")]
    pub trigger: String,

    /// Process names that suppress prompting while running.
    #[serde(default = "default_blocking_apps")]
    pub blocking_apps: Vec<String>,

    /// Offered delays in seconds, in menu order. The first entry is the
    /// helper's preselected option.
    #[serde(default = "default_defer_options")]
    pub defer_options: Vec<u32>,

    /// What an unanswered or failed prompt resolves to.
    #[serde(default)]
    pub fallback: FallbackChoice,

    #[serde(default)]
    pub helper: HelperConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub update_check: UpdateCheckConfig,
}

/// Policy for a dialog that was dismissed, timed out, or never shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackChoice {
    /// Run the action immediately. Guarantees eventual execution.
    #[default]
    Now,
    /// Take the longest offered delay instead.
    LongestDelay,
}

fn default_jobs_dir() -> PathBuf {
    PathBuf::from("/Library/LaunchDaemons")
}

fn default_label() -> String {
    "io.deferctl.deferred-action".into()
}

fn default_trigger() -> String {
    "deferred-action-trigger".into()
}

fn default_blocking_apps() -> Vec<String> {
    vec!["Keynote".into(), "Microsoft PowerPoint".into()]
}

fn default_defer_options() -> Vec<u32> {
    vec![300, 0, 1800, 3600, 14_400, 43_200, 604_800]
}

// ─── GUI helper ─────────────────────────────────────────────────────────────

/// Window text and binary location for the external prompt surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperConfig {
    #[serde(default = "default_helper_path")]
    pub path: String,

    #[serde(default = "default_window_title")]
    pub window_title: String,

    #[serde(default = "default_heading")]
    pub heading: String,

    #[serde(default = "default_message")]
    pub message: String,

    #[serde(default = "default_icon")]
    pub icon: String,

    #[serde(default = "default_button")]
    pub button: String,

    /// Optional timeout for the deferral prompt itself. `None` waits for
    /// the user indefinitely.
    #[serde(default)]
    pub prompt_timeout_secs: Option<u32>,

    #[serde(default = "default_confirm_heading")]
    pub confirm_heading: String,

    /// Shown after a deferred schedule is installed; `{date}` is replaced
    /// with the human-readable activation time.
    #[serde(default = "default_confirm_message")]
    pub confirm_message: String,

    #[serde(default = "default_confirm_button")]
    pub confirm_button: String,

    #[serde(default = "default_error_heading")]
    pub error_heading: String,

    #[serde(default = "default_error_message")]
    pub error_message: String,

    #[serde(default = "default_error_icon")]
    pub error_icon: String,

    /// Timeout for the confirmation and error dialogs, which need no answer.
    #[serde(default = "default_dialog_timeout_secs")]
    pub dialog_timeout_secs: u32,
}

impl HelperConfig {
    pub fn expanded_path(&self) -> String {
        shellexpand::tilde(&self.path).into_owned()
    }

    pub fn expanded_icon(&self) -> String {
        shellexpand::tilde(&self.icon).into_owned()
    }

    pub fn expanded_error_icon(&self) -> String {
        shellexpand::tilde(&self.error_icon).into_owned()
    }
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            path: default_helper_path(),
            window_title: default_window_title(),
            heading: default_heading(),
            message: default_message(),
            icon: default_icon(),
            button: default_button(),
            prompt_timeout_secs: None,
            confirm_heading: default_confirm_heading(),
            confirm_message: default_confirm_message(),
            confirm_button: default_confirm_button(),
            error_heading: default_error_heading(),
            error_message: default_error_message(),
            error_icon: default_error_icon(),
            dialog_timeout_secs: default_dialog_timeout_secs(),
        }
    }
}

fn default_helper_path() -> String {
    "/Library/Application Support/JAMF/bin/jamfHelper.app/Contents/MacOS/jamfHelper".into()
}

fn default_window_title() -> String {
    "IT Notification".into()
}

fn default_heading() -> String {
    "Software updates are ready to be installed.".into()
}

fn default_message() -> String {
    "Software updates are available for your Mac.\n\n\
     NOTE: Some required updates will require rebooting your computer once installed.\n\n\
     You may schedule these updates for a convenient time by choosing when to start installation.\n"
        .into()
}

fn default_icon() -> String {
    "/System/Library/CoreServices/Software Update.app/Contents/Resources/SoftwareUpdate.icns".into()
}

fn default_button() -> String {
    "Okay".into()
}

fn default_confirm_heading() -> String {
    "Update scheduled".into()
}

fn default_confirm_message() -> String {
    "Installation of required updates will begin on {date}.".into()
}

fn default_confirm_button() -> String {
    "OK".into()
}

fn default_error_heading() -> String {
    "An error occurred.".into()
}

fn default_error_message() -> String {
    "A problem occurred processing your request. Please contact your administrator for assistance."
        .into()
}

fn default_error_icon() -> String {
    "/System/Library/CoreServices/CoreTypes.bundle/Contents/Resources/AlertStopIcon.icns".into()
}

fn default_dialog_timeout_secs() -> u32 {
    60
}

// ─── Management agent ───────────────────────────────────────────────────────

/// How the scheduled job reaches back into the management agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_binary")]
    pub binary: String,

    /// Arguments placed between the binary and the trigger name.
    #[serde(default = "default_event_args")]
    pub event_args: Vec<String>,
}

impl AgentConfig {
    /// The argv the supervisor runs when the job fires.
    pub fn trigger_command(&self, trigger: &str) -> Vec<String> {
        let mut argv = vec![shellexpand::tilde(&self.binary).into_owned()];
        argv.extend(self.event_args.iter().cloned());
        argv.push(trigger.to_string());
        argv
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            binary: default_agent_binary(),
            event_args: default_event_args(),
        }
    }
}

fn default_agent_binary() -> String {
    "/usr/local/bin/jamf".into()
}

fn default_event_args() -> Vec<String> {
    vec!["policy".into(), "-event".into()]
}

// ─── Freshness check ────────────────────────────────────────────────────────

/// External command consulted by the optional update-check gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCheckConfig {
    #[serde(default = "default_update_check_command")]
    pub command: Vec<String>,

    /// A stdout line starting with this marker means something is pending.
    #[serde(default = "default_pending_marker")]
    pub pending_marker: String,
}

impl Default for UpdateCheckConfig {
    fn default() -> Self {
        Self {
            command: default_update_check_command(),
            pending_marker: default_pending_marker(),
        }
    }
}

fn default_update_check_command() -> Vec<String> {
    vec![
        "/usr/sbin/softwareupdate".into(),
        "-l".into(),
        "--no-scan".into(),
    ]
}

fn default_pending_marker() -> String {
    "*".into()
}

// ─── Loading and persistence ────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            jobs_dir: default_jobs_dir(),
            label: default_label(),
            trigger: default_trigger(),
            blocking_apps: default_blocking_apps(),
            defer_options: default_defer_options(),
            fallback: FallbackChoice::default(),
            helper: HelperConfig::default(),
            agent: AgentConfig::default(),
            update_check: UpdateCheckConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let deferctl_dir = home.join(".deferctl");
        let config_path = deferctl_dir.join("config.toml");

        if !deferctl_dir.exists() {
            fs::create_dir_all(&deferctl_dir).context("Failed to create .deferctl directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(label) = std::env::var("DEFERCTL_LABEL") {
            if !label.is_empty() {
                self.label = label;
            }
        }

        if let Ok(trigger) = std::env::var("DEFERCTL_TRIGGER") {
            if !trigger.is_empty() {
                self.trigger = trigger;
            }
        }

        if let Ok(dir) = std::env::var("DEFERCTL_JOBS_DIR") {
            if !dir.is_empty() {
                self.jobs_dir = PathBuf::from(dir);
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::Validation("label must not be empty".into()));
        }
        if self.trigger.trim().is_empty() {
            return Err(ConfigError::Validation("trigger must not be empty".into()));
        }
        if self.defer_options.is_empty() {
            return Err(ConfigError::Validation(
                "defer_options must offer at least one choice".into(),
            ));
        }
        Ok(())
    }
}
