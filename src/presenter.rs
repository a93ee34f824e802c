use crate::config::HelperConfig;
use crate::error::PresenterError;
use crate::schedule::UserChoice;
use chrono::Duration;
use std::process::Command;
use tracing::{debug, warn};

/// Presents the deferral choices to the user.
///
/// Implementations block until the user answers or the surface's own
/// timeout elapses. They never decide policy: the caller supplies the
/// `fallback` that an unanswered prompt resolves to, and maps a hard
/// failure to that same fallback.
pub trait Presenter {
    /// Ask the user to pick a delay. `delays` are seconds, in menu order.
    fn present(&self, delays: &[u32], fallback: UserChoice)
    -> Result<UserChoice, PresenterError>;

    /// Best-effort confirmation dialog after a deferral is scheduled.
    fn confirm(&self, scheduled_for: &str);

    /// Best-effort error dialog before a fatal exit.
    fn notify_error(&self);
}

/// Drives the management suite's GUI helper binary.
///
/// The helper draws a modal utility window with the delay menu and prints
/// the selection to stdout: the chosen seconds value with the clicked
/// button's index appended as a final digit.
pub struct HelperPresenter {
    helper: HelperConfig,
}

impl HelperPresenter {
    pub fn new(helper: HelperConfig) -> Self {
        Self { helper }
    }

    fn dialog(&self, heading: &str, message: &str, icon: &str, button: &str) {
        let helper = self.helper.expanded_path();
        let timeout = self.helper.dialog_timeout_secs.to_string();
        let result = Command::new(&helper)
            .args(["-windowType", "utility"])
            .args(["-title", self.helper.window_title.as_str()])
            .args(["-heading", heading])
            .args(["-icon", icon])
            .args(["-description", message])
            .args(["-button1", button])
            .args(["-timeout", timeout.as_str()])
            .arg("-lockHUD")
            .output();
        if let Err(err) = result {
            warn!(helper = %helper, error = %err, "could not show dialog");
        }
    }
}

impl Presenter for HelperPresenter {
    fn present(
        &self,
        delays: &[u32],
        fallback: UserChoice,
    ) -> Result<UserChoice, PresenterError> {
        let options = delays
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let helper = self.helper.expanded_path();
        let icon = self.helper.expanded_icon();

        let mut command = Command::new(&helper);
        command
            .args(["-windowType", "utility"])
            .args(["-title", self.helper.window_title.as_str()])
            .args(["-heading", self.helper.heading.as_str()])
            .args(["-icon", icon.as_str()])
            .args(["-description", self.helper.message.as_str()])
            .args(["-button1", self.helper.button.as_str()])
            .args(["-showDelayOptions", options.as_str()])
            .arg("-lockHUD");
        if let Some(timeout) = self.helper.prompt_timeout_secs {
            command.args(["-timeout", timeout.to_string().as_str()]);
        }

        let output = command.output().map_err(|source| PresenterError::Spawn {
            helper: helper.clone(),
            source,
        })?;

        let raw = String::from_utf8_lossy(&output.stdout);
        match parse_selection(raw.trim()) {
            Some(choice) => Ok(choice),
            None => {
                debug!(raw = %raw.trim(), "no usable selection; resolving to fallback");
                Ok(fallback)
            }
        }
    }

    fn confirm(&self, scheduled_for: &str) {
        let message = self.helper.confirm_message.replace("{date}", scheduled_for);
        self.dialog(
            &self.helper.confirm_heading,
            &message,
            &self.helper.expanded_icon(),
            &self.helper.confirm_button,
        );
    }

    fn notify_error(&self) {
        self.dialog(
            &self.helper.error_heading,
            &self.helper.error_message,
            &self.helper.expanded_error_icon(),
            "Close",
        );
    }
}

/// Parses the helper's stdout. The last digit is the button index; the rest
/// is the selected delay in seconds. An empty or malformed value (dismissed
/// window, helper timeout) yields `None`.
fn parse_selection(raw: &str) -> Option<UserChoice> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seconds = &raw[..raw.len() - 1];
    if seconds.is_empty() {
        return Some(UserChoice::Now);
    }
    match seconds.parse::<i64>() {
        Ok(0) => Some(UserChoice::Now),
        Ok(secs) => Some(UserChoice::Defer(Duration::seconds(secs))),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_selection_strips_the_button_index() {
        assert_eq!(
            parse_selection("3001"),
            Some(UserChoice::Defer(Duration::seconds(300)))
        );
        assert_eq!(
            parse_selection("144001"),
            Some(UserChoice::Defer(Duration::seconds(14_400)))
        );
    }

    #[test]
    fn bare_button_press_means_now() {
        assert_eq!(parse_selection("1"), Some(UserChoice::Now));
    }

    #[test]
    fn zero_delay_means_now() {
        assert_eq!(parse_selection("01"), Some(UserChoice::Now));
    }

    #[test]
    fn empty_output_yields_no_selection() {
        assert_eq!(parse_selection(""), None);
    }

    #[test]
    fn garbage_output_yields_no_selection() {
        assert_eq!(parse_selection("cancelled"), None);
        assert_eq!(parse_selection("30 01"), None);
    }
}
