use crate::config::{Config, FallbackChoice};
use crate::error::PersistenceError;
use crate::launchd::{self, JobDefinition, JobStore, Removal, Supervisor};
use crate::presenter::Presenter;
use crate::probe::EnvironmentProbe;
use crate::schedule::{self, Activation, UserChoice};
use chrono::{Duration, Local};
use tracing::{info, warn};

/// Terminal result of one invocation, reported back to the agent.
///
/// Everything here exits 0; the gates are designed no-ops, not failures.
/// Only a [`PersistenceError`] escapes as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A descriptor is already installed; nothing was shown.
    AlreadyDeferred,
    /// The freshness check found nothing to act on.
    NothingToDefer,
    /// A blocking app is running; nothing was shown.
    Blocked,
    /// A descriptor was installed for this activation.
    Scheduled(Activation),
    /// Cleanup ran; the descriptor is gone, or never was there.
    CleanedUp,
}

/// Parameters of one invocation, assembled from CLI args and config.
/// Never persisted.
#[derive(Debug, Clone)]
pub struct DeferralRequest {
    pub label: String,
    pub trigger: String,
    pub update_check: bool,
}

/// Prompt mode: gate, prompt, resolve, schedule.
///
/// The pending-descriptor gate is the idempotence boundary for the agent's
/// recurring re-invocation: while a deferral is pending, every further
/// prompt run is a silent no-op.
pub fn run_prompt(
    request: &DeferralRequest,
    config: &Config,
    store: &JobStore,
    probe: &dyn EnvironmentProbe,
    presenter: &dyn Presenter,
    supervisor: &dyn Supervisor,
) -> Result<Outcome, PersistenceError> {
    if probe.has_pending_deferral() {
        info!(label = %request.label, "deferral already scheduled; not prompting again");
        return Ok(Outcome::AlreadyDeferred);
    }

    if request.update_check && !probe.updates_pending() {
        info!("freshness check reports nothing pending; nothing to defer");
        return Ok(Outcome::NothingToDefer);
    }

    if probe.is_blocked() {
        info!("a blocking app is running; not prompting");
        return Ok(Outcome::Blocked);
    }

    let fallback = fallback_choice(config);
    let choice = match presenter.present(&config.defer_options, fallback) {
        Ok(choice) => choice,
        Err(err) => {
            warn!(error = %err, "prompt surface unavailable; resolving to fallback");
            fallback
        }
    };

    // The single wall-clock reading for this invocation.
    let now = Local::now();
    let activation = schedule::resolve(choice, now);

    let job = JobDefinition {
        label: request.label.clone(),
        program_arguments: config.agent.trigger_command(&request.trigger),
        activation,
    };

    if let Err(err) = launchd::install(store, supervisor, &job) {
        presenter.notify_error();
        return Err(err);
    }

    if let Activation::At(when) = activation {
        presenter.confirm(&schedule::human_date(&when));
    }

    info!(label = %request.label, ?activation, "deferral scheduled");
    Ok(Outcome::Scheduled(activation))
}

/// Cleanup mode: remove the descriptor, tolerating absence.
///
/// By the time cleanup is invoked the downstream action has already run;
/// the only job left is hygiene, so the outcome is the same whether a
/// descriptor was present or not.
pub fn run_cleanup(
    request: &DeferralRequest,
    store: &JobStore,
    supervisor: &dyn Supervisor,
) -> Result<Outcome, PersistenceError> {
    match launchd::remove(store, supervisor, &request.label)? {
        Removal::Removed => info!(label = %request.label, "descriptor removed"),
        Removal::NotPresent => {
            info!(label = %request.label, "no descriptor installed; nothing to clean");
        }
    }
    Ok(Outcome::CleanedUp)
}

fn fallback_choice(config: &Config) -> UserChoice {
    match config.fallback {
        FallbackChoice::Now => UserChoice::Now,
        FallbackChoice::LongestDelay => config
            .defer_options
            .iter()
            .copied()
            .max()
            .filter(|secs| *secs > 0)
            .map_or(UserChoice::Now, |secs| {
                UserChoice::Defer(Duration::seconds(i64::from(secs)))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_defaults_to_now() {
        let config = Config::default();
        assert_eq!(fallback_choice(&config), UserChoice::Now);
    }

    #[test]
    fn fallback_can_prefer_the_longest_delay() {
        let config = Config {
            fallback: FallbackChoice::LongestDelay,
            ..Config::default()
        };
        assert_eq!(
            fallback_choice(&config),
            UserChoice::Defer(Duration::seconds(604_800))
        );
    }

    #[test]
    fn longest_delay_over_an_all_zero_menu_still_means_now() {
        let config = Config {
            fallback: FallbackChoice::LongestDelay,
            defer_options: vec![0],
            ..Config::default()
        };
        assert_eq!(fallback_choice(&config), UserChoice::Now);
    }
}
