use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use deferctl::cli::{Cli, Commands};
use deferctl::config::Config;
use deferctl::controller::{self, DeferralRequest, Outcome};
use deferctl::launchd::{JobStore, Launchctl};
use deferctl::presenter::HelperPresenter;
use deferctl::probe::SystemProbe;
use deferctl::schedule::{self, Activation};

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let mut config = Config::load_or_init()?;
    config.apply_env_overrides();

    let store = JobStore::new(&config.jobs_dir);
    let supervisor = Launchctl;

    let outcome = match cli.command {
        Commands::Prompt {
            label,
            trigger,
            update_check,
        } => {
            let request = DeferralRequest {
                label: label.unwrap_or_else(|| config.label.clone()),
                trigger: trigger.unwrap_or_else(|| config.trigger.clone()),
                update_check,
            };
            let probe = SystemProbe::new(&store, &config, &request.label);
            let presenter = HelperPresenter::new(config.helper.clone());
            controller::run_prompt(&request, &config, &store, &probe, &presenter, &supervisor)?
        }
        Commands::Cleanup { label } => {
            let request = DeferralRequest {
                label: label.unwrap_or_else(|| config.label.clone()),
                trigger: config.trigger.clone(),
                update_check: false,
            };
            controller::run_cleanup(&request, &store, &supervisor)?
        }
    };

    match outcome {
        Outcome::AlreadyDeferred => {
            println!("The user has already chosen to defer this action.");
        }
        Outcome::NothingToDefer => println!("Nothing pending; no deferral offered."),
        Outcome::Blocked => println!("A blocking app is running; no prompt shown."),
        Outcome::Scheduled(Activation::Immediate) => {
            println!("✅ Action will run immediately.");
        }
        Outcome::Scheduled(Activation::At(when)) => {
            println!("✅ Action deferred until {}.", schedule::human_date(&when));
        }
        Outcome::CleanedUp => println!("✅ Deferral descriptor cleaned up."),
    }

    Ok(())
}
