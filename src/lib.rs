#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod launchd;
pub mod presenter;
pub mod probe;
pub mod schedule;

pub use config::Config;
pub use controller::Outcome;
