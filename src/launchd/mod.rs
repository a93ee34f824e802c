//! Persistence of one-shot launchd jobs: the descriptor store, the plist
//! serialization, and the `launchctl` seam.

mod plist;
mod remover;
mod store;
mod supervisor;
mod writer;

pub use plist::JobDefinition;
pub use remover::{Removal, remove};
pub use store::JobStore;
pub use supervisor::{Launchctl, Supervisor};
pub use writer::install;
