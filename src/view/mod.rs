//! Polling and reconciliation for queue views.
//!
//! Dependency order: `source` (one fetch) → `poller` and manual refresh →
//! `state` (reducer) → `presentation` (pure derivations, outside this module).

pub mod controller;
pub mod poller;
pub mod source;
pub mod state;

pub use controller::{AuthFailureHook, PollCondition, QueueView, ViewOptions};
pub use poller::{PollTransition, Poller, RearmPolicy};
pub use source::SnapshotSource;
pub use state::{FetchMode, FetchOutcome, RequestTicket, ViewPhase, ViewState};
