//! Update domain — periodic checks, one-shot notifications, restart on install.
//!
//! `state` is the pure state machine, `driver` owns the timer and executes
//! effects, `host` binds both to the Tauri updater plugin and dialogs.

mod driver;
mod host;
mod state;

pub use driver::{UpdateDriver, UpdateError, UpdateHost};
pub use host::TauriUpdateHost;
pub use state::{UpdateCoordinator, UpdateEffect, UpdateEvent, UpdatePhase, UpdateState};
