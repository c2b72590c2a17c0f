//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → Stop reading input → Finish queued lines → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT/SIGQUIT/SIGHUP → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Intake stops first; lines already accepted are still dispatched
//! - A handler that is running is never interrupted

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::{spawn_signal_handler, wait_for_signal};
