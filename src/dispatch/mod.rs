//! Event correlation and dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Event (decoded frame)
//!     → dispatcher.rs (kind → channel prefix)
//!     → registry.rs   (retained "message" + retained <prefix>,
//!                      then drain temporary <prefix>#<id>)
//!     → handler.rs    (run callbacks in order, keep last replacement)
//!     → encoded wire line
//!
//! Background:
//!     sweeper.rs tick → registry.rs sweep (drop stale temporaries)
//! ```
//!
//! # Design Decisions
//! - One read/write lock covers both subscription maps
//! - The lock is released before any callback runs, so handlers may
//!   register follow-up subscriptions
//! - Temporary buckets are drained atomically: each fires at most once

pub mod dispatcher;
pub mod handler;
pub mod registry;
pub mod sweeper;

pub use dispatcher::{DispatchError, Dispatcher};
pub use handler::{BoundArgs, HandlerContext, Registration};
pub use registry::{Registry, RegistryStats};
pub use sweeper::Sweeper;
