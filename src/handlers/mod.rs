//! Built-in handlers.
//!
//! # Responsibilities
//! - rewrite.rs: config-driven payload rewrite rules (retained handlers)
//! - replay_check.rs: original-vs-replay status comparison built from
//!   chained one-shot handlers
//!
//! # Design Decisions
//! - Built-ins go through the same registry API as user handlers
//! - A handler that cannot edit a payload passes the event through

pub mod replay_check;
pub mod rewrite;

pub use replay_check::ReplayStats;
pub use rewrite::install_rules;
