//! Middleware for a traffic capture-and-replay tool.
//!
//! Reads hex-encoded frames from the capture tool, runs registered handlers
//! over each decoded event and writes the (possibly rewritten) frame back.

pub mod config;
pub mod dispatch;
pub mod frame;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod runtime;

pub use config::MiddlewareConfig;
pub use dispatch::{Dispatcher, Registry};
pub use frame::{Channel, Event};
pub use lifecycle::Shutdown;
pub use runtime::Middleware;
