//! Wire framing subsystem.
//!
//! # Data Flow
//! ```text
//! hex line from the capture tool
//!     → codec.rs (hex decode, split metadata / HTTP payload)
//!     → Event (kind, id, meta tokens, raw meta, payload)
//!     → [dispatcher runs handlers]
//!     → codec.rs (hex(raw meta) + hex("\n") + hex(payload) + "\n")
//!     → hex line back to the capture tool
//! ```
//!
//! # Design Decisions
//! - Raw metadata bytes are kept and re-emitted verbatim
//! - The correlation id is an opaque string, never parsed as a number
//! - Unknown kinds decode fine; they are rejected at dispatch time

pub mod codec;
pub mod event;

pub use codec::{decode, encode, FrameError};
pub use event::{Channel, Event};
