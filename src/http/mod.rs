//! Raw-text HTTP view.
//!
//! # Data Flow
//! ```text
//! Event payload (undecoded HTTP bytes)
//!     → line.rs   (method, path, status on the first line)
//!     → query.rs  (query parameters inside the path)
//!     → header.rs (header lookup and in-place rewrite)
//!     → new payload bytes handed back to the handler
//! ```
//!
//! # Design Decisions
//! - No structured HTTP object is ever built; edits are byte splices
//! - Everything outside the edited span is preserved verbatim
//! - Only the first matching header is seen; folded and repeated headers
//!   are not interpreted

use thiserror::Error;

pub mod header;
pub mod line;
pub mod query;

pub use header::{header, set_header, HeaderField};
pub use line::{method, path, set_path, set_status, status};
pub use query::{path_param, set_path_param};

/// Longest payload prefix quoted in an error message.
const PREVIEW_LEN: usize = 64;

/// Errors from payload accessors and mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload lacks a delimiter the operation relies on.
    #[error("invalid payload: {0:?}")]
    InvalidPayload(String),
}

impl PayloadError {
    pub(crate) fn invalid(payload: &[u8]) -> Self {
        let end = payload.len().min(PREVIEW_LEN);
        PayloadError::InvalidPayload(String::from_utf8_lossy(&payload[..end]).into_owned())
    }
}
