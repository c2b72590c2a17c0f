//! Header lookup and rewrite on raw payload bytes.
//!
//! The scan walks the header block line by line, starting after the
//! request/status line and stopping at the blank line that ends the block.
//! A header line is any line with a `:`; the name is everything before it.

use crate::http::line::first_line;
use crate::http::PayloadError;

/// A header located inside a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Value with surrounding whitespace trimmed.
    pub value: String,
    /// Offset just past the `:`.
    pub value_start: usize,
    /// Offset just past the line's `\n`.
    pub line_end: usize,
}

/// Find the first header named `name` (ASCII case-insensitive).
///
/// Returns `None` when the header block has no such line. A header line
/// without a terminating `\n` is not considered.
pub fn header(payload: &[u8], name: &str) -> Option<HeaderField> {
    let mut line_start = first_line(payload).len() + 1;

    while line_start < payload.len() {
        let len = payload[line_start..].iter().position(|&b| b == b'\n')?;
        let line_end = line_start + len + 1;
        let line = &payload[line_start..line_end - 1];

        if line.iter().all(|&b| b == b'\r') {
            return None;
        }

        if let Some(colon) = line.iter().position(|&b| b == b':') {
            if line[..colon].eq_ignore_ascii_case(name.as_bytes()) {
                let value = &line[colon + 1..];
                return Some(HeaderField {
                    value: String::from_utf8_lossy(value.trim_ascii()).into_owned(),
                    value_start: line_start + colon + 1,
                    line_end,
                });
            }
        }

        line_start = line_end;
    }

    None
}

/// Set header `name` to `value`.
///
/// An existing line keeps its name spelling and gets ` value\r\n` after the
/// colon. A missing header is inserted right after the first line.
pub fn set_header(payload: &[u8], name: &str, value: &str) -> Result<Vec<u8>, PayloadError> {
    let mut out = Vec::with_capacity(payload.len() + name.len() + value.len() + 4);

    match header(payload, name) {
        Some(field) => {
            out.extend_from_slice(&payload[..field.value_start]);
            out.push(b' ');
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&payload[field.line_end..]);
        }
        None => {
            let headers_start = payload
                .iter()
                .position(|&b| b == b'\n')
                .ok_or_else(|| PayloadError::invalid(payload))?
                + 1;
            out.extend_from_slice(&payload[..headers_start]);
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&payload[headers_start..]);
        }
    }

    Ok(out)
}
