//! Request-line and status-line accessors.
//!
//! A response carries its status code where a request carries its path,
//! so the status helpers share the path slot.

use percent_encoding::percent_decode;

use crate::http::PayloadError;

/// First line of the payload, without its `\n`.
pub(crate) fn first_line(payload: &[u8]) -> &[u8] {
    match payload.iter().position(|&b| b == b'\n') {
        Some(end) => &payload[..end],
        None => payload,
    }
}

/// Byte range of the token between the first and second space.
fn second_token(line: &[u8]) -> Option<(usize, usize)> {
    let start = line.iter().position(|&b| b == b' ')? + 1;
    let len = line[start..].iter().position(|&b| b == b' ')?;
    Some((start, start + len))
}

/// Request method: everything before the first space.
pub fn method(payload: &[u8]) -> Result<String, PayloadError> {
    let end = payload
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| PayloadError::invalid(payload))?;
    Ok(String::from_utf8_lossy(&payload[..end]).into_owned())
}

/// Percent-decoded request target.
///
/// The first line is unescaped before it is split, so an encoded space
/// inside the target ends the token early.
pub fn path(payload: &[u8]) -> Result<String, PayloadError> {
    let line: Vec<u8> = percent_decode(first_line(payload)).collect();
    let (start, end) = second_token(&line).ok_or_else(|| PayloadError::invalid(payload))?;
    Ok(String::from_utf8_lossy(&line[start..end]).into_owned())
}

/// Replace the request target. The new path is written as given.
pub fn set_path(payload: &[u8], new_path: &str) -> Result<Vec<u8>, PayloadError> {
    let (start, end) =
        second_token(first_line(payload)).ok_or_else(|| PayloadError::invalid(payload))?;

    let mut out = Vec::with_capacity(payload.len() - (end - start) + new_path.len());
    out.extend_from_slice(&payload[..start]);
    out.extend_from_slice(new_path.as_bytes());
    out.extend_from_slice(&payload[end..]);
    Ok(out)
}

pub fn status(payload: &[u8]) -> Result<String, PayloadError> {
    path(payload)
}

pub fn set_status(payload: &[u8], new_status: &str) -> Result<Vec<u8>, PayloadError> {
    set_path(payload, new_status)
}
