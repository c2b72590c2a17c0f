//! Hex line codec.
//!
//! A wire line is `hex(<meta>\n<http payload>)`. Encoding writes the three
//! parts as separate hex blocks; hex has no block boundaries so the result
//! is indistinguishable from encoding the joined bytes.

use thiserror::Error;

use crate::frame::event::Event;

/// A wire line that cannot be turned into an [`Event`].
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("malformed frame: no newline between metadata and payload")]
    MissingSeparator,

    #[error("malformed frame: metadata {0:?} has no correlation id")]
    MissingId(String),
}

/// Decode one wire line.
pub fn decode(line: &str) -> Result<Event, FrameError> {
    let bytes = hex::decode(line.trim())?;

    let meta_end = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(FrameError::MissingSeparator)?;

    let raw_meta = bytes[..meta_end].to_vec();
    let meta: Vec<Vec<u8>> = raw_meta.split(|&b| b == b' ').map(<[u8]>::to_vec).collect();

    let kind = String::from_utf8_lossy(&meta[0]).into_owned();
    let id = match meta.get(1) {
        Some(id) if !id.is_empty() => String::from_utf8_lossy(id).into_owned(),
        _ => {
            return Err(FrameError::MissingId(
                String::from_utf8_lossy(&raw_meta).into_owned(),
            ))
        }
    };

    Ok(Event {
        id,
        kind,
        meta,
        raw_meta,
        payload: bytes[meta_end + 1..].to_vec(),
    })
}

/// Encode an event back into a newline-terminated wire line.
pub fn encode(event: &Event) -> String {
    let mut line = String::with_capacity((event.raw_meta.len() + event.payload.len() + 1) * 2 + 1);
    line.push_str(&hex::encode(&event.raw_meta));
    line.push_str(&hex::encode(b"\n"));
    line.push_str(&hex::encode(&event.payload));
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(raw: &str) -> String {
        hex::encode(raw.as_bytes())
    }

    #[test]
    fn decode_request_frame() {
        let event = decode(&wire("1 2 3\nGET / HTTP/1.1\r\n\r\n")).unwrap();
        assert_eq!(event.kind, "1");
        assert_eq!(event.id, "2");
        assert_eq!(event.timestamp(), Some(&b"3"[..]));
        assert_eq!(event.latency(), None);
        assert_eq!(event.raw_meta, b"1 2 3");
        assert_eq!(event.payload, b"GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn id_is_opaque() {
        let line = wire("2 8e091765ae902fef8a2b7d9dd960e9d52222bd8c 1522060932227543000 1141\nHTTP/1.1 200 OK\r\n\r\n");
        let event = decode(&line).unwrap();
        assert_eq!(event.id, "8e091765ae902fef8a2b7d9dd960e9d52222bd8c");
        assert_eq!(event.latency(), Some(&b"1141"[..]));
        assert_eq!(event.meta.len(), 4);
    }

    #[test]
    fn reencode_is_byte_identical() {
        let line = wire("1 abc 1522060932227543000 0\nPOST /a?b=c HTTP/1.1\r\nHost: x\r\n\r\nbody\nmore");
        let event = decode(&line).unwrap();
        assert_eq!(encode(&event), format!("{line}\n"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let line = format!("  {}\r\n", wire("1 2 3\nGET / HTTP/1.1\r\n\r\n"));
        assert_eq!(decode(&line).unwrap().id, "2");
    }

    #[test]
    fn payload_may_be_empty() {
        let event = decode(&wire("1 2 3\n")).unwrap();
        assert!(event.payload.is_empty());
        assert_eq!(encode(&event), format!("{}\n", wire("1 2 3\n")));
    }

    #[test]
    fn invalid_hex_is_malformed() {
        assert!(matches!(decode("zz"), Err(FrameError::InvalidHex(_))));
        assert!(matches!(decode("abc"), Err(FrameError::InvalidHex(_))));
    }

    #[test]
    fn missing_newline_is_malformed() {
        let err = decode(&wire("1 2 3 GET / HTTP/1.1")).unwrap_err();
        assert!(matches!(err, FrameError::MissingSeparator));
        assert!(err.to_string().starts_with("malformed frame"));
    }

    #[test]
    fn missing_id_is_malformed() {
        assert!(matches!(decode(&wire("1\nGET / HTTP/1.1\r\n\r\n")), Err(FrameError::MissingId(_))));
        assert!(matches!(decode(&wire("\nGET / HTTP/1.1\r\n\r\n")), Err(FrameError::MissingId(_))));
    }

    #[test]
    fn rewritten_payload_keeps_metadata() {
        let event = decode(&wire("2 7 3 4\nHTTP/1.1 200 OK\r\n\r\n")).unwrap();
        let rewritten = event.with_payload(&b"HTTP/1.1 404 Not Found\r\n\r\n"[..]);
        let again = decode(&encode(&rewritten)).unwrap();
        assert_eq!(again.meta, event.meta);
        assert_eq!(again.payload, b"HTTP/1.1 404 Not Found\r\n\r\n");
    }
}
