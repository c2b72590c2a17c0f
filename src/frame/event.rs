//! Decoded capture events and the channels they are dispatched on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dispatch channel an event or subscription belongs to.
///
/// `Message` is the universal class: handlers registered on it see every
/// event, but no wire kind ever resolves to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Message,
    Request,
    Response,
    Replay,
}

impl Channel {
    /// Resolve a wire kind token to its channel prefix.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "1" => Some(Channel::Request),
            "2" => Some(Channel::Response),
            "3" => Some(Channel::Replay),
            _ => None,
        }
    }

    /// Wire kind token for this channel (`None` for `Message`).
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Channel::Message => None,
            Channel::Request => Some("1"),
            Channel::Response => Some("2"),
            Channel::Replay => Some("3"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Message => "message",
            Channel::Request => "request",
            Channel::Response => "response",
            Channel::Replay => "replay",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown channel name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Channel::Message),
            "request" => Ok(Channel::Request),
            "response" => Ok(Channel::Response),
            "replay" => Ok(Channel::Replay),
            other => Err(UnknownChannel(other.to_string())),
        }
    }
}

/// A single captured or replayed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Correlation id linking a request to its responses.
    pub id: String,
    /// Wire kind token (`1`, `2`, `3`, ...).
    pub kind: String,
    /// Space-separated metadata tokens: kind, id, timestamp, latency.
    pub meta: Vec<Vec<u8>>,
    /// Undecoded metadata line, reused verbatim on encode.
    pub raw_meta: Vec<u8>,
    /// Raw HTTP bytes.
    pub payload: Vec<u8>,
}

impl Event {
    /// Channel this event dispatches on, if its kind is known.
    pub fn channel(&self) -> Option<Channel> {
        Channel::from_kind(&self.kind)
    }

    pub fn timestamp(&self) -> Option<&[u8]> {
        self.meta.get(2).map(Vec::as_slice)
    }

    pub fn latency(&self) -> Option<&[u8]> {
        self.meta.get(3).map(Vec::as_slice)
    }

    /// Copy of this event carrying a different HTTP payload.
    pub fn with_payload(&self, payload: impl Into<Vec<u8>>) -> Event {
        Event {
            id: self.id.clone(),
            kind: self.kind.clone(),
            meta: self.meta.clone(),
            raw_meta: self.raw_meta.clone(),
            payload: payload.into(),
        }
    }
}
