//! Event dispatch.
//!
//! Handlers run in three groups: retained `message` handlers, retained
//! handlers of the event's own channel, then the one-shot handlers drained
//! from `<channel>#<id>`. Each sees the current candidate event; the last
//! replacement wins and is encoded exactly once.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::dispatch::registry::Registry;
use crate::frame::{encode, Channel, Event};
use crate::observability::metrics;

/// Errors that prevent an event from being dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The kind token has no channel prefix.
    #[error("unknown event kind: {0:?}")]
    UnknownEventKind(String),
}

/// Runs registered handlers against decoded events.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Run the handler chain and return the event to emit.
    pub fn resolve(&self, event: Event) -> Result<Event, DispatchError> {
        let channel = event
            .channel()
            .ok_or_else(|| DispatchError::UnknownEventKind(event.kind.clone()))?;
        let start = Instant::now();
        let correlation_id = event.id.clone();

        let mut current = event;
        let mut invoked = 0usize;

        for group in [Channel::Message, channel] {
            for registration in self.registry.lookup(group) {
                if let Some(replacement) = registration.invoke(&self.registry, &current) {
                    current = replacement;
                }
                invoked += 1;
            }
        }

        let temporary = self.registry.drain(channel, &correlation_id);
        if !temporary.is_empty() {
            tracing::debug!(
                subscription = %format_args!("{}#{}", channel, correlation_id),
                handlers = temporary.len(),
                "Firing one-shot handlers"
            );
        }
        for registration in temporary {
            if let Some(replacement) = registration.invoke(&self.registry, &current) {
                current = replacement;
            }
            invoked += 1;
        }

        metrics::record_dispatch(channel, invoked, start);
        Ok(current)
    }

    /// Run the handler chain and encode the result as a wire line.
    pub fn dispatch(&self, event: Event) -> Result<String, DispatchError> {
        self.resolve(event).map(|event| encode(&event))
    }
}
