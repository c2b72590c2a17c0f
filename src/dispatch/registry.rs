//! Subscription registry.
//!
//! # Responsibilities
//! - Store retained handlers per channel, for the life of the process
//! - Store one-shot handlers per (channel, correlation id)
//! - Hand out retained handlers for shared reads
//! - Drain one-shot buckets atomically, sweep stale ones
//!
//! # Design Decisions
//! - A single `RwLock` guards both maps
//! - Callers receive `Arc` clones; no guard outlives a registry call
//! - Buckets are append-only and keep registration order

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::dispatch::handler::{BoundArgs, Callback, HandlerContext, Registration};
use crate::frame::{Channel, Event};

type Bucket = Vec<Arc<Registration>>;

#[derive(Default)]
struct Queues {
    retained: HashMap<Channel, Bucket>,
    temporary: HashMap<(Channel, String), Bucket>,
}

/// Point-in-time registry sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Channels with at least one retained handler.
    pub retained_channels: usize,
    /// Retained handlers across all channels.
    pub retained: usize,
    /// Live `<prefix>#<id>` buckets.
    pub temporary_buckets: usize,
    /// One-shot handlers across all buckets.
    pub temporary: usize,
}

/// Thread-safe store of handler registrations.
#[derive(Default)]
pub struct Registry {
    queues: RwLock<Queues>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Queues> {
        self.queues.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Queues> {
        self.queues.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `callback` on `channel`.
    ///
    /// An empty `correlation_key` makes a retained handler; any other key
    /// makes a one-shot handler for `<channel>#<key>`.
    pub fn register<F>(&self, channel: Channel, correlation_key: &str, args: BoundArgs, callback: F)
    where
        F: Fn(HandlerContext<'_>) -> Option<Event> + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);
        let registration = Arc::new(Registration::new(callback, args));

        let mut queues = self.write();
        if correlation_key.is_empty() {
            queues.retained.entry(channel).or_default().push(registration);
        } else {
            queues
                .temporary
                .entry((channel, correlation_key.to_string()))
                .or_default()
                .push(registration);
        }
        drop(queues);

        tracing::trace!(
            channel = %channel,
            correlation_key = correlation_key,
            "Handler registered"
        );
    }

    /// Retained handler without bound arguments.
    pub fn on<F>(&self, channel: Channel, callback: F)
    where
        F: Fn(HandlerContext<'_>) -> Option<Event> + Send + Sync + 'static,
    {
        self.register(channel, "", BoundArgs::none(), callback);
    }

    /// One-shot handler for `<channel>#<correlation_key>`.
    ///
    /// An empty key would make the handler retained, so it is ignored.
    pub fn once<F>(&self, channel: Channel, correlation_key: &str, args: BoundArgs, callback: F)
    where
        F: Fn(HandlerContext<'_>) -> Option<Event> + Send + Sync + 'static,
    {
        if correlation_key.is_empty() {
            tracing::warn!(channel = %channel, "Ignoring one-shot handler with empty correlation key");
            return;
        }
        self.register(channel, correlation_key, args, callback);
    }

    /// Snapshot of the retained handlers on `channel`, in order.
    pub fn lookup(&self, channel: Channel) -> Vec<Arc<Registration>> {
        self.read().retained.get(&channel).cloned().unwrap_or_default()
    }

    /// Remove and return every one-shot handler for `<channel>#<key>`.
    pub fn drain(&self, channel: Channel, correlation_key: &str) -> Vec<Arc<Registration>> {
        self.write()
            .temporary
            .remove(&(channel, correlation_key.to_string()))
            .unwrap_or_default()
    }

    /// Drop one-shot handlers older than `ttl`. Returns how many went.
    pub fn sweep(&self, ttl: Duration) -> usize {
        self.sweep_at(Instant::now(), ttl)
    }

    /// [`sweep`](Self::sweep) against an explicit clock reading.
    pub fn sweep_at(&self, now: Instant, ttl: Duration) -> usize {
        let mut removed = 0;
        self.write().temporary.retain(|_, bucket| {
            let before = bucket.len();
            bucket.retain(|registration| {
                now.saturating_duration_since(registration.created_at) <= ttl
            });
            removed += before - bucket.len();
            !bucket.is_empty()
        });
        removed
    }

    pub fn stats(&self) -> RegistryStats {
        let queues = self.read();
        RegistryStats {
            retained_channels: queues.retained.len(),
            retained: queues.retained.values().map(Vec::len).sum(),
            temporary_buckets: queues.temporary.len(),
            temporary: queues.temporary.values().map(Vec::len).sum(),
        }
    }
}
