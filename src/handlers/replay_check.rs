//! Original-vs-replay status comparison.
//!
//! ```text
//! request#id  (retained)  → once response#id, bound: method + path
//! response#id (one-shot)  → once replay#id,   bound: request + original status
//! replay#id   (one-shot)  → compare statuses, count, log mismatches
//! ```
//!
//! Chains whose response or replay never arrives are left to the sweeper.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::dispatch::{BoundArgs, HandlerContext, Registry};
use crate::frame::{Channel, Event};
use crate::http;
use crate::observability::metrics;

/// Outcome counters for completed comparisons.
#[derive(Debug, Default)]
pub struct ReplayStats {
    matched: AtomicU64,
    mismatched: AtomicU64,
}

impl ReplayStats {
    pub fn matched(&self) -> u64 {
        self.matched.load(Ordering::Relaxed)
    }

    pub fn mismatched(&self) -> u64 {
        self.mismatched.load(Ordering::Relaxed)
    }
}

struct CapturedRequest {
    method: String,
    path: String,
    stats: Arc<ReplayStats>,
}

/// Start comparing replayed statuses against the originals.
pub fn install(registry: &Registry) -> Arc<ReplayStats> {
    let stats = Arc::new(ReplayStats::default());
    registry.register(Channel::Request, "", BoundArgs::new(stats.clone()), on_request);
    tracing::info!("Replay status check enabled");
    stats
}

fn on_request(ctx: HandlerContext<'_>) -> Option<Event> {
    let stats = ctx.args.get::<Arc<ReplayStats>>()?;
    let request = CapturedRequest {
        method: http::method(&ctx.event.payload).unwrap_or_default(),
        path: http::path(&ctx.event.payload).unwrap_or_default(),
        stats: stats.clone(),
    };
    ctx.registry.once(
        Channel::Response,
        &ctx.event.id,
        BoundArgs::new(Arc::new(request)),
        on_original_response,
    );
    None
}

fn on_original_response(ctx: HandlerContext<'_>) -> Option<Event> {
    let request = ctx.args.get::<Arc<CapturedRequest>>()?;
    let status = match http::status(&ctx.event.payload) {
        Ok(status) => status,
        Err(e) => {
            tracing::debug!(id = %ctx.event.id, error = %e, "Original response has no status");
            return None;
        }
    };
    ctx.registry.once(
        Channel::Replay,
        &ctx.event.id,
        BoundArgs::new((request.clone(), status)),
        on_replayed_response,
    );
    None
}

fn on_replayed_response(ctx: HandlerContext<'_>) -> Option<Event> {
    let (request, original) = ctx.args.get::<(Arc<CapturedRequest>, String)>()?;
    let replayed = http::status(&ctx.event.payload).unwrap_or_default();

    if replayed == *original {
        request.stats.matched.fetch_add(1, Ordering::Relaxed);
        metrics::record_replay_check("match");
        tracing::debug!(id = %ctx.event.id, status = %replayed, "Replay status matches");
    } else {
        request.stats.mismatched.fetch_add(1, Ordering::Relaxed);
        metrics::record_replay_check("mismatch");
        tracing::warn!(
            id = %ctx.event.id,
            method = %request.method,
            path = %request.path,
            original = %original,
            replayed = %replayed,
            "Replayed response status differs"
        );
    }
    None
}
