//! Config-driven payload rewrite rules.

use crate::config::{RuleAction, RuleConfig};
use crate::dispatch::{BoundArgs, HandlerContext, Registry};
use crate::frame::Event;
use crate::http::{self, PayloadError};

/// Apply one rule action to a payload.
pub fn apply(action: &RuleAction, payload: &[u8]) -> Result<Vec<u8>, PayloadError> {
    match action {
        RuleAction::SetHeader { name, value } => http::set_header(payload, name, value),
        RuleAction::SetPath { path } => http::set_path(payload, path),
        RuleAction::SetPathParam { name, value } => http::set_path_param(payload, name, value),
        RuleAction::SetStatus { status } => http::set_status(payload, status),
    }
}

fn rewrite(ctx: HandlerContext<'_>) -> Option<Event> {
    let action = ctx.args.get::<RuleAction>()?;
    match apply(action, &ctx.event.payload) {
        Ok(payload) => Some(ctx.event.with_payload(payload)),
        Err(e) => {
            tracing::debug!(id = %ctx.event.id, error = %e, "Rewrite rule skipped");
            None
        }
    }
}

/// Register every rule as a retained handler, in order.
pub fn install_rules(registry: &Registry, rules: &[RuleConfig]) {
    for rule in rules {
        registry.register(rule.channel, "", BoundArgs::new(rule.action.clone()), rewrite);
    }
    if !rules.is_empty() {
        tracing::info!(count = rules.len(), "Rewrite rules installed");
    }
}
