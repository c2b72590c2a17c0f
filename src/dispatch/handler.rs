//! Handler registrations and the context passed to callbacks.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tokio::time::Instant;

use crate::dispatch::registry::Registry;
use crate::frame::Event;

/// Opaque data bound to a registration and handed back on every call.
///
/// Several values are bound as a tuple or a struct.
#[derive(Clone, Default)]
pub struct BoundArgs(Option<Arc<dyn Any + Send + Sync>>);

impl BoundArgs {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Borrow the bound value as `T`, if that is what was bound.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|value| value.downcast_ref::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for BoundArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("BoundArgs(..)"),
            None => f.write_str("BoundArgs(none)"),
        }
    }
}

/// What a callback sees when it runs.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    /// Registry the handler may subscribe follow-up handlers on.
    pub registry: &'a Registry,
    /// Current candidate event (the latest replacement, if any).
    pub event: &'a Event,
    /// Arguments bound at registration time.
    pub args: &'a BoundArgs,
}

/// Callback signature: return `Some` to replace the candidate event.
pub type Callback = Arc<dyn Fn(HandlerContext<'_>) -> Option<Event> + Send + Sync>;

/// A stored subscription. Immutable once registered.
pub struct Registration {
    pub(crate) created_at: Instant,
    callback: Callback,
    args: BoundArgs,
}

impl Registration {
    pub(crate) fn new(callback: Callback, args: BoundArgs) -> Self {
        Self {
            created_at: Instant::now(),
            callback,
            args,
        }
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn args(&self) -> &BoundArgs {
        &self.args
    }

    pub(crate) fn invoke(&self, registry: &Registry, event: &Event) -> Option<Event> {
        (self.callback)(HandlerContext {
            registry,
            event,
            args: &self.args,
        })
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("created_at", &self.created_at)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
