// ============================================================================
// spark-bindings - Dependency Tracking
// Scoped occupancy of the active binding slot, read tracking, notify depth
// ============================================================================
//
// Attribution of reads relies on one piece of thread-local state: the active
// binding slot. A stale occupant would subscribe unrelated reads to the wrong
// binding, so the slot is only ever filled through ActiveBindingGuard, whose
// Drop releases it on every exit path (including `?` and panics).
// ============================================================================

use std::rc::Weak;

use crate::core::context::with_context;
use crate::core::error::Error;
use crate::core::types::AnyBinding;
use crate::graph::registry::SubscriptionRegistry;

// =============================================================================
// ACTIVE BINDING GUARD
// =============================================================================

/// RAII occupancy of the active binding slot.
///
/// Restores the previous occupant on drop. At the top level the previous
/// occupant is `None`, so dropping the guard clears the slot.
#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct ActiveBindingGuard {
    previous: Option<Weak<dyn AnyBinding>>,
}

impl ActiveBindingGuard {
    /// Publish `binding` as the one currently reading.
    pub fn enter(binding: Weak<dyn AnyBinding>) -> Self {
        let previous = with_context(|ctx| ctx.set_active_binding(Some(binding)));
        Self { previous }
    }
}

impl Drop for ActiveBindingGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        with_context(|ctx| {
            ctx.set_active_binding(previous);
        });
    }
}

// =============================================================================
// TRACK READ
// =============================================================================

/// Record the active binding (if any) into `registry`.
///
/// Called by reactive property getters. Outside a binding's evaluation this
/// is a no-op.
pub fn track_read(registry: &SubscriptionRegistry) {
    let Some(active) = with_context(|ctx| ctx.active_binding()) else {
        return;
    };
    registry.record(active);
}

// =============================================================================
// NOTIFY DEPTH GUARD
// =============================================================================

/// RAII counter of nested notification passes.
pub(crate) struct NotifyDepthGuard {
    _private: (),
}

impl NotifyDepthGuard {
    /// Enter one more pass, failing if the configured limit is exceeded.
    pub(crate) fn enter() -> Result<Self, Error> {
        with_context(|ctx| {
            let depth = ctx.enter_notify();
            let config = ctx.config.borrow();
            if config.allows_depth(depth) {
                return Ok(Self { _private: () });
            }
            let outer = ctx.exit_notify();
            let limit = config.max_notify_depth.unwrap_or(depth);
            tracing::warn!(depth, limit, "notification depth exceeded; aborting write");
            let error = Error::NotifyDepthExceeded { limit };
            if outer > 0 {
                // Raised under a reaction, which cannot return it.
                ctx.record_error(error.clone());
            }
            Err(error)
        })
    }
}

impl Drop for NotifyDepthGuard {
    fn drop(&mut self) {
        with_context(|ctx| {
            ctx.exit_notify();
        });
    }
}

// =============================================================================
// DEFERRED ERRORS
// =============================================================================

/// Record `error` for the outermost writer if a pass is still running.
pub(crate) fn defer_error(error: &Error) {
    with_context(|ctx| {
        if ctx.notify_depth() > 0 {
            ctx.record_error(error.clone());
        }
    });
}

/// Finish a write: once no pass is running, an error recorded by a nested
/// pass is returned here unless `result` already carries one.
pub(crate) fn settle_write(result: Result<(), Error>) -> Result<(), Error> {
    with_context(|ctx| {
        if ctx.notify_depth() > 0 {
            return result;
        }
        match ctx.take_error() {
            Some(pending) => result.and(Err(pending)),
            None => result,
        }
    })
}
