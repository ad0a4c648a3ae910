// ============================================================================
// spark-bindings - Subscription Registry
// Per-property list of bindings that read the property
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use crate::core::context::runtime_config;
use crate::core::error::Error;
use crate::core::types::{AnyBinding, BindingId};
use crate::reactivity::tracking::{defer_error, settle_write, NotifyDepthGuard};

/// Bindings that depend on one reactive property.
///
/// Recording appends without deduplication, so a binding evaluated three
/// times appears three times. Live bindings are never removed; entries whose
/// binding was dropped are pruned when the registry notifies.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscribers: RefCell<Vec<Weak<dyn AnyBinding>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a (non-owning) reference to `binding`.
    pub fn record(&self, binding: Weak<dyn AnyBinding>) {
        if let Some(live) = binding.upgrade() {
            tracing::trace!(binding = %live.id(), path = live.path(), "dependency recorded");
        }
        self.subscribers.borrow_mut().push(binding);
    }

    /// Number of recordings, duplicates included
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.borrow().is_empty()
    }

    /// Ids of the live recorded bindings, in recording order (duplicates kept)
    pub fn subscriber_ids(&self) -> Vec<BindingId> {
        self.subscribers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|b| b.id())
            .collect()
    }

    /// Remove entries whose binding was dropped
    pub fn cleanup_dead(&self) {
        self.subscribers.borrow_mut().retain(|w| w.strong_count() > 0);
    }

    /// Re-evaluate every recorded binding, in recording order.
    ///
    /// Reactions run synchronously and may write other properties, nesting
    /// further passes; the nesting is bounded by `max_notify_depth`. A failing
    /// binding does not stop the pass: the rest are still re-evaluated and the
    /// first error is returned. Errors raised by writes inside reactions are
    /// returned here too, once the outermost pass ends.
    pub fn notify_all(&self) -> Result<(), Error> {
        let result = {
            let _depth = NotifyDepthGuard::enter()?;
            self.notify_pass()
        };
        settle_write(result)
    }

    /// One pass over the subscribers. The caller holds a `NotifyDepthGuard`.
    pub(crate) fn notify_pass(&self) -> Result<(), Error> {
        self.cleanup_dead();

        // Collect first: reevaluate() records into this same list.
        let dedupe = runtime_config().dedupe_notifications;
        let bindings: Vec<Rc<dyn AnyBinding>> = {
            let mut seen = HashSet::new();
            self.subscribers
                .borrow()
                .iter()
                .filter_map(Weak::upgrade)
                .filter(|b| !dedupe || seen.insert(b.id()))
                .collect()
        };

        let mut first_error = None;
        for binding in bindings {
            if let Err(err) = binding.reevaluate() {
                tracing::debug!(
                    binding = %binding.id(),
                    path = binding.path(),
                    error = err.as_label(),
                    "binding failed to re-evaluate"
                );
                defer_error(&err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RuntimeConfig;
    use crate::core::context::{configure, with_context};
    use std::cell::Cell;

    /// Counts reevaluate() calls, optionally failing
    struct CountingBinding {
        id: u64,
        flags: Cell<u32>,
        calls: Cell<usize>,
        fail: bool,
    }

    impl CountingBinding {
        fn new(id: u64, fail: bool) -> Rc<Self> {
            Rc::new(Self {
                id,
                flags: Cell::new(0),
                calls: Cell::new(0),
                fail,
            })
        }
    }

    impl AnyBinding for CountingBinding {
        fn id(&self) -> BindingId {
            BindingId(self.id)
        }

        fn path(&self) -> &str {
            "count"
        }

        fn flags(&self) -> u32 {
            self.flags.get()
        }

        fn set_flags(&self, flags: u32) {
            self.flags.set(flags);
        }

        fn reevaluate(&self) -> Result<bool, Error> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(Error::ReadOnly { key: "count".into() });
            }
            Ok(true)
        }
    }

    fn weak(b: &Rc<CountingBinding>) -> Weak<dyn AnyBinding> {
        Rc::downgrade(&(b.clone() as Rc<dyn AnyBinding>))
    }

    #[test]
    fn notifies_in_recording_order_and_dedupes() {
        let a = CountingBinding::new(1, false);
        let b = CountingBinding::new(2, false);
        let registry = SubscriptionRegistry::new();
        registry.record(weak(&a));
        registry.record(weak(&b));
        registry.record(weak(&a));

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.subscriber_ids(),
            vec![BindingId(1), BindingId(2), BindingId(1)]
        );

        registry.notify_all().unwrap();
        assert_eq!(a.calls.get(), 1);
        assert_eq!(b.calls.get(), 1);
    }

    #[test]
    fn without_dedupe_every_recording_is_notified() {
        let previous = configure(RuntimeConfig {
            dedupe_notifications: false,
            ..RuntimeConfig::default()
        });

        let a = CountingBinding::new(1, false);
        let registry = SubscriptionRegistry::new();
        registry.record(weak(&a));
        registry.record(weak(&a));
        registry.notify_all().unwrap();
        assert_eq!(a.calls.get(), 2);

        configure(previous);
    }

    #[test]
    fn dropped_bindings_are_pruned() {
        let registry = SubscriptionRegistry::new();
        let kept = CountingBinding::new(1, false);
        {
            let gone = CountingBinding::new(2, false);
            registry.record(weak(&gone));
        }
        registry.record(weak(&kept));
        assert_eq!(registry.len(), 2);

        registry.notify_all().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(kept.calls.get(), 1);
    }

    #[test]
    fn failure_does_not_starve_later_bindings() {
        let failing = CountingBinding::new(1, true);
        let healthy = CountingBinding::new(2, false);
        let registry = SubscriptionRegistry::new();
        registry.record(weak(&failing));
        registry.record(weak(&healthy));

        let result = registry.notify_all();
        assert_eq!(result, Err(Error::ReadOnly { key: "count".into() }));
        assert_eq!(healthy.calls.get(), 1);
        // nothing left over for the next writer
        assert_eq!(with_context(|ctx| ctx.take_error()), None);
    }
}
