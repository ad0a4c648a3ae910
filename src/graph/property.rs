// ============================================================================
// spark-bindings - Property Cells
// The intercepted accessor pair behind every record key
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::observer::install_value;
use super::registry::SubscriptionRegistry;
use super::value::Value;
use crate::core::error::Error;
use crate::reactivity::equality::strict_equals;
use crate::reactivity::tracking::{settle_write, track_read, NotifyDepthGuard};

/// Getter of a computed property
pub type ComputedFn = Rc<dyn Fn() -> Value>;

enum Slot {
    Data(Value),
    Computed(ComputedFn),
}

/// One record key: a value cell plus, once reactive, its own registry.
///
/// The registry belongs to the property, not to the value it holds. Assigning
/// a new sub-record keeps the same registry; the new sub-record gets its own
/// nested registries when it is installed by the setter.
pub struct Property {
    key: Rc<str>,
    slot: RefCell<Slot>,
    registry: RefCell<Option<Rc<SubscriptionRegistry>>>,
}

impl Property {
    pub(crate) fn data(key: Rc<str>, value: Value) -> Self {
        Self {
            key,
            slot: RefCell::new(Slot::Data(value)),
            registry: RefCell::new(None),
        }
    }

    pub(crate) fn computed(key: Rc<str>, getter: ComputedFn) -> Self {
        Self {
            key,
            slot: RefCell::new(Slot::Computed(getter)),
            registry: RefCell::new(None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// True once `install` intercepted this property
    pub fn is_reactive(&self) -> bool {
        self.registry.borrow().is_some()
    }

    pub fn is_computed(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Computed(_))
    }

    /// The property's registry, if reactive
    pub fn registry(&self) -> Option<Rc<SubscriptionRegistry>> {
        self.registry.borrow().clone()
    }

    /// Attach a fresh registry. Returns false if one was already attached
    /// (the existing registry and its bindings are kept).
    pub(crate) fn make_reactive(&self) -> bool {
        let mut registry = self.registry.borrow_mut();
        if registry.is_some() {
            return false;
        }
        *registry = Some(Rc::new(SubscriptionRegistry::new()));
        true
    }

    /// Getter: records the active binding (if reactive) and returns the value.
    pub fn get(&self) -> Value {
        if let Some(registry) = self.registry() {
            track_read(&registry);
        }
        self.peek()
    }

    /// Read without recording anything. Computed getters still run (and
    /// their own reads are tracked if a binding is active).
    pub fn peek(&self) -> Value {
        let getter = match &*self.slot.borrow() {
            Slot::Data(value) => return value.clone(),
            Slot::Computed(getter) => getter.clone(),
        };
        getter()
    }

    /// Setter: on a strictly different value, installs reactivity on it,
    /// stores it and notifies every recorded binding. Equal writes are no-ops.
    ///
    /// Returns true if the value changed.
    pub fn set(&self, value: Value) -> Result<bool, Error> {
        match &*self.slot.borrow() {
            Slot::Computed(_) => {
                return Err(Error::ReadOnly {
                    key: self.key.to_string(),
                });
            }
            Slot::Data(current) if strict_equals(current, &value) => return Ok(false),
            Slot::Data(_) => {}
        }

        let Some(registry) = self.registry() else {
            *self.slot.borrow_mut() = Slot::Data(value);
            return Ok(true);
        };

        // Check the depth before storing: a rejected write leaves no trace.
        let result = {
            let _depth = NotifyDepthGuard::enter()?;
            install_value(&value);
            *self.slot.borrow_mut() = Slot::Data(value);
            tracing::trace!(key = %self.key, subscribers = registry.len(), "property changed");
            registry.notify_pass()
        };
        settle_write(result).map(|()| true)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("key", &self.key)
            .field("computed", &self.is_computed())
            .field("subscribers", &self.registry().map(|r| r.len()))
            .finish()
    }
}
