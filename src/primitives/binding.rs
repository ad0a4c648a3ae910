// ============================================================================
// spark-bindings - Bindings
// "This consumer depends on this path": evaluate, compare, react
// ============================================================================
//
// A binding subscribes itself by reading. evaluate() publishes the binding in
// the active slot, walks the path (each getter records it), and releases the
// slot. Every evaluation walks again, so every touched registry gains one
// more recording each time; nothing is ever unsubscribed.
//
// Registries hold Weak references. Whoever creates a Binding owns it; once
// every handle is dropped the binding silently stops reacting.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::constants::*;
use crate::core::context::{runtime_config, with_context};
use crate::core::error::{Error, PathError};
use crate::core::types::{AnyBinding, BindingId};
use crate::graph::value::{Record, Value};
use crate::primitives::path::PropertyPath;
use crate::reactivity::equality::strict_equals;
use crate::reactivity::tracking::ActiveBindingGuard;

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// Reaction callback, invoked with each new value
pub type ReactionFn = Box<dyn FnMut(&Value)>;

// =============================================================================
// BINDING INNER
// =============================================================================

/// The binding state shared by every registry that recorded it.
pub struct BindingInner {
    id: BindingId,

    /// Flags bitmask (lifecycle + transient state)
    flags: Cell<u32>,

    root: Record,
    path: PropertyPath,

    /// Value seen by the last evaluation that passed the change gate
    last_value: RefCell<Value>,

    /// Bumped on every accepted change; detects changes made while reacting
    version: Cell<u64>,

    /// Taken out while the reaction runs
    reaction: RefCell<Option<ReactionFn>>,

    self_weak: Weak<BindingInner>,
}

impl BindingInner {
    fn as_weak_binding(&self) -> Weak<dyn AnyBinding> {
        self.self_weak.clone()
    }

    /// Read the path with this binding in the active slot.
    ///
    /// Does not touch the cached value or run the reaction.
    pub fn evaluate(&self) -> Result<Value, PathError> {
        let _active = ActiveBindingGuard::enter(self.as_weak_binding());
        self.path.read(&self.root)
    }

    /// Last value that passed the change gate
    pub fn value(&self) -> Value {
        self.last_value.borrow().clone()
    }

    pub fn property_path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn root(&self) -> &Record {
        &self.root
    }

    /// Run the reaction with `value`, then with any newer value accepted while
    /// it ran (a reaction that writes its own dependency).
    fn react(&self, value: Value) -> Result<(), Error> {
        if self.is_reacting() {
            // Already reacting further up the stack; that call delivers the
            // newer value when the reaction returns.
            tracing::trace!(binding = %self.id, "reaction already running; deferring");
            return Ok(());
        }
        let Some(mut reaction) = self.reaction.borrow_mut().take() else {
            return Ok(());
        };

        self.set_flags(self.flags() | REACTING);
        let limit = runtime_config().max_notify_depth;
        let mut delivered = value;
        let mut rounds = 0usize;
        let result = loop {
            let version = self.version.get();
            reaction(&delivered);
            if self.version.get() == version {
                break Ok(());
            }
            rounds += 1;
            if let Some(limit) = limit.filter(|limit| rounds > *limit) {
                tracing::warn!(
                    binding = %self.id,
                    path = %self.path,
                    limit,
                    "reaction keeps changing its own value"
                );
                break Err(Error::NotifyDepthExceeded { limit });
            }
            delivered = self.value();
        };
        self.set_flags(self.flags() & !REACTING);
        *self.reaction.borrow_mut() = Some(reaction);
        result
    }
}

impl AnyBinding for BindingInner {
    fn id(&self) -> BindingId {
        self.id
    }

    fn path(&self) -> &str {
        self.path.as_str()
    }

    fn flags(&self) -> u32 {
        self.flags.get()
    }

    fn set_flags(&self, flags: u32) {
        self.flags.set(flags);
    }

    fn reevaluate(&self) -> Result<bool, Error> {
        let value = self.evaluate()?;
        if strict_equals(&value, &self.last_value.borrow()) {
            return Ok(false);
        }
        tracing::trace!(binding = %self.id, path = %self.path, "binding value changed");
        // Cache before reacting, so a re-entrant read during the reaction
        // compares against this value; the reaction sees changes it causes
        // once it returns.
        *self.last_value.borrow_mut() = value.clone();
        self.version.set(self.version.get() + 1);
        self.react(value)?;
        Ok(true)
    }
}

// =============================================================================
// BINDING - PUBLIC HANDLE
// =============================================================================

/// A live association between a path in a reactive graph and a reaction.
///
/// Construction reads the path once without calling the reaction. After
/// that, every write that changes a property along the path re-reads it and,
/// if the result is strictly different from the cached value, calls the
/// reaction with the new value.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use spark_bindings::{install, record, resolve_write, Binding, Value};
///
/// let root = record! { "user" => record! { "name" => "Ann" } };
/// install(&root);
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = seen.clone();
/// let binding = Binding::new(&root, "user.name", move |v| {
///     log.borrow_mut().push(v.clone());
/// })
/// .unwrap();
/// assert!(seen.borrow().is_empty());
///
/// resolve_write(&root, "user.name", "Bea").unwrap();
/// assert_eq!(*seen.borrow(), vec![Value::from("Bea")]);
/// assert_eq!(binding.value(), Value::from("Bea"));
/// ```
#[derive(Clone)]
pub struct Binding {
    inner: Rc<BindingInner>,
}

impl Binding {
    /// Parse `path` and bind it. Fails if the path is invalid or cannot be
    /// read right now.
    pub fn new(
        root: &Record,
        path: &str,
        reaction: impl FnMut(&Value) + 'static,
    ) -> Result<Self, Error> {
        Self::with_path(root, PropertyPath::parse(path)?, reaction)
    }

    /// Bind an already parsed path.
    pub fn with_path(
        root: &Record,
        path: PropertyPath,
        reaction: impl FnMut(&Value) + 'static,
    ) -> Result<Self, Error> {
        let id = with_context(|ctx| ctx.allocate_binding_id());
        let inner = Rc::new_cyclic(|self_weak| BindingInner {
            id,
            flags: Cell::new(CONSTRUCTING),
            root: root.clone(),
            path,
            last_value: RefCell::new(Value::Null),
            version: Cell::new(0),
            reaction: RefCell::new(Some(Box::new(reaction))),
            self_weak: self_weak.clone(),
        });

        // First read is silent: seed the cache, no reaction.
        let initial = inner.evaluate()?;
        *inner.last_value.borrow_mut() = initial;
        inner.set_lifecycle(ACTIVE);

        tracing::debug!(binding = %id, path = %inner.path, "binding created");
        Ok(Self { inner })
    }

    pub fn id(&self) -> BindingId {
        self.inner.id
    }

    pub fn path(&self) -> &PropertyPath {
        &self.inner.path
    }

    /// Cached value from the last accepted evaluation
    pub fn value(&self) -> Value {
        self.inner.value()
    }

    /// Re-read the path (re-subscribing) without running the reaction.
    pub fn evaluate(&self) -> Result<Value, PathError> {
        self.inner.evaluate()
    }

    /// Re-read the path and run the reaction if the value changed.
    pub fn reevaluate(&self) -> Result<bool, Error> {
        self.inner.reevaluate()
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    pub fn inner(&self) -> &Rc<BindingInner> {
        &self.inner
    }

    /// Type-erased handle (as stored by registries, but strong)
    pub fn as_any_binding(&self) -> Rc<dyn AnyBinding> {
        self.inner.clone()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.inner.id)
            .field("path", &self.inner.path.as_str())
            .field("value", &self.inner.value())
            .finish()
    }
}

/// Create a binding on `path` in `root`.
pub fn bind(
    root: &Record,
    path: &str,
    reaction: impl FnMut(&Value) + 'static,
) -> Result<Binding, Error> {
    Binding::new(root, path, reaction)
}
