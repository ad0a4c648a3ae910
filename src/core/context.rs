// ============================================================================
// spark-bindings - Reactive Context
// Thread-local state: the active binding slot, notify depth and config
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Weak;

use super::config::RuntimeConfig;
use super::error::Error;
use super::types::{AnyBinding, BindingId};

// =============================================================================
// REACTIVE CONTEXT
// =============================================================================

/// Thread-local reactive context holding all global state for the runtime.
///
/// The active binding slot lives here. Reads consult it to find out which
/// binding is evaluating; only `ActiveBindingGuard` should occupy it.
pub struct ReactiveContext {
    /// Binding presently evaluating its path (at most one)
    pub active_binding: RefCell<Option<Weak<dyn AnyBinding>>>,

    /// Current nesting of notification passes
    pub notify_depth: Cell<usize>,

    /// First error raised inside a nested pass, owed to the outermost writer
    pub pending_error: RefCell<Option<Error>>,

    /// Next binding id to hand out
    pub next_binding_id: Cell<u64>,

    /// Runtime configuration
    pub config: RefCell<RuntimeConfig>,
}

impl ReactiveContext {
    /// Create a new reactive context with default values
    pub fn new() -> Self {
        Self {
            active_binding: RefCell::new(None),
            notify_depth: Cell::new(0),
            pending_error: RefCell::new(None),
            next_binding_id: Cell::new(1),
            config: RefCell::new(RuntimeConfig::default()),
        }
    }

    // =========================================================================
    // ACTIVE BINDING SLOT
    // =========================================================================

    /// Set the active binding, returning the previous one
    pub fn set_active_binding(
        &self,
        binding: Option<Weak<dyn AnyBinding>>,
    ) -> Option<Weak<dyn AnyBinding>> {
        self.active_binding.replace(binding)
    }

    /// Get the active binding
    pub fn active_binding(&self) -> Option<Weak<dyn AnyBinding>> {
        self.active_binding.borrow().clone()
    }

    /// Check if a binding occupies the slot
    pub fn has_active_binding(&self) -> bool {
        self.active_binding.borrow().is_some()
    }

    // =========================================================================
    // NOTIFY DEPTH
    // =========================================================================

    /// Increment notify depth, returns new depth
    pub fn enter_notify(&self) -> usize {
        let depth = self.notify_depth.get() + 1;
        self.notify_depth.set(depth);
        depth
    }

    /// Decrement notify depth, returns new depth
    pub fn exit_notify(&self) -> usize {
        let depth = self.notify_depth.get().saturating_sub(1);
        self.notify_depth.set(depth);
        depth
    }

    /// Get current notify depth
    pub fn notify_depth(&self) -> usize {
        self.notify_depth.get()
    }

    /// Keep `error` for the outermost writer. Only the first one is kept.
    pub fn record_error(&self, error: Error) {
        self.pending_error.borrow_mut().get_or_insert(error);
    }

    /// Take the error owed to the outermost writer, if any
    pub fn take_error(&self) -> Option<Error> {
        self.pending_error.borrow_mut().take()
    }

    // =========================================================================
    // IDS AND CONFIG
    // =========================================================================

    /// Hand out the next binding id
    pub fn allocate_binding_id(&self) -> BindingId {
        let id = self.next_binding_id.get();
        self.next_binding_id.set(id + 1);
        BindingId(id)
    }

    /// Replace the config, returning the previous one
    pub fn replace_config(&self, config: RuntimeConfig) -> RuntimeConfig {
        self.config.replace(config)
    }

    /// Snapshot of the config
    pub fn config(&self) -> RuntimeConfig {
        self.config.borrow().clone()
    }
}

impl Default for ReactiveContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// THREAD-LOCAL ACCESS
// =============================================================================

thread_local! {
    /// The thread-local reactive context
    static CONTEXT: ReactiveContext = ReactiveContext::new();
}

/// Access the thread-local reactive context.
pub fn with_context<R>(f: impl FnOnce(&ReactiveContext) -> R) -> R {
    CONTEXT.with(f)
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Check if a binding is currently evaluating (reads will subscribe it)
pub fn is_tracking() -> bool {
    with_context(|ctx| ctx.has_active_binding())
}

/// Current nesting of notification passes
pub fn notify_depth() -> usize {
    with_context(|ctx| ctx.notify_depth())
}

/// Install a config for the current thread, returning the previous one
pub fn configure(config: RuntimeConfig) -> RuntimeConfig {
    with_context(|ctx| ctx.replace_config(config))
}

/// Config of the current thread
pub fn runtime_config() -> RuntimeConfig {
    with_context(|ctx| ctx.config())
}
