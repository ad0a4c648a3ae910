// ============================================================================
// spark-bindings - A Reactive Binding Runtime for Rust
// ============================================================================
//
// Dependency tracking over a plain data graph: install reactivity on a
// record, bind dotted paths to reactions, and writes notify exactly the
// bindings that read what changed.
// ============================================================================

pub mod core;
pub mod director;
pub mod graph;
mod macros;
pub mod primitives;
pub mod reactivity;

// Re-export core items at crate root for ergonomic access
pub use crate::core::constants;
pub use crate::core::context::{
    configure, is_tracking, notify_depth, runtime_config, with_context, ReactiveContext,
};
pub use crate::core::{AnyBinding, BindingId, Error, PathError, RuntimeConfig};

// Re-export the data graph
pub use graph::{
    install, install_value, ComputedFn, Property, Record, Sequence, SubscriptionRegistry, Value,
    WeakRecord,
};

// Re-export primitives
pub use primitives::{bind, resolve_read, resolve_write, Binding, PropertyPath, ReactionFn};

// Re-export reactivity functions
pub use reactivity::{deep_equals, strict_equals, track_read, ActiveBindingGuard};

// Re-export the markup layer's entry points
pub use director::{Director, View, ViewModel};

// =============================================================================
// TESTS
// =============================================================================
