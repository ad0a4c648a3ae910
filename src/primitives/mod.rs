// ============================================================================
// spark-bindings - Primitives Module
// Property paths and bindings
// ============================================================================

pub mod binding;
pub mod path;

// Re-export for convenience
pub use binding::{bind, Binding, BindingInner, ReactionFn};
pub use path::{resolve_read, resolve_write, PropertyPath};
