// ============================================================================
// spark-bindings - Core Module
// Fundamental types, errors, config and context for the runtime
// ============================================================================

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use config::RuntimeConfig;
pub use constants::*;
pub use context::{
    configure, is_tracking, notify_depth, runtime_config, with_context, ReactiveContext,
};
pub use error::{Error, PathError};
pub use types::{AnyBinding, BindingId};
