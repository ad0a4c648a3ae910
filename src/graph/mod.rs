// ============================================================================
// spark-bindings - Graph Module
// The data graph, its accessor cells, registries and the observer
// ============================================================================

pub mod observer;
pub mod property;
pub mod registry;
pub mod value;

pub use observer::{install, install_value};
pub use property::{ComputedFn, Property};
pub use registry::SubscriptionRegistry;
pub use value::{Record, Sequence, Value, WeakRecord};
