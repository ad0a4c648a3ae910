// ============================================================================
// spark-bindings - Reactivity Module
// Read tracking, the active binding guard and value comparison
// ============================================================================

pub mod equality;
pub mod tracking;

pub use equality::{deep_equals, strict_equals};
pub use tracking::{track_read, ActiveBindingGuard};
