// ============================================================================
// spark-bindings - Type Definitions
// Type-erased binding interface shared by registries and the active slot
// ============================================================================

use std::fmt;

use super::constants::*;
use super::error::Error;

// =============================================================================
// BINDING ID
// =============================================================================

/// Process-unique (per thread) identifier of a binding, used in logs and for
/// collapsing duplicate recordings during a notification pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// TYPE-ERASED BINDING
// =============================================================================
//
// Registries and the active binding slot never need to know what a binding
// reacts with. They store Weak<dyn AnyBinding> and only ever ask it to
// re-evaluate. The concrete BindingInner owns the path, the cached value
// and the reaction callback.
// =============================================================================

/// Type-erased binding interface for dependency recording and notification.
pub trait AnyBinding {
    /// Identifier assigned at construction
    fn id(&self) -> BindingId;

    /// Dotted path this binding reads
    fn path(&self) -> &str;

    /// Get the flags bitmask
    fn flags(&self) -> u32;

    /// Set the flags bitmask
    fn set_flags(&self, flags: u32);

    /// Re-read the path and run the reaction if the value changed.
    /// Returns true if the reaction ran.
    fn reevaluate(&self) -> Result<bool, Error>;

    /// Check if construction finished
    fn is_active(&self) -> bool {
        self.flags() & ACTIVE != 0
    }

    /// Check if the binding's reaction is running
    fn is_reacting(&self) -> bool {
        self.flags() & REACTING != 0
    }

    /// Move to a lifecycle state, keeping the transient bits
    fn set_lifecycle(&self, state: u32) {
        let flags = (self.flags() & !LIFECYCLE_MASK) | state;
        self.set_flags(flags);
    }
}
