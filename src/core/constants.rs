// ============================================================================
// spark-bindings - Constants
// Binding state flags and runtime defaults
// ============================================================================

// =============================================================================
// BINDING STATE FLAGS
// =============================================================================

/// Binding is running its first (silent) evaluation
pub const CONSTRUCTING: u32 = 1 << 0;

/// Binding finished construction and reacts to writes
pub const ACTIVE: u32 = 1 << 1;

/// Binding's reaction callback is currently running; nested changes are
/// delivered by that call once the callback returns
pub const REACTING: u32 = 1 << 2;

/// Mask of the lifecycle bits (CONSTRUCTING | ACTIVE)
pub const LIFECYCLE_MASK: u32 = CONSTRUCTING | ACTIVE;

// =============================================================================
// RUNTIME DEFAULTS
// =============================================================================

/// Default bound on nested notification passes before a write fails
/// with `Error::NotifyDepthExceeded`.
pub const DEFAULT_MAX_NOTIFY_DEPTH: usize = 100;

/// Separator between path segments
pub const PATH_SEPARATOR: char = '.';

/// Attribute prefix marking a directive in markup
pub const DIRECTIVE_PREFIX: &str = "v-";

/// Opening delimiter of a text interpolation
pub const MUSTACHE_OPEN: &str = "{{";

/// Closing delimiter of a text interpolation
pub const MUSTACHE_CLOSE: &str = "}}";
