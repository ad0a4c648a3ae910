// ============================================================================
// spark-bindings - Runtime Configuration
// Per-thread knobs for notification fan-out
// ============================================================================

use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_MAX_NOTIFY_DEPTH;

/// Configuration of the binding runtime on the current thread.
///
/// Loadable from JSON; missing fields fall back to the defaults.
///
/// # Example
///
/// ```
/// use spark_bindings::RuntimeConfig;
///
/// let config: RuntimeConfig = serde_json::from_str(r#"{ "max_notify_depth": null }"#).unwrap();
/// assert_eq!(config.max_notify_depth, None);
/// assert!(config.dedupe_notifications);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum nesting of notification passes (a reaction writing state that
    /// notifies again). `None` means unbounded.
    pub max_notify_depth: Option<usize>,

    /// Re-evaluate a binding at most once per notification pass even if the
    /// property recorded it several times.
    pub dedupe_notifications: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_notify_depth: Some(DEFAULT_MAX_NOTIFY_DEPTH),
            dedupe_notifications: true,
        }
    }
}

impl RuntimeConfig {
    /// Config with no depth guard, matching plain recursive notification.
    pub fn unbounded() -> Self {
        Self {
            max_notify_depth: None,
            ..Self::default()
        }
    }

    /// Returns true if `depth` nested passes are allowed.
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_notify_depth.is_none_or(|limit| depth <= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.max_notify_depth, Some(DEFAULT_MAX_NOTIFY_DEPTH));
        assert!(config.dedupe_notifications);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{ "dedupe_notifications": false }"#).unwrap();
        assert!(!config.dedupe_notifications);
        assert_eq!(config.max_notify_depth, Some(DEFAULT_MAX_NOTIFY_DEPTH));
    }

    #[test]
    fn depth_check() {
        let config = RuntimeConfig {
            max_notify_depth: Some(2),
            dedupe_notifications: true,
        };
        assert!(config.allows_depth(2));
        assert!(!config.allows_depth(3));
        assert!(RuntimeConfig::unbounded().allows_depth(usize::MAX));
    }
}
