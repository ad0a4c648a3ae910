// ============================================================================
// spark-bindings - Errors
// Path resolution failures and runtime errors raised by writes and bindings
// ============================================================================

use thiserror::Error;

/// Errors produced while parsing or walking a property path.
///
/// Missing keys are errors, not a "no value" sentinel: a binding on a path
/// that does not exist fails at construction.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string was empty.
    #[error("empty property path")]
    EmptyPath,

    /// A segment is empty or not an ASCII identifier.
    #[error("invalid segment `{segment}` in path `{path}`")]
    InvalidSegment {
        /// Full path being parsed.
        path: String,
        /// Offending segment.
        segment: String,
    },

    /// A key along the path is absent.
    #[error("missing key `{segment}` while resolving `{path}`")]
    MissingSegment {
        /// Full path being resolved.
        path: String,
        /// First key that was not found.
        segment: String,
    },

    /// The walk tried to step into a value that is not a record.
    #[error("cannot read `{segment}` of a {found} while resolving `{path}`")]
    NotARecord {
        /// Full path being resolved.
        path: String,
        /// Key that was requested.
        segment: String,
        /// Kind of the value that was found instead.
        found: &'static str,
    },
}

impl PathError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PathError::EmptyPath => "path_empty",
            PathError::InvalidSegment { .. } => "path_invalid_segment",
            PathError::MissingSegment { .. } => "path_missing_segment",
            PathError::NotARecord { .. } => "path_not_a_record",
        }
    }
}

/// Errors produced by the binding runtime.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Path parsing or resolution failed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Assignment to a getter-only (computed) property.
    #[error("property `{key}` is computed and cannot be assigned")]
    ReadOnly {
        /// Key of the computed property.
        key: String,
    },

    /// Nested write -> notify -> reaction -> write chains went deeper than allowed.
    #[error("notification depth exceeded {limit} nested passes")]
    NotifyDepthExceeded {
        /// Configured limit that was hit.
        limit: usize,
    },

    /// Markup used a `v-*` attribute with no known meaning.
    #[error("unknown directive `{name}`")]
    UnknownDirective {
        /// Attribute name as written.
        name: String,
    },

    /// An event directive named a method the view model does not have.
    #[error("no method named `{name}`")]
    MethodNotFound {
        /// Requested method name.
        name: String,
    },
}

impl Error {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::Path(e) => e.as_label(),
            Error::ReadOnly { .. } => "property_read_only",
            Error::NotifyDepthExceeded { .. } => "notify_depth_exceeded",
            Error::UnknownDirective { .. } => "directive_unknown",
            Error::MethodNotFound { .. } => "method_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_errors_convert_into_runtime_errors() {
        let err: Error = PathError::EmptyPath.into();
        assert_eq!(err, Error::Path(PathError::EmptyPath));
        assert_eq!(err.as_label(), "path_empty");
    }

    #[test]
    fn messages_name_the_failing_segment() {
        let err = PathError::MissingSegment {
            path: "user.email".into(),
            segment: "email".into(),
        };
        assert_eq!(
            err.to_string(),
            "missing key `email` while resolving `user.email`"
        );
        assert_eq!(
            Error::from(err).to_string(),
            "missing key `email` while resolving `user.email`"
        );
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(Error::ReadOnly { key: "k".into() }.as_label(), "property_read_only");
        assert_eq!(
            Error::NotifyDepthExceeded { limit: 3 }.as_label(),
            "notify_depth_exceeded"
        );
    }
}
