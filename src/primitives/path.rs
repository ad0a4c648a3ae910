// ============================================================================
// spark-bindings - Property Paths
// Dotted path parsing and resolution over the data graph
// ============================================================================
//
// Paths are identifier segments joined by '.', with no escaping and no
// positional segments: `user.name` is valid, `items.0` is not. Sequence
// elements are reached only through records that hold them.
//
// Every step of a walk goes through the record getter, so each intermediate
// read is itself a tracked dependency read.
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::core::constants::PATH_SEPARATOR;
use crate::core::error::{Error, PathError};
use crate::graph::value::{Record, Value};

/// A parsed, validated property path.
///
/// # Example
///
/// ```
/// use spark_bindings::PropertyPath;
///
/// let path: PropertyPath = "user.name".parse().unwrap();
/// assert_eq!(path.segments(), ["user", "name"]);
/// assert!(PropertyPath::parse("items.0").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<String>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::EmptyPath);
        }
        let segments = path
            .split(PATH_SEPARATOR)
            .map(|segment| {
                if is_identifier(segment) {
                    Ok(segment.to_string())
                } else {
                    Err(PathError::InvalidSegment {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk every segment, reading through each record getter.
    pub fn read(&self, root: &Record) -> Result<Value, PathError> {
        self.walk(root, &self.segments)
    }

    /// Walk all but the last segment, then assign through the final setter.
    ///
    /// The final key need not exist; if absent it is added as a plain
    /// property.
    pub fn write(&self, root: &Record, value: impl Into<Value>) -> Result<(), Error> {
        let (last, parents) = self
            .segments
            .split_last()
            .ok_or(PathError::EmptyPath)?;
        let parent = self.walk(root, parents)?;
        let record = self.expect_record(&parent, last)?;
        record.set(last, value)?;
        Ok(())
    }

    fn walk(&self, root: &Record, segments: &[String]) -> Result<Value, PathError> {
        let mut current = Value::Record(root.clone());
        for segment in segments {
            let record = self.expect_record(&current, segment)?;
            let next = record
                .get(segment)
                .ok_or_else(|| PathError::MissingSegment {
                    path: self.raw.clone(),
                    segment: segment.clone(),
                })?;
            current = next;
        }
        Ok(current)
    }

    fn expect_record<'a>(&self, value: &'a Value, segment: &str) -> Result<&'a Record, PathError> {
        value.as_record().ok_or_else(|| PathError::NotARecord {
            path: self.raw.clone(),
            segment: segment.to_string(),
            found: value.kind(),
        })
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// ASCII identifier: `[A-Za-z_$][A-Za-z0-9_$]*`
fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// =============================================================================
// FREE FUNCTIONS
// =============================================================================

/// Read `path` from `root`.
///
/// # Example
///
/// ```
/// use spark_bindings::{record, resolve_read, Value};
///
/// let root = record! { "user" => record! { "name" => "Ann" } };
/// assert_eq!(resolve_read(&root, "user.name").unwrap(), Value::from("Ann"));
/// assert!(resolve_read(&root, "user.email").is_err());
/// ```
pub fn resolve_read(root: &Record, path: &str) -> Result<Value, PathError> {
    PropertyPath::parse(path)?.read(root)
}

/// Assign `value` at `path` in `root`.
pub fn resolve_write(root: &Record, path: &str, value: impl Into<Value>) -> Result<(), Error> {
    PropertyPath::parse(path)?.write(root, value)
}
