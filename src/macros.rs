// ============================================================================
// spark-bindings - Graph Literal Macros
// ============================================================================

/// Build a (not yet reactive) record from `key => value` pairs.
///
/// Values go through `Into<Value>`, so nested `record!` calls, scalars,
/// strings and sequences can be mixed.
///
/// # Usage
///
/// ```rust
/// use spark_bindings::{record, sequence, Value};
///
/// let root = record! {
///     "user" => record! { "name" => "Ann", "age" => 30 },
///     "tags" => sequence!["a", "b"],
/// };
/// assert_eq!(root.len(), 2);
/// assert_eq!(root.get("tags").unwrap().as_sequence().unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let record = $crate::Record::new();
            $( record.insert($key, $value); )+
            record
        }
    };
}

/// Build a sequence from values (anything `Into<Value>`).
///
/// # Usage
///
/// ```rust
/// use spark_bindings::{record, sequence};
///
/// let items = sequence![1, "two", record! { "three" => 3 }];
/// assert_eq!(items.len(), 3);
/// ```
#[macro_export]
macro_rules! sequence {
    () => {
        $crate::Sequence::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Sequence::from_values(vec![$($crate::Value::from($value)),+])
    };
}
