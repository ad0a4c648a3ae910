// ============================================================================
// spark-bindings - Equality Functions
// Strict (identity) comparison used by setters and bindings
// ============================================================================

use crate::graph::value::Value;

// =============================================================================
// STRICT EQUALITY (Default)
// =============================================================================

/// Strict equality, the comparison behind the setter and binding gates.
///
/// Scalars compare by value (so `NaN` never equals `NaN`), records and
/// sequences by identity: a structurally identical but distinct record is a
/// different value.
///
/// # Example
/// ```
/// use spark_bindings::{record, strict_equals, Value};
///
/// assert!(strict_equals(&Value::from(42), &Value::from(42)));
/// assert!(!strict_equals(&Value::from(42), &Value::from("42")));
///
/// let a = Value::from(record! { "x" => 1 });
/// let b = Value::from(record! { "x" => 1 });
/// assert!(strict_equals(&a, &a.clone()));
/// assert!(!strict_equals(&a, &b));
/// ```
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Record(x), Value::Record(y)) => x.ptr_eq(y),
        (Value::Sequence(x), Value::Sequence(y)) => x.ptr_eq(y),
        _ => false,
    }
}

// =============================================================================
// DEEP EQUALITY
// =============================================================================

/// Structural equality over untracked reads.
///
/// Records are equal when they have the same keys (any order) with deeply
/// equal values; computed properties are compared by their current result.
/// Graphs with cycles are not supported.
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Record(x), Value::Record(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if x.len() != y.len() {
                return false;
            }
            x.keys().iter().all(|key| match (x.peek(key), y.peek(key)) {
                (Some(left), Some(right)) => deep_equals(&left, &right),
                _ => false,
            })
        }
        (Value::Sequence(x), Value::Sequence(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            let (left, right) = (x.to_vec(), y.to_vec());
            left.len() == right.len() && left.iter().zip(&right).all(|(l, r)| deep_equals(l, r))
        }
        _ => strict_equals(a, b),
    }
}
