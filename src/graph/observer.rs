// ============================================================================
// spark-bindings - Observer
// Installs reactivity on every property reachable from a root
// ============================================================================

use std::collections::HashSet;

use super::value::{Record, Value};

/// Make every data property reachable from `root` reactive.
///
/// Depth-first: a property's value is installed before the property itself.
/// Call once per root. A property that is already reactive keeps its
/// registry; only its value is walked again. Each record or sequence is
/// walked once per call, so cyclic graphs terminate.
pub fn install(root: &Record) {
    tracing::debug!(keys = root.len(), "installing reactivity on root record");
    install_record(root, &mut HashSet::new());
}

/// Install on any value: records are walked, sequences are walked
/// element-wise, scalars are left alone.
pub fn install_value(value: &Value) {
    walk(value, &mut HashSet::new());
}

fn walk(value: &Value, visited: &mut HashSet<usize>) {
    match value {
        Value::Record(record) => install_record(record, visited),
        Value::Sequence(sequence) => {
            if !visited.insert(sequence.addr()) {
                return;
            }
            for item in sequence.to_vec() {
                walk(&item, visited);
            }
        }
        _ => {}
    }
}

fn install_record(record: &Record, visited: &mut HashSet<usize>) {
    if !visited.insert(record.addr()) {
        return;
    }
    for (key, property) in record.properties() {
        // Getter-only properties have no stored value to intercept.
        if property.is_computed() {
            continue;
        }
        walk(&property.peek(), visited);
        if !property.make_reactive() {
            tracing::debug!(key = %key, "property already reactive; keeping its registry");
        }
    }
}
