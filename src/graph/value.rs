// ============================================================================
// spark-bindings - Data Graph Values
// Tagged-variant values: scalars, records of accessor cells, sequences
// ============================================================================
//
// Records never hand out their raw values. Each key maps to a Property cell
// whose get()/set() are the intercepted accessor pair; reading a key while a
// binding evaluates subscribes that binding to the key.
//
// Records and sequences are Rc handles, so cloning a Value clones a reference
// and strict equality on them is identity (like `===`).
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::property::Property;
use crate::core::error::Error;
use crate::reactivity::equality::strict_equals;

// =============================================================================
// VALUE
// =============================================================================

/// A node of the data graph.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent / null scalar
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(f64),
    /// Text scalar
    Text(Rc<str>),
    /// String-keyed mapping of properties
    Record(Record),
    /// Ordered sequence (membership is not reactive)
    Sequence(Sequence),
}

impl Value {
    /// Short name of the variant, used in errors and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Record(_) => "record",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Build a graph from JSON. Objects become fresh (not yet reactive) records.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s.into()),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let record = Record::new();
                for (key, value) in map {
                    record.insert(key, Value::from_json(value));
                }
                Value::Record(record)
            }
        }
    }

    /// Untracked JSON snapshot. Computed properties are left out.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::Text(s) => serde_json::Value::String(s.to_string()),
            Value::Sequence(seq) => {
                serde_json::Value::Array(seq.to_vec().iter().map(Value::to_json).collect())
            }
            Value::Record(record) => {
                let mut map = serde_json::Map::new();
                for (key, property) in record.properties() {
                    if property.is_computed() {
                        continue;
                    }
                    map.insert(key.to_string(), property.peek().to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15
}

fn number_to_json(n: f64) -> serde_json::Value {
    if is_integral(n) {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

impl PartialEq for Value {
    /// Strict equality: scalars by value, records and sequences by identity.
    fn eq(&self, other: &Self) -> bool {
        strict_equals(self, other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::Record(r) => fmt::Debug::fmt(r, f),
            Value::Sequence(s) => fmt::Debug::fmt(s, f),
        }
    }
}

impl fmt::Display for Value {
    /// Text as shown by an external consumer (input value, element content).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if is_integral(*n) => write!(f, "{}", *n as i64),
            Value::Number(n) if n.is_nan() => write!(f, "NaN"),
            Value::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Record(_) | Value::Sequence(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s.into())
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Sequence> for Value {
    fn from(s: Sequence) -> Self {
        Value::Sequence(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(Sequence::from_values(items))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// =============================================================================
// RECORD
// =============================================================================

struct RecordInner {
    properties: RefCell<IndexMap<Rc<str>, Rc<Property>>>,
}

/// A string-keyed mapping whose keys are accessor cells.
///
/// Before `install` the cells are plain: reads never subscribe and writes
/// never notify. `install` turns every data property reactive, once.
///
/// # Example
///
/// ```
/// use spark_bindings::{install, record, Value};
///
/// let user = record! { "name" => "Ann", "age" => 30 };
/// install(&user);
///
/// assert_eq!(user.get("name"), Some(Value::from("Ann")));
/// assert!(user.property("age").unwrap().is_reactive());
/// ```
#[derive(Clone)]
pub struct Record {
    inner: Rc<RecordInner>,
}

/// Non-owning handle to a record (for computed getters that close over
/// their own record).
#[derive(Clone)]
pub struct WeakRecord {
    inner: Weak<RecordInner>,
}

impl WeakRecord {
    pub fn upgrade(&self) -> Option<Record> {
        self.inner.upgrade().map(|inner| Record { inner })
    }
}

impl Record {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RecordInner {
                properties: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// Add (or replace) a plain data property. Use before `install`;
    /// replacing a reactive property drops its registry.
    pub fn insert(&self, key: impl Into<Rc<str>>, value: impl Into<Value>) {
        let key = key.into();
        let property = Rc::new(Property::data(key.clone(), value.into()));
        self.inner.properties.borrow_mut().insert(key, property);
    }

    /// Add a getter-only property evaluated on every read.
    pub fn define_computed(&self, key: impl Into<Rc<str>>, getter: impl Fn() -> Value + 'static) {
        let key = key.into();
        let property = Rc::new(Property::computed(key.clone(), Rc::new(getter)));
        self.inner.properties.borrow_mut().insert(key, property);
    }

    /// The accessor cell for `key`
    pub fn property(&self, key: &str) -> Option<Rc<Property>> {
        self.inner.properties.borrow().get(key).cloned()
    }

    /// Tracked read of `key` (the getter)
    pub fn get(&self, key: &str) -> Option<Value> {
        // Release the map borrow before the getter runs: computed getters may
        // read this same record.
        let property = self.property(key)?;
        Some(property.get())
    }

    /// Untracked read of `key`
    pub fn peek(&self, key: &str) -> Option<Value> {
        let property = self.property(key)?;
        Some(property.peek())
    }

    /// Assign `key` (the setter). Returns true if the stored value changed.
    ///
    /// An absent key is added as a plain property: it is not reactive.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool, Error> {
        let value = value.into();
        match self.property(key) {
            Some(property) => property.set(value),
            None => {
                tracing::debug!(key, "assigning new key; it will not be reactive");
                self.insert(key, value);
                Ok(true)
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.properties.borrow().contains_key(key)
    }

    pub fn keys(&self) -> Vec<Rc<str>> {
        self.inner.properties.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.properties.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.properties.borrow().is_empty()
    }

    /// Snapshot of (key, cell) pairs in insertion order.
    pub fn properties(&self) -> Vec<(Rc<str>, Rc<Property>)> {
        self.inner
            .properties
            .borrow()
            .iter()
            .map(|(k, p)| (k.clone(), p.clone()))
            .collect()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    pub fn downgrade(&self) -> WeakRecord {
        WeakRecord {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, property) in self.properties() {
            if property.is_computed() {
                map.entry(&key, &format_args!("<computed>"));
            } else {
                map.entry(&key, &property.peek());
            }
        }
        map.finish()
    }
}

// =============================================================================
// SEQUENCE
// =============================================================================

/// An ordered sequence of values.
///
/// Elements' own records are made reactive by `install`; the sequence's
/// length and membership are not. Elements added with `push` after
/// installation stay plain.
#[derive(Clone, Default)]
pub struct Sequence {
    items: Rc<RefCell<Vec<Value>>>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(items: Vec<Value>) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.items.borrow_mut().push(value.into());
    }

    /// Snapshot of the elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.items) as usize
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec().iter()).finish()
    }
}
