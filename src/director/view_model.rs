// ============================================================================
// spark-bindings - View Model
// The top-level object: reactive data, computed properties, methods
// ============================================================================

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::template::Event;
use crate::core::error::{Error, PathError};
use crate::graph::observer::install;
use crate::graph::value::{Record, Value};
use crate::primitives::binding::Binding;
use crate::primitives::path::{resolve_read, resolve_write};

/// Method callable from `v-on:*` sites
pub type MethodFn = Rc<dyn Fn(&ViewModel, &Event) -> Result<(), Error>>;

type ComputedGetter = Rc<dyn Fn(&Record) -> Value>;

struct ViewModelInner {
    data: Record,
    methods: IndexMap<String, MethodFn>,
}

/// Reactive data plus the methods markup can call.
///
/// # Example
///
/// ```
/// use spark_bindings::director::ViewModel;
/// use spark_bindings::{record, Value};
///
/// let vm = ViewModel::builder()
///     .data(record! { "first" => "Ann", "last" => "Lee" })
///     .computed("full", |data| {
///         let first = data.get("first").unwrap_or_default();
///         let last = data.get("last").unwrap_or_default();
///         Value::from(format!("{first} {last}"))
///     })
///     .build();
///
/// assert_eq!(vm.get("full").unwrap(), Value::from("Ann Lee"));
/// vm.set("last", "Kim").unwrap();
/// assert_eq!(vm.get("full").unwrap(), Value::from("Ann Kim"));
/// ```
#[derive(Clone)]
pub struct ViewModel {
    inner: Rc<ViewModelInner>,
}

impl ViewModel {
    pub fn builder() -> ViewModelBuilder {
        ViewModelBuilder::default()
    }

    /// The reactive data record
    pub fn data(&self) -> &Record {
        &self.inner.data
    }

    /// Read a path of the data (tracked if a binding is evaluating)
    pub fn get(&self, path: &str) -> Result<Value, PathError> {
        resolve_read(&self.inner.data, path)
    }

    /// Write a path of the data, notifying dependent bindings
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<(), Error> {
        resolve_write(&self.inner.data, path, value)
    }

    /// Bind a path of the data
    pub fn bind(
        &self,
        path: &str,
        reaction: impl FnMut(&Value) + 'static,
    ) -> Result<Binding, Error> {
        Binding::new(&self.inner.data, path, reaction)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.inner.methods.contains_key(name)
    }

    /// Invoke a registered method
    pub fn call(&self, name: &str, event: &Event) -> Result<(), Error> {
        let method = self
            .inner
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MethodNotFound {
                name: name.to_string(),
            })?;
        method(self, event)
    }
}

impl fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("data", &self.inner.data)
            .field("methods", &self.inner.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder for [`ViewModel`]
#[derive(Default)]
pub struct ViewModelBuilder {
    data: Record,
    computed: Vec<(String, ComputedGetter)>,
    methods: IndexMap<String, MethodFn>,
}

impl ViewModelBuilder {
    /// Set the data record (not yet reactive; `build` installs it)
    pub fn data(mut self, data: Record) -> Self {
        self.data = data;
        self
    }

    /// Add a getter-only property to the data record, re-evaluated on every
    /// read (not cached).
    pub fn computed(
        mut self,
        name: impl Into<String>,
        getter: impl Fn(&Record) -> Value + 'static,
    ) -> Self {
        self.computed.push((name.into(), Rc::new(getter)));
        self
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&ViewModel, &Event) -> Result<(), Error> + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    /// Define computed properties, then make the data reactive.
    pub fn build(self) -> ViewModel {
        let data = self.data;
        for (name, getter) in self.computed {
            // Weak: the record owns this closure.
            let weak = data.downgrade();
            data.define_computed(name, move || {
                weak.upgrade().map_or(Value::Null, |record| getter(&record))
            });
        }
        install(&data);
        tracing::debug!(
            keys = data.len(),
            methods = self.methods.len(),
            "view model ready"
        );
        ViewModel {
            inner: Rc::new(ViewModelInner {
                data,
                methods: self.methods,
            }),
        }
    }
}
