// ============================================================================
// spark-bindings - Director Module
// Markup-side glue: a document tree, directives, the compiler, view models
// ============================================================================

pub mod compiler;
pub mod directive;
pub mod template;
pub mod view_model;

pub use compiler::{Director, View};
pub use directive::{Directive, Interpolation};
pub use template::{Element, Event, Listener, Node, TextNode};
pub use view_model::{MethodFn, ViewModel, ViewModelBuilder};
