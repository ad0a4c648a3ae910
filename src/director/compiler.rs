// ============================================================================
// spark-bindings - Director
// Walks a markup tree and wires each binding site to the view model
// ============================================================================
//
// The engine knows nothing about markup. Everything here is glue: find a
// site, create a Binding whose reaction updates the element, and for two-way
// sites add a listener that writes back through resolve_write.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use super::directive::{Directive, Interpolation};
use super::template::{Element, Node, TextNode};
use super::view_model::ViewModel;
use crate::core::error::Error;
use crate::graph::value::Value;
use crate::primitives::binding::Binding;

/// Result of compiling a tree: owns every binding it created.
///
/// Registries only hold weak references, so dropping the view stops all of
/// its sites from updating.
#[derive(Debug, Default)]
pub struct View {
    bindings: Vec<Binding>,
}

impl View {
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Compiles binding sites under a root element.
pub struct Director<'a> {
    vm: &'a ViewModel,
    view: View,
}

impl<'a> Director<'a> {
    /// Compile every site below `root` (the root's own attributes are not
    /// sites). Children are visited depth-first; an element's subtree is
    /// compiled before its own attributes.
    pub fn compile(root: &Element, vm: &'a ViewModel) -> Result<View, Error> {
        let mut director = Director {
            vm,
            view: View::default(),
        };
        director.compile_children(root)?;
        tracing::debug!(bindings = director.view.len(), tag = root.tag(), "markup compiled");
        Ok(director.view)
    }

    fn compile_children(&mut self, element: &Element) -> Result<(), Error> {
        for child in element.children() {
            match child {
                Node::Element(child) => {
                    self.compile_children(&child)?;
                    for (name, expression) in child.attributes() {
                        if let Some(directive) = Directive::parse(&name, &expression)? {
                            self.apply(&child, directive)?;
                        }
                    }
                }
                Node::Text(text) => {
                    if let Some(interpolation) = Interpolation::parse(&text.content())? {
                        self.interpolate(&text, interpolation)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, element: &Element, directive: Directive) -> Result<(), Error> {
        tracing::trace!(tag = element.tag(), ?directive, "binding site");
        match directive {
            Directive::Model(path) => {
                let target = element.clone();
                let binding = Binding::with_path(self.vm.data(), path.clone(), move |value| {
                    target.set_value(value.to_string());
                })?;
                element.set_value(binding.value().to_string());

                let vm = self.vm.clone();
                element.add_listener("input", move |event| {
                    path.write(vm.data(), event.value.clone())
                });
                self.view.bindings.push(binding);
            }
            Directive::Html(path) => {
                let target = element.clone();
                let binding = Binding::with_path(self.vm.data(), path, move |value| {
                    target.set_inner_html(value.to_string());
                })?;
                element.set_inner_html(binding.value().to_string());
                self.view.bindings.push(binding);
            }
            Directive::Text(path) => {
                let target = element.clone();
                let binding = Binding::with_path(self.vm.data(), path, move |value| {
                    target.set_text(value.to_string());
                })?;
                element.set_text(binding.value().to_string());
                self.view.bindings.push(binding);
            }
            Directive::On { event, method } => {
                if !self.vm.has_method(&method) {
                    return Err(Error::MethodNotFound { name: method });
                }
                let vm = self.vm.clone();
                element.add_listener(event, move |event| vm.call(&method, event));
            }
        }
        Ok(())
    }

    /// One binding per placeholder; any change re-renders the whole text.
    fn interpolate(&mut self, text: &TextNode, interpolation: Interpolation) -> Result<(), Error> {
        let interpolation = Rc::new(interpolation);
        let values = Rc::new(RefCell::new(vec![Value::Null; interpolation.paths().len()]));

        for (index, path) in interpolation.paths().iter().enumerate() {
            let (target, template, slots) = (text.clone(), interpolation.clone(), values.clone());
            let binding = Binding::with_path(self.vm.data(), path.clone(), move |value| {
                slots.borrow_mut()[index] = value.clone();
                target.set_content(template.render(&slots.borrow()));
            })?;
            values.borrow_mut()[index] = binding.value();
            self.view.bindings.push(binding);
        }

        text.set_content(interpolation.render(&values.borrow()));
        Ok(())
    }
}
