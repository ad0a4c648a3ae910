// ============================================================================
// spark-bindings - Markup Tree
// A small in-memory document: elements, text nodes, events
// ============================================================================
//
// This is the external consumer side. Elements hold what a browser element
// would expose to bindings (input value, inner HTML, text children) plus
// event listeners that `dispatch` fires synchronously.
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::error::Error;
use crate::graph::value::Value;

// =============================================================================
// EVENTS
// =============================================================================

/// Event delivered to listeners
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Event name, e.g. `input` or `click`
    pub name: String,
    /// Payload (for `input`: the element's new value)
    pub value: Value,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Value::Null,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }
}

/// Event listener
pub type Listener = Rc<dyn Fn(&Event) -> Result<(), Error>>;

// =============================================================================
// NODES
// =============================================================================

/// A markup node
#[derive(Clone, Debug)]
pub enum Node {
    Element(Element),
    Text(TextNode),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextNode::new(content))
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        match self {
            Node::Element(element) => element.text_content(),
            Node::Text(text) => text.content(),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<TextNode> for Node {
    fn from(text: TextNode) -> Self {
        Node::Text(text)
    }
}

/// A text node. Clones share content.
#[derive(Clone)]
pub struct TextNode {
    content: Rc<RefCell<String>>,
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Rc::new(RefCell::new(content.into())),
        }
    }

    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    pub fn set_content(&self, content: impl Into<String>) {
        *self.content.borrow_mut() = content.into();
    }
}

impl fmt::Debug for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextNode").field(&*self.content.borrow()).finish()
    }
}

struct ElementInner {
    tag: String,
    attributes: RefCell<Vec<(String, String)>>,
    children: RefCell<Vec<Node>>,
    value: RefCell<String>,
    inner_html: RefCell<String>,
    listeners: RefCell<Vec<(String, Listener)>>,
}

/// An element. Clones share the same element.
///
/// # Example
///
/// ```
/// use spark_bindings::director::{Element, Node};
///
/// let input = Element::new("input").attr("v-model", "user.name");
/// let root = Element::new("div").child(input.clone()).child(Node::text("hi"));
///
/// assert_eq!(root.children().len(), 2);
/// assert_eq!(input.attribute("v-model").as_deref(), Some("user.name"));
/// assert_eq!(root.text_content(), "hi");
/// ```
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                tag: tag.into(),
                attributes: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
                value: RefCell::new(String::new()),
                inner_html: RefCell::new(String::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Builder: add an attribute
    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner
            .attributes
            .borrow_mut()
            .push((name.into(), value.into()));
        self
    }

    /// Builder: append a child
    pub fn child(self, node: impl Into<Node>) -> Self {
        self.append(node);
        self
    }

    pub fn append(&self, node: impl Into<Node>) {
        self.inner.children.borrow_mut().push(node.into());
    }

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Snapshot of attributes in declaration order
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.inner.attributes.borrow().clone()
    }

    /// Snapshot of children
    pub fn children(&self) -> Vec<Node> {
        self.inner.children.borrow().clone()
    }

    /// Form value (what an input shows)
    pub fn value(&self) -> String {
        self.inner.value.borrow().clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.inner.value.borrow_mut() = value.into();
    }

    pub fn inner_html(&self) -> String {
        self.inner.inner_html.borrow().clone()
    }

    pub fn set_inner_html(&self, html: impl Into<String>) {
        *self.inner.inner_html.borrow_mut() = html.into();
    }

    /// Replace all children with a single text node
    pub fn set_text(&self, content: impl Into<String>) {
        *self.inner.children.borrow_mut() = vec![Node::text(content)];
    }

    pub fn text_content(&self) -> String {
        self.children().iter().map(Node::text_content).collect()
    }

    pub fn add_listener(
        &self,
        event: impl Into<String>,
        listener: impl Fn(&Event) -> Result<(), Error> + 'static,
    ) {
        self.inner
            .listeners
            .borrow_mut()
            .push((event.into(), Rc::new(listener)));
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }

    /// Fire `event` at this element's listeners, in registration order.
    /// All listeners run; the first error is returned.
    pub fn dispatch(&self, event: &Event) -> Result<(), Error> {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|(name, _)| *name == event.name)
            .map(|(_, listener)| listener.clone())
            .collect();

        let mut first_error = None;
        for listener in listeners {
            if let Err(err) = listener(event) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Simulate the user typing: set the form value, then fire `input`.
    pub fn input(&self, value: impl Into<String>) -> Result<(), Error> {
        let value = value.into();
        self.set_value(value.clone());
        self.dispatch(&Event::new("input").with_value(value))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.inner.tag)
            .field("attributes", &*self.inner.attributes.borrow())
            .field("children", &*self.inner.children.borrow())
            .finish()
    }
}
