// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::selector::{Matchable, Selector};
use crate::{Click, Document, Element, Error, Event, EventType, MouseDetail, NodeId, Result, Visibility};

type Handler<T> = Arc<dyn Fn(&Event<T>) + Send + Sync>;

/// Type-erased handlers, keyed by event name. Each entry holds a `Handler<T>`.
type Listeners = HashMap<&'static str, Vec<Arc<dyn Any + Send + Sync>>>;

/// An in-memory document tree.
///
/// The document starts out as an `<html>` element containing an empty `<body>`. Elements are
/// added with [`append`][Self::append], located with CSS selectors through
/// [`Document::query_first`] and receive events through [`dispatch`][Self::dispatch].
///
/// Clones share the same tree.
///
/// # Events
///
/// An event dispatched to a node is delivered to the handlers of that node, then to the
/// handlers of each ancestor up to `<html>`, and finally to document-level handlers. A
/// handler can end delivery after the current node with [`Event::stop_propagation`].
///
/// # Examples
///
/// ```
/// use lowbar_dom::{Document, Element, ElementSpec, MemoryDocument};
///
/// let document = MemoryDocument::new();
/// let menu = document.append(document.body().node_id(), ElementSpec::new("ul").id("menu"))?;
/// document.append(menu.node_id(), ElementSpec::new("li").class("item"))?;
///
/// let item = document.query_first("#menu .item")?.expect("item exists");
/// assert_eq!(item.tag(), "li");
/// assert!(menu.contains(item.node_id()));
/// # Ok::<(), lowbar_dom::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct MemoryDocument {
    tree: Arc<RwLock<Tree>>,
}

/// Describes an element to [`append`][MemoryDocument::append] to a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    visibility: Visibility,
}

/// A handle to an element of a [`MemoryDocument`].
#[derive(Clone)]
pub struct MemoryElement {
    tree: Arc<RwLock<Tree>>,
    node: NodeId,
}

struct Tree {
    nodes: Vec<Node>,
    document_listeners: Listeners,
}

struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    visibility: Visibility,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Listeners,
}

const ROOT: NodeId = NodeId::from_raw(0);
const BODY: NodeId = NodeId::from_raw(1);

impl ElementSpec {
    /// Describes a visible element with the given tag and no id or classes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            visibility: Visibility::Visible,
        }
    }

    /// Sets the `id` attribute.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Sets the initial visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

impl MemoryDocument {
    /// Creates a document containing `<html>` and an empty `<body>`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `<html>` element.
    #[must_use]
    pub fn root(&self) -> MemoryElement {
        self.handle(ROOT)
    }

    /// Returns the `<body>` element.
    #[must_use]
    pub fn body(&self) -> MemoryElement {
        self.handle(BODY)
    }

    /// Returns a handle to `node`, or `None` if the node is not part of this document.
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<MemoryElement> {
        self.tree.read().node(node).map(|_| self.handle(node))
    }

    /// Appends a new element as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not part of this document.
    pub fn append(&self, parent: NodeId, spec: ElementSpec) -> Result<MemoryElement> {
        let node = {
            let mut tree = self.tree.write();
            tree.node(parent).ok_or_else(|| Error::unknown_node(parent))?;

            let node = NodeId::from_raw(tree.nodes.len());
            tree.nodes.push(Node::new(spec, Some(parent)));
            tree.nodes[parent.as_raw()].children.push(node);
            node
        };

        Ok(self.handle(node))
    }

    /// Delivers an event of kind `T` to `target`, its ancestors and the document.
    ///
    /// Returns the event after delivery, so callers can check whether propagation was stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is not part of this document.
    pub fn dispatch<T: EventType>(&self, target: NodeId, detail: T::Detail) -> Result<Event<T>> {
        let path = self.tree.read().path(target).ok_or_else(|| Error::unknown_node(target))?;
        let event = Event::new(target, detail);

        tracing::debug!(event = T::NAME, node = target.as_raw(), "dispatching event");

        for node in path {
            let handlers = self.tree.read().nodes[node.as_raw()].handlers::<T>();
            invoke(&handlers, &event);

            if event.is_propagation_stopped() {
                tracing::trace!(event = T::NAME, node = node.as_raw(), "propagation stopped");
                return Ok(event);
            }
        }

        let handlers = snapshot::<T>(&self.tree.read().document_listeners);
        invoke(&handlers, &event);

        Ok(event)
    }

    /// Dispatches a [`Click`] with default details to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is not part of this document.
    pub fn click(&self, target: NodeId) -> Result<Event<Click>> {
        self.dispatch::<Click>(target, MouseDetail::default())
    }

    fn handle(&self, node: NodeId) -> MemoryElement {
        MemoryElement {
            tree: Arc::clone(&self.tree),
            node,
        }
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn query_first(&self, selector: &str) -> Result<Option<MemoryElement>> {
        let selector = Selector::parse(selector)?;
        let found = self.tree.read().find_first(&selector);

        Ok(found.map(|node| self.handle(node)))
    }

    fn add_listener<T, H>(&self, handler: H)
    where
        T: EventType,
        H: Fn(&Event<T>) + Send + Sync + 'static,
    {
        register(&mut self.tree.write().document_listeners, handler);
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("nodes", &self.tree.read().nodes.len())
            .finish_non_exhaustive()
    }
}

impl MemoryElement {
    /// Returns the lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> String {
        self.with_node(|n| n.tag.clone())
    }

    /// Returns the `id` attribute.
    #[must_use]
    pub fn dom_id(&self) -> Option<String> {
        self.with_node(|n| n.id.clone())
    }

    /// Returns `true` if the element has `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.with_node(|n| n.has_class(class))
    }

    /// Returns the parent element, or `None` for `<html>`.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.with_node(|n| n.parent).map(|node| Self {
            tree: Arc::clone(&self.tree),
            node,
        })
    }

    fn with_node<R>(&self, f: impl FnOnce(&Node) -> R) -> R {
        // Handles are only created for existing nodes and nodes are never removed.
        f(&self.tree.read().nodes[self.node.as_raw()])
    }
}

impl Element for MemoryElement {
    fn node_id(&self) -> NodeId {
        self.node
    }

    fn visibility(&self) -> Visibility {
        self.with_node(|n| n.visibility)
    }

    fn set_visibility(&self, visibility: Visibility) {
        self.tree.write().nodes[self.node.as_raw()].visibility = visibility;
    }

    fn contains(&self, node: NodeId) -> bool {
        self.tree.read().ancestors_or_self(node).any(|n| n == self.node)
    }

    fn add_listener<T, H>(&self, handler: H)
    where
        T: EventType,
        H: Fn(&Event<T>) + Send + Sync + 'static,
    {
        register(&mut self.tree.write().nodes[self.node.as_raw()].listeners, handler);
    }
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.node == other.node
    }
}

impl Eq for MemoryElement {}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_node(|n| {
            f.debug_struct("MemoryElement")
                .field("node", &self.node)
                .field("tag", &n.tag)
                .field("id", &n.id)
                .field("classes", &n.classes)
                .finish_non_exhaustive()
        })
    }
}

impl Default for Tree {
    fn default() -> Self {
        let mut root = Node::new(ElementSpec::new("html"), None);
        root.children.push(BODY);

        Self {
            nodes: vec![root, Node::new(ElementSpec::new("body"), Some(ROOT))],
            document_listeners: Listeners::new(),
        }
    }
}

impl Tree {
    fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.as_raw())
    }

    /// Yields `node` and then each of its ancestors up to the root.
    fn ancestors_or_self(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(node).map(|_| node), |n| self.nodes[n.as_raw()].parent)
    }

    /// The propagation path of an event aimed at `target`.
    fn path(&self, target: NodeId) -> Option<Vec<NodeId>> {
        self.node(target)?;
        Some(self.ancestors_or_self(target).collect())
    }

    /// Finds the first matching element in document order.
    fn find_first(&self, selector: &Selector) -> Option<NodeId> {
        let mut stack = vec![ROOT];

        while let Some(node) = stack.pop() {
            let ancestors = self.ancestors_or_self(node).skip(1).map(|n| &self.nodes[n.as_raw()]);
            if selector.matches(&self.nodes[node.as_raw()], ancestors) {
                return Some(node);
            }

            stack.extend(self.nodes[node.as_raw()].children.iter().rev());
        }

        None
    }
}

impl Node {
    fn new(spec: ElementSpec, parent: Option<NodeId>) -> Self {
        Self {
            tag: spec.tag.to_ascii_lowercase(),
            id: spec.id,
            classes: spec.classes,
            visibility: spec.visibility,
            parent,
            children: Vec::new(),
            listeners: Listeners::new(),
        }
    }

    fn handlers<T: EventType>(&self) -> Vec<Handler<T>> {
        snapshot(&self.listeners)
    }
}

impl Matchable for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn dom_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

fn register<T, H>(listeners: &mut Listeners, handler: H)
where
    T: EventType,
    H: Fn(&Event<T>) + Send + Sync + 'static,
{
    let handler: Handler<T> = Arc::new(handler);
    listeners.entry(T::NAME).or_default().push(Arc::new(handler));
}

/// Copies the handlers for `T` so they can run without the tree locked.
fn snapshot<T: EventType>(listeners: &Listeners) -> Vec<Handler<T>> {
    listeners
        .get(T::NAME)
        .into_iter()
        .flatten()
        .filter_map(|l| l.downcast_ref::<Handler<T>>())
        .cloned()
        .collect()
}

fn invoke<T: EventType>(handlers: &[Handler<T>], event: &Event<T>) {
    for handler in handlers {
        handler(event);
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::{Input, InputDetail, KeyDown, KeyboardDetail};

    fn record<T: EventType>(log: &Arc<Mutex<Vec<String>>>, label: &str) -> impl Fn(&Event<T>) + Send + Sync + 'static {
        let log = Arc::clone(log);
        let label = label.to_string();
        move |_: &Event<T>| log.lock().push(label.clone())
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(MemoryDocument: Send, Sync, Clone);
        static_assertions::assert_impl_all!(MemoryElement: Send, Sync, Clone, Element);
    }

    #[test]
    fn new_document_has_html_and_body() {
        let document = MemoryDocument::new();

        assert_eq!(document.root().tag(), "html");
        assert_eq!(document.body().tag(), "body");
        assert_eq!(document.body().parent(), Some(document.root()));
        assert_eq!(document.root().parent(), None);
    }

    #[test]
    fn append_and_lookup() {
        let document = MemoryDocument::new();
        let div = document
            .append(BODY, ElementSpec::new("DIV").id("main").class("a").class("b"))
            .unwrap();

        assert_eq!(div.tag(), "div");
        assert_eq!(div.dom_id().as_deref(), Some("main"));
        assert!(div.has_class("b"));
        assert_eq!(document.element(div.node_id()), Some(div));
        assert_eq!(document.element(NodeId::from_raw(99)), None);
    }

    #[test]
    fn append_to_unknown_parent_fails() {
        let document = MemoryDocument::new();
        let error = document.append(NodeId::from_raw(42), ElementSpec::new("p")).unwrap_err();

        assert!(error.is_unknown_node());
    }

    #[test]
    fn query_first_uses_document_order() {
        let document = MemoryDocument::new();
        let first = document.append(BODY, ElementSpec::new("section")).unwrap();
        let second = document.append(BODY, ElementSpec::new("section")).unwrap();

        // Appended last, but precedes `second` in document order.
        let nested = document
            .append(first.node_id(), ElementSpec::new("p").class("x"))
            .unwrap();
        document.append(second.node_id(), ElementSpec::new("p").class("x")).unwrap();

        assert_eq!(document.query_first(".x").unwrap(), Some(nested));
        assert_eq!(document.query_first("section").unwrap(), Some(first));
        assert_eq!(document.query_first("*").unwrap(), Some(document.root()));
        assert_eq!(document.query_first("table").unwrap(), None);
    }

    #[test]
    fn query_first_rejects_invalid_selector() {
        let document = MemoryDocument::new();

        assert!(document.query_first("p > a").unwrap_err().is_invalid_selector());
    }

    #[test]
    fn visibility_round_trips() {
        let document = MemoryDocument::new();
        let div = document
            .append(BODY, ElementSpec::new("div").visibility(Visibility::Hidden))
            .unwrap();
        assert_eq!(div.visibility(), Visibility::Hidden);

        div.set_visibility(Visibility::Visible);
        assert_eq!(document.query_first("div").unwrap().unwrap().visibility(), Visibility::Visible);
    }

    #[test]
    fn custom_event_kinds_bubble_like_builtins() {
        #[derive(Debug)]
        struct TouchStart;

        impl EventType for TouchStart {
            const NAME: &'static str = "touchstart";
            type Detail = u32;
        }

        let document = MemoryDocument::new();
        let list = document.append(BODY, ElementSpec::new("ul")).unwrap();
        let item = document.append(list.node_id(), ElementSpec::new("li")).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));

        list.add_listener::<TouchStart, _>(record(&log, "list"));
        document.add_listener::<TouchStart, _>(record(&log, "document"));
        document.add_listener::<Click, _>(record(&log, "click"));

        let event = document.dispatch::<TouchStart>(item.node_id(), 2).unwrap();

        assert_eq!(event.name(), "touchstart");
        assert_eq!(*event.detail(), 2);
        assert_eq!(*log.lock(), ["list", "document"]);
    }

    #[test]
    fn hidden_element_keeps_its_place_and_children() {
        let document = MemoryDocument::new();
        let panel = document.append(BODY, ElementSpec::new("div").id("panel")).unwrap();
        let label = document.append(panel.node_id(), ElementSpec::new("span")).unwrap();

        panel.set_visibility(Visibility::Hidden);

        assert_eq!(label.visibility(), Visibility::Visible);
        assert_eq!(label.parent(), Some(panel.clone()));
        assert_eq!(document.query_first("#panel span").unwrap(), Some(label));
        assert_eq!(document.query_first("#panel").unwrap(), Some(panel));
    }

    #[test]
    fn contains_is_inclusive_and_transitive() {
        let document = MemoryDocument::new();
        let outer = document.append(BODY, ElementSpec::new("div")).unwrap();
        let inner = document.append(outer.node_id(), ElementSpec::new("span")).unwrap();
        let sibling = document.append(BODY, ElementSpec::new("div")).unwrap();

        assert!(outer.contains(outer.node_id()));
        assert!(outer.contains(inner.node_id()));
        assert!(document.root().contains(inner.node_id()));
        assert!(!outer.contains(sibling.node_id()));
        assert!(!inner.contains(outer.node_id()));
        assert!(!outer.contains(NodeId::from_raw(1000)));
    }

    #[test]
    fn dispatch_bubbles_then_reaches_document() {
        let document = MemoryDocument::new();
        let outer = document.append(BODY, ElementSpec::new("div")).unwrap();
        let inner = document.append(outer.node_id(), ElementSpec::new("button")).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));

        document.add_listener(record::<Click>(&log, "document"));
        outer.add_listener(record::<Click>(&log, "outer"));
        inner.add_listener(record::<Click>(&log, "inner"));
        inner.add_listener(record::<Click>(&log, "inner again"));
        document.body().add_listener(record::<Click>(&log, "body"));

        document.click(inner.node_id()).unwrap();

        assert_eq!(*log.lock(), ["inner", "inner again", "outer", "body", "document"]);
    }

    #[test]
    fn handlers_only_see_their_event_kind() {
        let document = MemoryDocument::new();
        let input = document.append(BODY, ElementSpec::new("input")).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        input.add_listener::<Input, _>(move |event| sink.lock().push(event.detail().value.clone()));
        input.add_listener(record::<KeyDown>(&Arc::new(Mutex::new(Vec::new())), "unused"));

        document
            .dispatch::<Input>(input.node_id(), InputDetail { value: "abc".to_string() })
            .unwrap();
        document.click(input.node_id()).unwrap();

        assert_eq!(*seen.lock(), ["abc"]);
    }

    #[test]
    fn stop_propagation_finishes_current_node_only() {
        let document = MemoryDocument::new();
        let outer = document.append(BODY, ElementSpec::new("div")).unwrap();
        let inner = document.append(outer.node_id(), ElementSpec::new("a")).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));

        inner.add_listener::<Click, _>(|event| event.stop_propagation());
        inner.add_listener(record::<Click>(&log, "inner"));
        outer.add_listener(record::<Click>(&log, "outer"));
        document.add_listener(record::<Click>(&log, "document"));

        let event = document.click(inner.node_id()).unwrap();

        assert!(event.is_propagation_stopped());
        assert_eq!(*log.lock(), ["inner"]);
    }

    #[test]
    fn handlers_may_register_and_dispatch_reentrantly() {
        let document = MemoryDocument::new();
        let button = document.append(BODY, ElementSpec::new("button")).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));

        let doc = document.clone();
        let target = button.clone();
        let sink = Arc::clone(&log);
        button.add_listener::<Click, _>(move |_| {
            target.add_listener(record::<KeyDown>(&sink, "keydown"));
            doc.dispatch::<KeyDown>(target.node_id(), KeyboardDetail::default()).unwrap();
        });

        document.click(button.node_id()).unwrap();

        assert_eq!(*log.lock(), ["keydown"]);
    }

    #[test]
    fn dispatch_to_unknown_node_fails() {
        let document = MemoryDocument::new();

        assert!(document.click(NodeId::from_raw(7)).unwrap_err().is_unknown_node());
    }

    #[test]
    fn logs_dispatch() {
        let capture = testing_aids::LogCapture::new();
        let document = MemoryDocument::new();

        tracing::subscriber::with_default(capture.subscriber_at(tracing::Level::DEBUG), || {
            document.click(BODY).unwrap();
        });

        capture.assert_contains("dispatching event");
        capture.assert_contains("event=\"click\"");
    }
}
