// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Event, EventType, Result};

/// Identifies a node within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates an id from a document-specific index.
    ///
    /// Intended for custom [`Document`] implementations.
    #[must_use]
    pub const fn from_raw(index: usize) -> Self {
        Self(index)
    }

    /// Returns the document-specific index of this id.
    #[must_use]
    pub const fn as_raw(self) -> usize {
        self.0
    }
}

/// Whether an element is painted, in the sense of CSS `visibility`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Painted, like `visibility: visible`.
    #[default]
    Visible,

    /// Not painted but still occupying its layout box, like `visibility: hidden`.
    Hidden,
}

/// A document that can be queried for elements and observed for events.
///
/// [`MemoryDocument`][crate::MemoryDocument] is the in-process implementation. Hosts with a
/// real document tree implement this trait over their own node handles.
pub trait Document {
    /// The element handle type returned by queries.
    type Element: Element;

    /// Returns the first element in document order that matches a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector cannot be parsed.
    fn query_first(&self, selector: &str) -> Result<Option<Self::Element>>;

    /// Registers a document-level handler for events of kind `T`.
    ///
    /// Document-level handlers run after all element handlers along the propagation path.
    fn add_listener<T, H>(&self, handler: H)
    where
        T: EventType,
        H: Fn(&Event<T>) + Send + Sync + 'static;
}

/// A handle to an element in a [`Document`].
pub trait Element: Send + Sync + 'static {
    /// Returns the id of the node this handle refers to.
    fn node_id(&self) -> NodeId;

    /// Returns whether the element is rendered.
    fn visibility(&self) -> Visibility;

    /// Shows or hides the element.
    fn set_visibility(&self, visibility: Visibility);

    /// Returns `true` if `node` is this element or one of its descendants.
    fn contains(&self, node: NodeId) -> bool;

    /// Registers a handler for events of kind `T` that reach this element.
    fn add_listener<T, H>(&self, handler: H)
    where
        T: EventType,
        H: Fn(&Event<T>) + Send + Sync + 'static;
}
