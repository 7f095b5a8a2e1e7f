// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Document, Element, Error, Event, EventType, Result, Visibility};

/// Locates the first element matching `selector` and wraps it with convenience capabilities.
///
/// An absent or empty selector yields `Ok(None)` without querying the document. Otherwise the
/// document is queried once.
///
/// # Errors
///
/// Returns an error if the selector cannot be parsed or if no element matches it. A lookup
/// miss is reported here rather than when a capability is first used.
///
/// # Examples
///
/// ```
/// use lowbar_dom::{Click, Element, ElementSpec, MemoryDocument, Visibility, augment};
///
/// let document = MemoryDocument::new();
/// document.append(document.body().node_id(), ElementSpec::new("div").id("banner"))?;
///
/// let banner = augment(&document, "#banner")?.expect("selector is not empty");
/// banner.hide();
/// assert_eq!(banner.element().visibility(), Visibility::Hidden);
///
/// banner.add_event::<Click, _>(|event| println!("banner clicked at {:?}", event.detail()));
///
/// assert!(augment(&document, None)?.is_none());
/// assert!(augment(&document, "")?.is_none());
/// # Ok::<(), lowbar_dom::Error>(())
/// ```
pub fn augment<'a, D>(document: &D, selector: impl Into<Option<&'a str>>) -> Result<Option<AugmentedElement<D::Element>>>
where
    D: Document + ?Sized,
{
    let Some(selector) = selector.into().filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match document.query_first(selector)? {
        Some(element) => {
            tracing::debug!(selector, "element augmented");
            Ok(Some(AugmentedElement::new(element)))
        }
        None => {
            tracing::debug!(selector, "no element to augment");
            Err(Error::no_match(selector))
        }
    }
}

/// An element extended with `show`, `hide` and typed event registration.
///
/// Created by [`augment`]. The wrapper holds the element handle. Wrapping the same node twice
/// gives two independent wrappers that act on the same node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedElement<E> {
    element: E,
}

impl<E: Element> AugmentedElement<E> {
    /// Wraps an element handle.
    pub fn new(element: E) -> Self {
        Self { element }
    }

    /// Makes the element visible.
    pub fn show(&self) {
        self.element.set_visibility(Visibility::Visible);
    }

    /// Hides the element.
    pub fn hide(&self) {
        self.element.set_visibility(Visibility::Hidden);
    }

    /// Registers `handler` for events of kind `T` that reach the element.
    ///
    /// Returns `self` so that registrations can be chained.
    pub fn add_event<T, H>(&self, handler: H) -> &Self
    where
        T: EventType,
        H: Fn(&Event<T>) + Send + Sync + 'static,
    {
        self.element.add_listener::<T, H>(handler);
        self
    }

    /// Returns the underlying element handle.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Unwraps the underlying element handle.
    pub fn into_inner(self) -> E {
        self.element
    }
}
