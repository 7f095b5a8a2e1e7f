// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Click, Document, Element, Event};

/// Invokes `callback` for every click in `document` that lands outside `element`.
///
/// A click is outside when its target is neither `element` nor one of its descendants. The
/// check runs in a document-level click handler, so a handler that stops propagation earlier
/// on the path also suppresses the callback.
///
/// Every call registers a new, independent handler. Handlers cannot be removed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// use lowbar_dom::{Element, ElementSpec, MemoryDocument, click_outside};
///
/// let document = MemoryDocument::new();
/// let body = document.body().node_id();
/// let menu = document.append(body, ElementSpec::new("ul").id("menu"))?;
///
/// let closed = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&closed);
/// click_outside(&document, menu.clone(), move |_| flag.store(true, Ordering::SeqCst));
///
/// document.click(menu.node_id())?;
/// assert!(!closed.load(Ordering::SeqCst));
///
/// document.click(body)?;
/// assert!(closed.load(Ordering::SeqCst));
/// # Ok::<(), lowbar_dom::Error>(())
/// ```
pub fn click_outside<D, E, F>(document: &D, element: E, callback: F)
where
    D: Document + ?Sized,
    E: Element,
    F: Fn(&Event<Click>) + Send + Sync + 'static,
{
    document.add_listener::<Click, _>(move |event| {
        if element.contains(event.target()) {
            return;
        }

        tracing::trace!(node = event.target().as_raw(), "click landed outside element");
        callback(event);
    });
}

#[cfg(test)]
mod tests {
    use testing_aids::CallLog;

    use super::*;
    use crate::{ElementSpec, MemoryDocument, NodeId};

    #[test]
    fn fires_for_clicks_outside_only() {
        let document = MemoryDocument::new();
        let body = document.body().node_id();
        let menu = document.append(body, ElementSpec::new("ul")).unwrap();
        let item = document.append(menu.node_id(), ElementSpec::new("li")).unwrap();
        let other = document.append(body, ElementSpec::new("p")).unwrap();

        let calls = CallLog::new();
        let record = calls.recorder();
        click_outside(&document, menu.clone(), move |event: &Event<Click>| record(event.target()));

        document.click(menu.node_id()).unwrap();
        document.click(item.node_id()).unwrap();
        assert!(calls.is_empty());

        document.click(other.node_id()).unwrap();
        document.click(body).unwrap();
        assert_eq!(calls.snapshot(), [other.node_id(), body]);
    }

    #[test]
    fn each_registration_is_independent() {
        let document = MemoryDocument::new();
        let body = document.body().node_id();
        let panel = document.append(body, ElementSpec::new("div")).unwrap();

        let calls: CallLog<NodeId> = CallLog::new();
        for _ in 0..2 {
            let record = calls.recorder();
            click_outside(&document, panel.clone(), move |event: &Event<Click>| record(event.target()));
        }

        document.click(body).unwrap();

        assert_eq!(calls.len(), 2);
    }
}
