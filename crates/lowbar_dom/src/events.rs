// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::NodeId;

/// A kind of DOM event, identified by its name and carrying a typed detail payload.
///
/// Event kinds are zero-sized marker types such as [`Click`] or [`KeyDown`]. Handlers are
/// registered per kind and receive an [`Event`] whose detail has the kind's `Detail` type.
///
/// The built-in markers cover common input, focus, form and scroll events. Any other DOM event
/// can be handled by implementing this trait on a marker type of your own:
///
/// ```
/// use lowbar_dom::EventType;
///
/// #[derive(Debug)]
/// struct TouchStart;
///
/// impl EventType for TouchStart {
///     const NAME: &'static str = "touchstart";
///     type Detail = ();
/// }
/// ```
pub trait EventType: fmt::Debug + Send + Sync + 'static {
    /// The DOM event name, such as `"click"`.
    const NAME: &'static str;

    /// Data delivered with the event.
    type Detail: fmt::Debug + Default + Clone + Send + Sync + 'static;
}

macro_rules! event_types {
    ($($(#[$meta:meta])* $marker:ident => $name:literal, $detail:ty;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $marker;

            impl EventType for $marker {
                const NAME: &'static str = $name;
                type Detail = $detail;
            }
        )*
    };
}

event_types! {
    /// A primary button click.
    Click => "click", MouseDetail;
    /// A double click.
    DblClick => "dblclick", MouseDetail;
    /// A mouse button was pressed.
    MouseDown => "mousedown", MouseDetail;
    /// A mouse button was released.
    MouseUp => "mouseup", MouseDetail;
    /// The pointer moved onto an element.
    MouseOver => "mouseover", MouseDetail;
    /// The pointer moved off an element.
    MouseOut => "mouseout", MouseDetail;
    /// A context menu was requested, usually with the secondary button.
    ContextMenu => "contextmenu", MouseDetail;
    /// A key was pressed.
    KeyDown => "keydown", KeyboardDetail;
    /// A key was released.
    KeyUp => "keyup", KeyboardDetail;
    /// A key producing a character was pressed.
    KeyPress => "keypress", KeyboardDetail;
    /// The value of a form control changed while being edited.
    Input => "input", InputDetail;
    /// The value of a form control was committed.
    Change => "change", InputDetail;
    /// An element received focus.
    Focus => "focus", FocusDetail;
    /// An element lost focus.
    Blur => "blur", FocusDetail;
    /// A form was submitted.
    Submit => "submit", ();
    /// A form was reset.
    Reset => "reset", ();
    /// An element or the document was scrolled.
    Scroll => "scroll", ();
}

/// Pointer position and button of a mouse event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseDetail {
    /// Horizontal position in the viewport.
    pub client_x: i32,

    /// Vertical position in the viewport.
    pub client_y: i32,

    /// The button number, where 0 is the primary button.
    pub button: u16,
}

/// The key of a keyboard event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardDetail {
    /// The key value, such as `"Enter"` or `"a"`.
    pub key: String,

    /// `true` if the key is held down and the event is auto-repeating.
    pub repeat: bool,
}

/// The value of a form control after an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDetail {
    /// The current value of the control.
    pub value: String,
}

/// The other node involved in a focus change, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusDetail {
    /// The node losing focus on `focus`, or gaining it on `blur`.
    pub related_target: Option<NodeId>,
}

/// An event being delivered to handlers.
///
/// The same event is passed to every handler along the propagation path, so a handler that
/// calls [`stop_propagation`][Self::stop_propagation] affects the ones that would run after
/// the current node.
#[derive(Debug)]
pub struct Event<T: EventType> {
    target: NodeId,
    detail: T::Detail,
    propagation_stopped: AtomicBool,
}

impl<T: EventType> Event<T> {
    /// Creates an event aimed at `target`.
    #[must_use]
    pub fn new(target: NodeId, detail: T::Detail) -> Self {
        Self {
            target,
            detail,
            propagation_stopped: AtomicBool::new(false),
        }
    }

    /// Returns the DOM name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        T::NAME
    }

    /// Returns the node the event was dispatched to.
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the typed payload of the event.
    #[must_use]
    pub fn detail(&self) -> &T::Detail {
        &self.detail
    }

    /// Prevents delivery to nodes after the current one, including document-level handlers.
    ///
    /// Handlers registered on the current node still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once a handler has called [`stop_propagation`][Self::stop_propagation].
    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::Relaxed)
    }
}
