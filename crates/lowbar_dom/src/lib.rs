// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Selector-based element augmentation and outside-click detection.
//!
//! The crate works against any document that implements the [`Document`] and [`Element`]
//! traits. [`MemoryDocument`] is an in-memory implementation for hosts without a browser
//! document and for tests.
//!
//! # Overview
//!
//! - [`augment`] - Locates an element by CSS selector and wraps it in an
//!   [`AugmentedElement`] with `show`, `hide` and typed event registration.
//! - [`click_outside`] - Calls back whenever a click lands outside a given element.
//! - [`EventType`] - Marker types such as [`Click`] and [`KeyDown`] that tie an event name
//!   to the detail payload its handlers receive.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! use lowbar_dom::{Click, Element, ElementSpec, MemoryDocument, Visibility, augment, click_outside};
//!
//! let document = MemoryDocument::new();
//! let body = document.body().node_id();
//! let button = document.append(body, ElementSpec::new("button").id("toggle"))?;
//! document.append(body, ElementSpec::new("ul").id("menu").visibility(Visibility::Hidden))?;
//!
//! let menu = Arc::new(augment(&document, "#menu")?.expect("selector is not empty"));
//!
//! let opener = Arc::clone(&menu);
//! augment(&document, "#toggle")?
//!     .expect("selector is not empty")
//!     .add_event::<Click, _>(move |event| {
//!         opener.show();
//!         event.stop_propagation();
//!     });
//!
//! let closer = Arc::clone(&menu);
//! click_outside(&document, menu.element().clone(), move |_| closer.hide());
//!
//! document.click(button.node_id())?;
//! assert_eq!(menu.element().visibility(), Visibility::Visible);
//!
//! document.click(body)?;
//! assert_eq!(menu.element().visibility(), Visibility::Hidden);
//! # Ok::<(), lowbar_dom::Error>(())
//! ```

mod augment;
mod click_outside;
mod document;
mod error;
mod events;
mod memory;
mod selector;

pub use augment::{AugmentedElement, augment};
pub use click_outside::click_outside;
pub use document::{Document, Element, NodeId, Visibility};
pub use error::{Error, Result};
pub use events::{
    Blur, Change, Click, ContextMenu, DblClick, Event, EventType, Focus, FocusDetail, Input, InputDetail, KeyDown, KeyPress,
    KeyUp, KeyboardDetail, MouseDetail, MouseDown, MouseOut, MouseOver, MouseUp, Reset, Scroll, Submit,
};
pub use memory::{ElementSpec, MemoryDocument, MemoryElement};
