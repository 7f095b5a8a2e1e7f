// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;

use crate::NodeId;

/// The result for fallible document operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur when locating or addressing elements.
///
/// # Examples
///
/// ```
/// use lowbar_dom::{MemoryDocument, augment};
///
/// let document = MemoryDocument::new();
/// let error = augment(&document, "#missing").unwrap_err();
///
/// assert!(error.is_no_match());
/// assert_eq!(error.selector(), Some("#missing"));
/// ```
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorKind {
    #[error("no element matches selector '{selector}'")]
    NoMatch { selector: String },

    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        selector: String,
        reason: Cow<'static, str>,
    },

    #[error("node {0:?} does not belong to this document")]
    UnknownNode(NodeId),
}

impl Error {
    /// Creates an error reporting that no element matches `selector`.
    pub fn no_match(selector: impl Into<String>) -> Self {
        Self(ErrorKind::NoMatch { selector: selector.into() })
    }

    /// Creates an error reporting that `selector` cannot be parsed.
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self(ErrorKind::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        })
    }

    /// Creates an error reporting that `node` is not part of the document.
    #[must_use]
    pub fn unknown_node(node: NodeId) -> Self {
        Self(ErrorKind::UnknownNode(node))
    }

    /// Returns `true` if a selector was valid but matched nothing.
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self.0, ErrorKind::NoMatch { .. })
    }

    /// Returns `true` if a selector could not be parsed.
    #[must_use]
    pub fn is_invalid_selector(&self) -> bool {
        matches!(self.0, ErrorKind::InvalidSelector { .. })
    }

    /// Returns `true` if a node id was not part of the document.
    #[must_use]
    pub fn is_unknown_node(&self) -> bool {
        matches!(self.0, ErrorKind::UnknownNode(_))
    }

    /// Returns the selector that caused the error, if the error concerns a selector.
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match &self.0 {
            ErrorKind::NoMatch { selector } | ErrorKind::InvalidSelector { selector, .. } => Some(selector),
            ErrorKind::UnknownNode(_) => None,
        }
    }
}
