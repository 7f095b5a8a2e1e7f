// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;

/// The result for fallible store and memoization operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised by a [`CacheStore`][crate::CacheStore] and surfaced through a memoized call.
///
/// Errors from a store propagate unchanged to the caller of
/// [`Memoized::call`][crate::Memoized::call]. The memoizer never retries and never swallows them.
///
/// # Introspection is limited
///
/// Other than implementing [`std::error::Error`] and [`core::fmt::Debug`], this error type
/// provides no introspection capabilities. The underlying cause is available through
/// [`std::error::Error::source`].
///
/// # Examples
///
/// ```
/// use lowbar_memo::Error;
///
/// let error = Error::from_message("store is read-only");
/// assert_eq!(error.to_string(), "store is read-only");
/// ```
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorKind {
    #[error("{0}")]
    Message(Cow<'static, str>),

    #[error(transparent)]
    Store(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Creates an error that carries only a message.
    pub fn from_message(message: impl Into<Cow<'static, str>>) -> Self {
        Self(ErrorKind::Message(message.into()))
    }

    /// Wraps an error produced by a custom store backend.
    pub fn from_store(cause: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(ErrorKind::Store(cause.into()))
    }

    #[cfg(test)]
    pub(crate) const fn kind(&self) -> &ErrorKind {
        &self.0
    }
}
