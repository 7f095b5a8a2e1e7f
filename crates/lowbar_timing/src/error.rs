// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// The result for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur when setting up a scheduler.
///
/// # Introspection is limited
///
/// Other than implementing [`std::error::Error`] and [`core::fmt::Debug`], this error type
/// currently offers only [`Error::is_no_runtime`].
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorKind {
    #[error("no async runtime is available on this thread: {0}")]
    NoRuntime(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Creates an error reporting that no async runtime is available.
    ///
    /// Custom [`Scheduler`][crate::Scheduler] implementations bound to a runtime can use it
    /// when constructed outside of one.
    pub fn no_runtime(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(ErrorKind::NoRuntime(Box::new(cause)))
    }

    /// Returns `true` if the error was caused by the absence of an async runtime.
    #[must_use]
    pub fn is_no_runtime(&self) -> bool {
        matches!(self.0, ErrorKind::NoRuntime(_))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(Error: Send, Sync, std::error::Error);
    }

    #[test]
    fn no_runtime_error() {
        let error = Error::no_runtime(io::Error::other("not inside a runtime"));

        assert!(error.is_no_runtime());
        assert_eq!(
            error.to_string(),
            "no async runtime is available on this thread: not inside a runtime"
        );
    }
}
