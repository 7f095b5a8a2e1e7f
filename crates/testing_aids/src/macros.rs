// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Asserts that the statement panics and evaluates to the panic payload.
///
/// Unwind safety is asserted, as `#[should_panic]` would.
#[macro_export]
macro_rules! assert_panic {
    ($stmt:stmt$(,)?) => {
        #[allow(clippy::multi_assignments, reason = "macro untidiness")]
        #[expect(clippy::allow_attributes, reason = "macro untidiness")]
        ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> () { _ = { $stmt } }))
            .expect_err("assert_panic! argument did not panic")
    };
}
