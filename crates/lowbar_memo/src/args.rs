// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Derives the default cache key of a memoized call: its first positional argument.
///
/// Memoized functions take their arguments as a single value. Functions of several
/// arguments take a tuple, and only the first element contributes to the default key;
/// supply a resolver through [`memoize_by`][crate::memoize_by] when later arguments must
/// distinguish calls. Scalars and strings are their own first argument.
///
/// # Examples
///
/// ```
/// use lowbar_memo::FirstArg;
///
/// assert_eq!((7_u32, "ignored").first_arg(), 7);
/// assert_eq!(String::from("key").first_arg(), "key");
/// ```
pub trait FirstArg {
    /// The type of the first argument.
    type First;

    /// Returns a copy of the first argument.
    fn first_arg(&self) -> Self::First;
}

macro_rules! impl_first_arg_for_tuple {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Clone $(, $rest)*> FirstArg for ($first, $($rest,)*) {
            type First = $first;

            fn first_arg(&self) -> $first {
                self.0.clone()
            }
        }
    };
}

impl_first_arg_for_tuple!(A);
impl_first_arg_for_tuple!(A, B);
impl_first_arg_for_tuple!(A, B, C);
impl_first_arg_for_tuple!(A, B, C, D);
impl_first_arg_for_tuple!(A, B, C, D, E);
impl_first_arg_for_tuple!(A, B, C, D, E, F);

macro_rules! impl_first_arg_for_self {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FirstArg for $ty {
                type First = $ty;

                fn first_arg(&self) -> $ty {
                    self.clone()
                }
            }
        )*
    };
}

impl_first_arg_for_self!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, String, &'static str,
);
