// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! An unpublished crate containing testing utilities for use within this repo.

mod calls;
mod log;
mod macros;

pub use calls::*;
pub use log::*;
