// SPDX-License-Identifier: MIT

//! Usage errors.
//!
//! Only caller mistakes about spinner *names* are errors. Bad option values
//! are not: they are dropped field by field during validation and the
//! previous value stays in place (see [`crate::purge`]).

use thiserror::Error;

/// A group operation was called with a name it cannot act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinnerError {
    /// The name was empty.
    #[error("A spinner reference name must be specified")]
    MissingName,

    /// `add` was called with a name already in the group.
    #[error("A spinner with name {0} already exists")]
    AlreadyExists(String),

    /// The name is not in the group (never added, removed, or the group
    /// drained and cleared its entries).
    #[error("No spinner initialized with name {0}")]
    NotFound(String),
}

pub type Result<T, E = SpinnerError> = std::result::Result<T, E>;
