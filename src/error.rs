// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures scoped to a single user action. None of these are fatal to the
/// process; commands report them inline and return cleanly.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Delete blocked by a foreign reference (account/category still in use).
    #[error("{0}")]
    Integrity(String),

    /// Login or row id absent.
    #[error("{0}")]
    NotFound(String),

    /// Rejected before any write: empty required field, non-positive amount,
    /// mismatched password confirmation.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
