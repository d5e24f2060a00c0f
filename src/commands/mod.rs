// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod categories;
pub mod transactions;
pub mod reports;
pub mod exporter;
pub mod admin;

use crate::error::LedgerError;
use anyhow::Result;

/// Integrity/not-found/validation failures are scoped to the single action
/// that triggered them: report inline and carry on. Anything else propagates.
pub(crate) fn inline<T>(res: Result<T, LedgerError>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(
            e @ (LedgerError::Integrity(_) | LedgerError::NotFound(_) | LedgerError::Validation(_)),
        ) => {
            eprintln!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
