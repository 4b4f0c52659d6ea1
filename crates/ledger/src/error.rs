// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_ledger_domain::DomainError;
use fleet_ledger_persistence::PersistenceError;

/// Errors surfaced by the weekly ledger lifecycle.
///
/// Infrastructure failures (`TenantNotFound`, `StorageUnavailable`,
/// `SchemaBindError`) arrive wrapped in `Persistence` and abort the
/// request; domain failures (`DuplicatePeriod`, `PeriodNotFound`,
/// `PeriodClosed`) are client-addressable.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// A domain validation or calculation failed.
    Domain(DomainError),
    /// A persistence operation failed.
    Persistence(PersistenceError),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<DomainError> for LedgerError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PersistenceError> for LedgerError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}
