// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_ledger_persistence::PersistenceError;

/// Errors surfaced by KPI queries.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// The requested window is malformed.
    InvalidWindow(String),
    /// Loading the window from the tenant store failed.
    Persistence(PersistenceError),
}

impl std::fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow(reason) => write!(f, "Invalid analytics window: {reason}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AnalyticsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidWindow(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<PersistenceError> for AnalyticsError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}
