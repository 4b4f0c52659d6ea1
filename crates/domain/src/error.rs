// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Tenant identifier is empty or contains characters that are not
    /// safe for a per-tenant storage path.
    InvalidTenantId(String),
    /// Vehicle status string is not one of the recognized states.
    InvalidVehicleStatus(String),
    /// Period status string is not one of the recognized states.
    InvalidPeriodStatus(String),
    /// Days rented must be non-negative.
    NegativeDaysRented {
        /// The invalid value.
        days: f64,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTenantId(id) => write!(f, "Invalid tenant identifier: {id:?}"),
            Self::InvalidVehicleStatus(status) => {
                write!(f, "Invalid vehicle status: {status:?}")
            }
            Self::InvalidPeriodStatus(status) => {
                write!(f, "Invalid period status: {status:?}")
            }
            Self::NegativeDaysRented { days } => {
                write!(f, "Days rented must be non-negative, got {days}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow: {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
