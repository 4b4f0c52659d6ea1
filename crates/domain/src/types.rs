// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::rental::Financials;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

/// Number of days covered by a weekly period, inclusive of the start day.
pub(crate) const PERIOD_SPAN_DAYS: i64 = 6;

/// Identifier of one rental company account.
///
/// Each tenant owns exactly one isolated physical store, so the
/// identifier must be usable as a directory name. Validation rejects
/// empty identifiers and path-hostile characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a validated tenant identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTenantId` if the identifier is empty
    /// or contains characters other than ASCII alphanumerics, `-` or `_`.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id: String = id.into().trim().to_string();
        if id.is_empty() {
            return Err(DomainError::InvalidTenantId(id));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidTenantId(id));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a vehicle by its plate, the natural key the ledger uses.
///
/// Plates are normalized to uppercase with surrounding whitespace removed
/// so equality behaves the same regardless of entry casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleRef(String);

impl VehicleRef {
    #[must_use]
    pub fn new(plate: impl Into<String>) -> Self {
        Self(plate.into().trim().to_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VehicleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a client by its canonical identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientRef(pub i64);

impl std::fmt::Display for ClientRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimal vehicle shape the ledger consumes from the fleet registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// The vehicle plate.
    pub plate: VehicleRef,
    /// Whether the vehicle is part of the active fleet.
    pub active: bool,
    /// Base weekly rental tariff.
    pub base_tariff: f64,
}

/// Minimal client shape, used for line attribution only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
}

/// Lifecycle status of a weekly period.
///
/// `Closed` is terminal: no financial field of the period or its lines
/// may change afterwards, and no reopen transition is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodStatus {
    Open,
    Closed,
}

impl PeriodStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Parses a period status from its stored string form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPeriodStatus` for unknown values.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(DomainError::InvalidPeriodStatus(other.to_string())),
        }
    }
}

/// Rental status of one vehicle within a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Actively rented to a client; the line's negotiated terms hold.
    Rented,
    /// In the lot, available for rental.
    Available,
    /// Out of service for maintenance.
    Maintenance,
    /// Awaiting back-office review before it can be rented again.
    PendingReview,
}

impl VehicleStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rented => "rented",
            Self::Available => "available",
            Self::Maintenance => "maintenance",
            Self::PendingReview => "pending-review",
        }
    }

    /// Parses a vehicle status from its stored string form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidVehicleStatus` for unknown values.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "rented" => Ok(Self::Rented),
            "available" => Ok(Self::Available),
            "maintenance" => Ok(Self::Maintenance),
            "pending-review" => Ok(Self::PendingReview),
            other => Err(DomainError::InvalidVehicleStatus(other.to_string())),
        }
    }
}

/// Named administrative flags on a period line.
///
/// The source system tracked these as opaque two-letter booleans; here
/// they carry their meaning in the field name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFlags {
    /// The rental agreement has been signed.
    pub signed: bool,
    /// An invoice has been issued for the line.
    pub invoiced: bool,
    /// Payments for the line have been reconciled.
    pub reconciled: bool,
}

/// Surcharges and discount applied on top of a line's base revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineCharges {
    /// Premium vehicle surcharge.
    pub premium: f64,
    /// Damage protection surcharge.
    pub protection: f64,
    /// Agreement handling fee.
    pub agreement_fee: f64,
    /// Invoice issuing fee.
    pub invoice_fee: f64,
    /// Commercial discount, subtracted from the forecast.
    pub discount: f64,
}

/// One weekly billing cycle for a tenant's fleet.
///
/// The end date is always `start_date + 6 days`; it is derived at
/// construction and cannot be set independently. Serialize-only, like
/// [`PeriodLine`]: a deserialized payload could otherwise carry an end
/// date that disagrees with its start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    id: i64,
    start_date: Date,
    end_date: Date,
    status: PeriodStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    closed_at: Option<OffsetDateTime>,
}

impl Period {
    /// Creates a period spanning the week that begins on `start_date`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` if the end date
    /// cannot be represented.
    pub fn new(
        id: i64,
        start_date: Date,
        status: PeriodStatus,
        closed_at: Option<OffsetDateTime>,
    ) -> Result<Self, DomainError> {
        let end_date: Date = start_date
            .checked_add(Duration::days(PERIOD_SPAN_DAYS))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("{start_date} + {PERIOD_SPAN_DAYS} days"),
            })?;
        Ok(Self {
            id,
            start_date,
            end_date,
            status,
            closed_at,
        })
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    #[must_use]
    pub const fn start_date(&self) -> Date {
        self.start_date
    }

    #[must_use]
    pub const fn end_date(&self) -> Date {
        self.end_date
    }

    #[must_use]
    pub const fn status(&self) -> PeriodStatus {
        self.status
    }

    #[must_use]
    pub const fn closed_at(&self) -> Option<OffsetDateTime> {
        self.closed_at
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.status, PeriodStatus::Closed)
    }

    /// Whether the period's billing window has already elapsed.
    #[must_use]
    pub fn has_elapsed(&self, today: Date) -> bool {
        self.end_date < today
    }
}

/// A period together with all of its lines, as returned by the ledger's
/// read operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodWithLines {
    pub period: Period,
    pub lines: Vec<PeriodLine>,
}

/// One vehicle's record within a period.
///
/// Derived financial fields live in [`Financials`] and can only be
/// produced by the rental calculator, never set directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodLine {
    pub id: i64,
    pub period_id: i64,
    pub vehicle: VehicleRef,
    pub client: Option<ClientRef>,
    pub status: VehicleStatus,
    pub days_rented: f64,
    /// Weekly tariff carried from the vehicle or the prior week's line.
    pub tariff: f64,
    pub charges: LineCharges,
    pub received: f64,
    pub flags: LineFlags,
    pub financials: Financials,
}
