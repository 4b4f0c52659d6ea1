// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row models and their conversions to domain values.
//!
//! Dates are stored as ISO-8601 `TEXT` columns. On read, every line's
//! derived financial fields are re-derived through the domain calculator
//! from the stored inputs, so a domain `PeriodLine` can never carry a
//! forecast or balance that disagrees with its inputs.

use diesel::prelude::*;
use fleet_ledger_domain::{
    Client, ClientRef, Financials, LineCharges, LineFlags, Period, PeriodLine, PeriodStatus,
    Vehicle, VehicleRef, VehicleStatus,
};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{clients, period_lines, periods, vehicles};
use crate::error::PersistenceError;

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Formats a date into its stored ISO-8601 form.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(&DATE_FORMAT)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Parses a date from its stored ISO-8601 form.
///
/// # Errors
///
/// Returns an error if the stored value is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, &DATE_FORMAT).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid stored date {value:?}: {e}"))
    })
}

/// Formats a timestamp into its stored RFC 3339 form.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Parses a timestamp from its stored RFC 3339 form.
///
/// # Errors
///
/// Returns an error if the stored value is not a valid timestamp.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid stored timestamp {value:?}: {e}"))
    })
}

/// A `periods` row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct PeriodRow {
    pub id: i64,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub closed_at: Option<String>,
}

impl PeriodRow {
    /// Converts the stored row into a domain `Period`.
    ///
    /// # Errors
    ///
    /// Returns a reconstruction error if a stored date or status is
    /// invalid.
    pub fn into_domain(self) -> Result<Period, PersistenceError> {
        let start_date: Date = parse_date(&self.start_date)?;
        let status: PeriodStatus = PeriodStatus::parse(&self.status)?;
        let closed_at: Option<OffsetDateTime> = self
            .closed_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;
        Ok(Period::new(self.id, start_date, status, closed_at)?)
    }
}

/// Insertable form of a new `periods` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = periods)]
pub struct NewPeriod {
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub closed_at: Option<String>,
}

/// A `period_lines` row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct PeriodLineRow {
    pub id: i64,
    pub period_id: i64,
    pub vehicle_plate: String,
    pub client_id: Option<i64>,
    pub status: String,
    pub days_rented: f64,
    pub tariff: f64,
    pub daily_rate: f64,
    pub base_revenue: f64,
    pub premium: f64,
    pub protection: f64,
    pub agreement_fee: f64,
    pub invoice_fee: f64,
    pub discount: f64,
    pub forecast: f64,
    pub received: f64,
    pub balance: f64,
    pub signed: i32,
    pub invoiced: i32,
    pub reconciled: i32,
}

impl PeriodLineRow {
    /// Converts the stored row into a domain `PeriodLine`, re-deriving
    /// the financial fields from the stored inputs.
    ///
    /// # Errors
    ///
    /// Returns a reconstruction error if the stored status is invalid or
    /// the stored day count is negative.
    pub fn into_domain(self) -> Result<PeriodLine, PersistenceError> {
        let status: VehicleStatus = VehicleStatus::parse(&self.status)?;
        let charges: LineCharges = LineCharges {
            premium: self.premium,
            protection: self.protection,
            agreement_fee: self.agreement_fee,
            invoice_fee: self.invoice_fee,
            discount: self.discount,
        };
        let financials: Financials =
            Financials::derive(status, self.days_rented, self.tariff, &charges, self.received)?;
        Ok(PeriodLine {
            id: self.id,
            period_id: self.period_id,
            vehicle: VehicleRef::new(self.vehicle_plate),
            client: self.client_id.map(ClientRef),
            status,
            days_rented: self.days_rented,
            tariff: self.tariff,
            charges,
            received: self.received,
            flags: LineFlags {
                signed: self.signed != 0,
                invoiced: self.invoiced != 0,
                reconciled: self.reconciled != 0,
            },
            financials,
        })
    }
}

/// Insertable form of a new `period_lines` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = period_lines)]
pub struct NewPeriodLine {
    pub period_id: i64,
    pub vehicle_plate: String,
    pub client_id: Option<i64>,
    pub status: String,
    pub days_rented: f64,
    pub tariff: f64,
    pub daily_rate: f64,
    pub base_revenue: f64,
    pub premium: f64,
    pub protection: f64,
    pub agreement_fee: f64,
    pub invoice_fee: f64,
    pub discount: f64,
    pub forecast: f64,
    pub received: f64,
    pub balance: f64,
    pub signed: i32,
    pub invoiced: i32,
    pub reconciled: i32,
}

impl NewPeriodLine {
    /// Builds an insertable row from line inputs and calculator output.
    ///
    /// The financial columns are populated exclusively from the supplied
    /// `Financials`, keeping the calculator the only writer of derived
    /// values.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        period_id: i64,
        vehicle: &VehicleRef,
        client: Option<ClientRef>,
        status: VehicleStatus,
        days_rented: f64,
        tariff: f64,
        charges: &LineCharges,
        received: f64,
        flags: LineFlags,
        financials: &Financials,
    ) -> Self {
        Self {
            period_id,
            vehicle_plate: vehicle.as_str().to_string(),
            client_id: client.map(|c| c.0),
            status: status.as_str().to_string(),
            days_rented,
            tariff,
            daily_rate: financials.daily_rate(),
            base_revenue: financials.base_revenue(),
            premium: charges.premium,
            protection: charges.protection,
            agreement_fee: charges.agreement_fee,
            invoice_fee: charges.invoice_fee,
            discount: charges.discount,
            forecast: financials.forecast(),
            received,
            balance: financials.balance(),
            signed: i32::from(flags.signed),
            invoiced: i32::from(flags.invoiced),
            reconciled: i32::from(flags.reconciled),
        }
    }
}

/// A `vehicles` row as stored.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = vehicles)]
pub struct VehicleRow {
    pub plate: String,
    pub active: i32,
    pub base_tariff: f64,
}

impl VehicleRow {
    #[must_use]
    pub fn into_domain(self) -> Vehicle {
        Vehicle {
            plate: VehicleRef::new(self.plate),
            active: self.active != 0,
            base_tariff: self.base_tariff,
        }
    }
}

/// A `clients` row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct ClientRow {
    pub id: i64,
    pub name: String,
}

impl ClientRow {
    #[must_use]
    pub fn into_domain(self) -> Client {
        Client {
            id: self.id,
            name: self.name,
        }
    }
}
