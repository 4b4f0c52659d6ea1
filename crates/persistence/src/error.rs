// Copyright (C) 2026 Fleet Ledger Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// No usable tenant identifier was supplied.
    TenantNotFound(String),
    /// The tenant's isolated store could not be created or opened.
    StorageUnavailable(String),
    /// Schema binding referenced an entity or relationship that does not
    /// exist in the physical schema. Indicates a deployment defect.
    SchemaBindError(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A database error occurred.
    DatabaseError(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A period with this start date already exists for the tenant.
    DuplicatePeriod {
        /// The conflicting start date, in ISO-8601 form.
        start_date: String,
    },
    /// The requested period was not found.
    PeriodNotFound(i64),
    /// The requested period line was not found.
    LineNotFound(i64),
    /// The period is closed; its financial state is frozen.
    PeriodClosed(i64),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TenantNotFound(id) => write!(f, "Tenant not found: {id:?}"),
            Self::StorageUnavailable(msg) => write!(f, "Tenant storage unavailable: {msg}"),
            Self::SchemaBindError(msg) => write!(f, "Schema bind error: {msg}"),
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Row reconstruction error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::DuplicatePeriod { start_date } => {
                write!(f, "A period starting on {start_date} already exists")
            }
            Self::PeriodNotFound(id) => write!(f, "Period not found: {id}"),
            Self::LineNotFound(id) => write!(f, "Period line not found: {id}"),
            Self::PeriodClosed(id) => {
                write!(f, "Period {id} is closed and cannot be modified")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<fleet_ledger_domain::DomainError> for PersistenceError {
    fn from(err: fleet_ledger_domain::DomainError) -> Self {
        Self::ReconstructionError(err.to_string())
    }
}
