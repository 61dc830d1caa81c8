//! # Error Taxonomy
//!
//! Two layers of errors flow through the crate:
//!
//! - [`RepositoryError`] is raised by the persistence collaborators. It separates
//!   transient infrastructure failures (which count against the circuit breaker
//!   and may be retried) from integrity-constraint violations (which never are).
//! - [`ServiceError`] is what the service layer hands to its callers. The API
//!   layer maps each variant onto a transport status.

use crate::database::error_codes::PgErrorCode;
use crate::resilience::{CircuitBreakerError, FailureClassification};
use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by a persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Connectivity loss, timeout, pool exhaustion, deadlock or serialization failure
    #[error("Transient database failure: {message}")]
    Transient { message: String },

    /// A unique index rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign key rejected the write (referenced row missing)
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A CHECK / NOT NULL constraint rejected the write
    #[error("Check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    /// Anything else the driver reported
    #[error("Database error: {message}")]
    Other { message: String },
}

impl RepositoryError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the failure is one of the whitelisted transient kinds
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Whether the failure is a unique, foreign-key or check violation
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Self::UniqueViolation { .. }
                | Self::ForeignKeyViolation { .. }
                | Self::CheckViolation { .. }
        )
    }
}

impl FailureClassification for RepositoryError {
    fn is_transient(&self) -> bool {
        RepositoryError::is_transient(self)
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();

                if PgErrorCode::is_unique_violation(&code) {
                    Self::UniqueViolation { constraint }
                } else if PgErrorCode::is_foreign_key_violation(&code) {
                    Self::ForeignKeyViolation { constraint }
                } else if PgErrorCode::is_integrity_constraint_violation(&code) {
                    Self::CheckViolation { constraint }
                } else if PgErrorCode::is_transient(&code) {
                    Self::transient(db_err.message().to_string())
                } else {
                    Self::other(db_err.message().to_string())
                }
            }
            sqlx::Error::Io(io_err) => Self::transient(io_err.to_string()),
            sqlx::Error::PoolTimedOut => Self::transient("connection pool timed out"),
            sqlx::Error::PoolClosed => Self::transient("connection pool closed"),
            sqlx::Error::WorkerCrashed => Self::transient("database worker crashed"),
            other => Self::other(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Outcomes surfaced by the entity services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    BusinessRuleViolation { message: String },

    /// Field-level payload validation failed
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error(
        "Circuit breaker '{component}' is open; retry after {:.1}s",
        .retry_after.as_secs_f64()
    )]
    CircuitOpen {
        component: String,
        retry_after: Duration,
    },

    /// Unclassified persistence failure
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<CircuitBreakerError<RepositoryError>> for ServiceError {
    fn from(err: CircuitBreakerError<RepositoryError>) -> Self {
        match err {
            CircuitBreakerError::CircuitOpen {
                component,
                retry_after,
            } => Self::CircuitOpen {
                component,
                retry_after,
            },
            CircuitBreakerError::OperationFailed(inner) => Self::Repository(inner),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(RepositoryError::transient("connection reset").is_transient());
        assert!(!RepositoryError::other("syntax error").is_transient());
        assert!(!RepositoryError::UniqueViolation {
            constraint: "investors_email_key".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_integrity_grouping() {
        let fk = RepositoryError::ForeignKeyViolation {
            constraint: "investments_fund_id_fkey".to_string(),
        };
        assert!(fk.is_integrity_violation());
        assert!(!RepositoryError::transient("timeout").is_integrity_violation());
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let err = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_transient());
    }

    #[test]
    fn test_circuit_open_maps_to_service_error() {
        let err: ServiceError = CircuitBreakerError::<RepositoryError>::CircuitOpen {
            component: "database".to_string(),
            retry_after: Duration::from_secs(12),
        }
        .into();

        match err {
            ServiceError::CircuitOpen {
                component,
                retry_after,
            } => {
                assert_eq!(component, "database");
                assert_eq!(retry_after, Duration::from_secs(12));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("Fund", "abc");
        assert_eq!(err.to_string(), "Fund with id 'abc' not found");
    }
}
