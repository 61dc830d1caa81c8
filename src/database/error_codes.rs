//! PostgreSQL Error Codes
//!
//! SQLSTATE constants used to classify driver errors into the crate's
//! [`RepositoryError`](crate::error::RepositoryError) taxonomy.
//!
//! ## SQLSTATE Format
//!
//! - 5-character codes
//! - First 2 characters: error class
//! - Last 3 characters: specific condition
//!
//! ## Reference
//!
//! Full list: <https://www.postgresql.org/docs/current/errcodes-appendix.html>

/// PostgreSQL SQLSTATE error codes
///
/// Only codes the repositories actually react to are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PgErrorCode;

impl PgErrorCode {
    // =========================================================================
    // Class 08 - Connection Exception
    // =========================================================================

    /// Connection exception class prefix
    pub const CONNECTION_EXCEPTION_CLASS: &'static str = "08";

    // =========================================================================
    // Class 23 - Integrity Constraint Violation
    // =========================================================================

    /// Unique violation (duplicate key) - Code 23505
    ///
    /// Raised when two concurrent investor registrations race past the
    /// email pre-check.
    pub const UNIQUE_VIOLATION: &'static str = "23505";

    /// Foreign key violation - Code 23503
    ///
    /// Raised when an investment references a fund or investor that no
    /// longer exists.
    pub const FOREIGN_KEY_VIOLATION: &'static str = "23503";

    /// Not null violation - Code 23502
    pub const NOT_NULL_VIOLATION: &'static str = "23502";

    /// Check constraint violation - Code 23514
    pub const CHECK_VIOLATION: &'static str = "23514";

    // =========================================================================
    // Class 40 - Transaction Rollback
    // =========================================================================

    /// Serialization failure - Code 40001
    pub const SERIALIZATION_FAILURE: &'static str = "40001";

    /// Deadlock detected - Code 40P01
    pub const DEADLOCK_DETECTED: &'static str = "40P01";

    // =========================================================================
    // Class 53 / 57 - Resources and Operator Intervention
    // =========================================================================

    /// Too many connections - Code 53300
    pub const TOO_MANY_CONNECTIONS: &'static str = "53300";

    /// Query canceled (statement timeout) - Code 57014
    pub const QUERY_CANCELED: &'static str = "57014";

    /// Admin shutdown - Code 57P01
    pub const ADMIN_SHUTDOWN: &'static str = "57P01";

    /// Cannot connect now (server starting up) - Code 57P03
    pub const CANNOT_CONNECT_NOW: &'static str = "57P03";

    // =========================================================================
    // Helper Methods
    // =========================================================================

    #[inline]
    pub fn is_unique_violation(code: &str) -> bool {
        code == Self::UNIQUE_VIOLATION
    }

    #[inline]
    pub fn is_foreign_key_violation(code: &str) -> bool {
        code == Self::FOREIGN_KEY_VIOLATION
    }

    /// Any integrity constraint violation (Class 23)
    #[inline]
    pub fn is_integrity_constraint_violation(code: &str) -> bool {
        code.starts_with("23")
    }

    /// Serialization failure or deadlock
    #[inline]
    pub fn is_retryable_transaction_error(code: &str) -> bool {
        code == Self::SERIALIZATION_FAILURE || code == Self::DEADLOCK_DETECTED
    }

    /// Failures that say nothing about the request itself and may succeed
    /// on a later attempt: lost connections, timeouts, overload, shutdown,
    /// deadlocks and serialization failures.
    #[inline]
    pub fn is_transient(code: &str) -> bool {
        code.starts_with(Self::CONNECTION_EXCEPTION_CLASS)
            || Self::is_retryable_transaction_error(code)
            || matches!(
                code,
                Self::TOO_MANY_CONNECTIONS
                    | Self::QUERY_CANCELED
                    | Self::ADMIN_SHUTDOWN
                    | Self::CANNOT_CONNECT_NOW
            )
    }
}
