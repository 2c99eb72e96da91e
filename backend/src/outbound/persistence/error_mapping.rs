//! Shared Diesel and pool error mapping for the repositories.
//!
//! Each repository supplies its own constructors, so the classification of
//! Diesel failures lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Unique constraint guarding `users.username`.
pub(crate) const USERS_USERNAME_KEY: &str = "users_username_key";
/// Unique constraint guarding `users.email`.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";

/// Column a unique violation was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UniqueTarget {
    Username,
    Email,
    Other,
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Failure categories a repository distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    Connection(&'static str),
    Query(&'static str),
    UniqueViolation(UniqueTarget),
}

/// Identify which unique constraint fired, by name first and then by the
/// server message.
fn unique_target(message: &str, constraint_name: Option<&str>) -> UniqueTarget {
    match constraint_name {
        Some(USERS_EMAIL_KEY) => return UniqueTarget::Email,
        Some(USERS_USERNAME_KEY) => return UniqueTarget::Username,
        _ => {}
    }
    let lower = message.to_lowercase();
    if lower.contains("email") {
        UniqueTarget::Email
    } else if lower.contains("username") {
        UniqueTarget::Username
    } else {
        UniqueTarget::Other
    }
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(unique_target(info.message(), info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        _ => DieselFailure::Query("database error"),
    }
}
