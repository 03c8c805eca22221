//! Shared mapping from Diesel and pool failures to contact repository errors.
//!
//! Unique-constraint violations are recognised by constraint name so a race
//! the duplicate pre-check missed still surfaces as the same conflict shape.

use tracing::debug;

use crate::domain::ports::ContactRepositoryError;

use super::pool::PoolError;

/// Named constraint enforcing per-owner email uniqueness.
pub const OWNER_EMAIL_CONSTRAINT: &str = "contacts_owner_email_key";

/// Named constraint enforcing per-owner phone uniqueness.
pub const OWNER_PHONE_CONSTRAINT: &str = "contacts_owner_phone_key";

/// Map pool errors to domain contact repository errors.
pub(super) fn map_pool_error(error: PoolError) -> ContactRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ContactRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain contact repository errors.
///
/// A unique violation on the email constraint becomes
/// [`ContactRepositoryError::DuplicateEmail`]; any other unique violation is
/// reported as an integrity failure naming the constraint.
pub(super) fn map_diesel_error(error: diesel::result::Error) -> ContactRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => ContactRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ContactRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match info.constraint_name() {
                Some(OWNER_EMAIL_CONSTRAINT) => ContactRepositoryError::DuplicateEmail,
                Some(constraint) => ContactRepositoryError::integrity(constraint),
                None => ContactRepositoryError::integrity("unknown unique constraint"),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ContactRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => ContactRepositoryError::query("database error"),
        _ => ContactRepositoryError::query("database error"),
    }
}

impl From<diesel::result::Error> for ContactRepositoryError {
    fn from(error: diesel::result::Error) -> Self {
        map_diesel_error(error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    /// Minimal error payload carrying a constraint name, as PostgreSQL does.
    struct ConstraintViolation(&'static str);

    impl DatabaseErrorInformation for ConstraintViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("contacts")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(
            repo_err,
            ContactRepositoryError::Connection { .. }
        ));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(DieselError::NotFound);

        assert!(matches!(repo_err, ContactRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn email_constraint_violation_maps_to_duplicate_email() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintViolation(OWNER_EMAIL_CONSTRAINT)),
        );

        let repo_err = map_diesel_error(diesel_err);

        assert_eq!(repo_err, ContactRepositoryError::DuplicateEmail);
    }

    #[rstest]
    fn phone_constraint_violation_maps_to_integrity_error() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintViolation(OWNER_PHONE_CONSTRAINT)),
        );

        let repo_err = map_diesel_error(diesel_err);

        assert_eq!(
            repo_err,
            ContactRepositoryError::integrity(OWNER_PHONE_CONSTRAINT)
        );
    }

    #[rstest]
    fn anonymous_unique_violation_maps_to_integrity_error() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );

        let repo_err = map_diesel_error(diesel_err);

        assert!(matches!(repo_err, ContactRepositoryError::Integrity { .. }));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );

        let repo_err = map_diesel_error(diesel_err);

        assert!(matches!(
            repo_err,
            ContactRepositoryError::Connection { .. }
        ));
    }
}
