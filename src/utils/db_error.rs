//! Helpers for classifying PostgreSQL errors.

/// Primary key constraint on `links.key`.
pub const LINKS_KEY_CONSTRAINT: &str = "links_pkey";

/// Returns true if the error is a unique violation on the link key.
pub fn is_unique_violation_on_key(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(LINKS_KEY_CONSTRAINT))
}
