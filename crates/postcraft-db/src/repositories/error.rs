//! Error handling utilities for repositories

use postcraft_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Unique violation on a versioned profile table
///
/// The default indexes (`*_owner_default`, `*_system_default`) mean a
/// concurrent writer set another default; any other index means the
/// lineage moved on.
pub fn map_profile_violation(
    e: SqlxError,
    entity: &'static str,
    lineage_id: impl ToString,
) -> DomainError {
    let default_clash = e
        .as_database_error()
        .and_then(|db_err| db_err.constraint())
        .is_some_and(is_default_index);
    if default_clash {
        return DomainError::DefaultConflict { entity };
    }
    map_unique_violation(e, || stale_version(entity, lineage_id))
}

fn is_default_index(constraint: &str) -> bool {
    constraint.ends_with("_owner_default") || constraint.ends_with("_system_default")
}

/// Row exists but was superseded or deactivated
pub fn stale_version(entity: &'static str, id: impl ToString) -> DomainError {
    DomainError::StaleVersion {
        entity,
        id: id.to_string(),
    }
}
