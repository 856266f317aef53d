//! Entity to model mappers
//!
//! This module provides conversions between domain entities (postcraft-core)
//! and database models.
//! - `TryFrom<Model> for Entity`: Convert database rows to domain objects;
//!   enum columns and JSON documents are validated on the way in
//! - `*Insert` structs: Prepare entity data for database inserts

mod audit_log;
mod platform_profile;
mod prompt_template;
mod voice_profile;

use postcraft_core::DomainError;

pub use audit_log::AuditLogInsert;
pub use platform_profile::PlatformProfileInsert;
pub use prompt_template::PromptTemplateInsert;
pub use voice_profile::VoiceProfileInsert;

/// A stored value that no longer matches the domain type
fn corrupt_column(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::DatabaseError(format!("invalid {column} column: {err}"))
}
