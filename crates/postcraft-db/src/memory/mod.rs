//! In-memory repository implementations
//!
//! Same contracts as the PostgreSQL repositories, backed by `parking_lot`
//! locks. Each mutation holds one write lock for its whole
//! read-check-write sequence, which stands in for the row lock and
//! transaction the database versions use. Used by tests and by local runs
//! without a database.

mod audit_log;
mod store;
mod versioned;

pub use audit_log::InMemoryAuditLogRepository;
pub use versioned::{
    InMemoryPlatformProfileRepository, InMemoryPromptTemplateRepository,
    InMemoryVoiceProfileRepository,
};
