//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in
//! postcraft-core. Config repositories run every version change in one
//! transaction with the current row locked `FOR UPDATE`.

mod audit_log;
mod error;
mod platform_profile;
mod prompt_template;
mod voice_profile;

pub use audit_log::PgAuditLogRepository;
pub use platform_profile::PgPlatformProfileRepository;
pub use prompt_template::PgPromptTemplateRepository;
pub use voice_profile::PgVoiceProfileRepository;
