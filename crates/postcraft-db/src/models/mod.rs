//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_log;
mod platform_profile;
mod prompt_template;
mod voice_profile;

pub use audit_log::AuditLogModel;
pub use platform_profile::PlatformProfileModel;
pub use prompt_template::PromptTemplateModel;
pub use voice_profile::VoiceProfileModel;
