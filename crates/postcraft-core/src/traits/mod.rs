//! Traits (ports) implemented by the infrastructure crates

mod generation;
mod repositories;

pub use generation::{Generation, GenerationClient, GenerationOptions, ResponseFormat, TokenUsage};
pub use repositories::{
    AuditLogRepository, AuditQuery, PlatformProfileRepository, PromptTemplateRepository,
    RepoResult, VoiceProfileRepository,
};
