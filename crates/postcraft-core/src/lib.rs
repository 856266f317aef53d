//! # postcraft-core
//!
//! Domain layer containing versioned configuration entities, value objects,
//! repository and generation traits, the prompt composer and the response
//! parser. This crate has zero dependencies on infrastructure (database,
//! HTTP client, etc.).

pub mod entities;
pub mod error;
pub mod parser;
pub mod prompt;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AuditLogEntry, IdeaContext, LengthConstraints, NewAuditEntry, NewPlatformProfile,
    NewPromptTemplate, NewVoiceProfile, OriginalPost, PlatformProfile, PlatformProfileSnapshot,
    PlatformProfileUpdate, PlatformStructure, PromptSnapshot, PromptTemplate,
    PromptTemplateUpdate, StructureSection, TemplateSnapshot, TemplateVersions, VoiceProfile,
    VoiceProfileSnapshot, VoiceProfileUpdate,
};
pub use error::DomainError;
pub use parser::{parse, GeneratedIdea, GeneratedPost, GeneratedVariant};
pub use prompt::{
    compose, compose_variant, ComposedPrompt, CompositionInput, UserInput, VariantPrompt,
    VersionManifest,
};
pub use traits::{
    AuditLogRepository, AuditQuery, Generation, GenerationClient, GenerationOptions,
    PlatformProfileRepository, PromptTemplateRepository, RepoResult, ResponseFormat, TokenUsage,
    VoiceProfileRepository,
};
pub use value_objects::{
    AuditAction, AuditLogId, EntityId, EntityType, IdParseError, ParseEnumError, Platform,
    PlatformProfileId, PromptTemplateId, TaskType, UserId, VariationType, VoiceProfileId,
};
