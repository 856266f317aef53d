//! Domain entities - versioned configuration rows and audit records

mod audit_log;
mod platform_profile;
mod prompt_template;
mod snapshot;
mod voice_profile;

pub use audit_log::{AuditLogEntry, NewAuditEntry, TemplateVersions};
pub use platform_profile::{
    LengthConstraints, NewPlatformProfile, PlatformProfile, PlatformProfileUpdate,
    PlatformStructure, StructureSection,
};
pub use prompt_template::{NewPromptTemplate, PromptTemplate, PromptTemplateUpdate};
pub use snapshot::{
    IdeaContext, OriginalPost, PlatformProfileSnapshot, PromptSnapshot, TemplateSnapshot,
    VoiceProfileSnapshot,
};
pub use voice_profile::{NewVoiceProfile, VoiceProfile, VoiceProfileUpdate};
