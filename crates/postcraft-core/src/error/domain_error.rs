//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{
    AuditLogId, EntityId, PlatformProfileId, PromptTemplateId, VoiceProfileId,
};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Voice profile not found: {0}")]
    VoiceProfileNotFound(VoiceProfileId),

    #[error("Platform profile not found: {0}")]
    PlatformProfileNotFound(PlatformProfileId),

    #[error("Prompt template not found: {0}")]
    PromptTemplateNotFound(PromptTemplateId),

    #[error("Audit log not found: {0}")]
    AuditLogNotFound(AuditLogId),

    /// No owner row and no system fallback for a required configuration
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Stale version: {entity} {id} is no longer active")]
    StaleVersion { entity: &'static str, id: String },

    #[error("Conflict: another default {entity} was set concurrently")]
    DefaultConflict { entity: &'static str },

    // =========================================================================
    // Generation Errors
    // =========================================================================
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Malformed generation response: {reason}")]
    MalformedGenerationResponse { reason: String, raw: String },

    #[error("Audit persistence failed for entity {entity_id}: {reason}")]
    AuditPersistenceFailed { reason: String, entity_id: EntityId },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::VoiceProfileNotFound(_) => "UNKNOWN_VOICE_PROFILE",
            Self::PlatformProfileNotFound(_) => "UNKNOWN_PLATFORM_PROFILE",
            Self::PromptTemplateNotFound(_) => "UNKNOWN_PROMPT_TEMPLATE",
            Self::AuditLogNotFound(_) => "UNKNOWN_AUDIT_LOG",
            Self::ConfigurationMissing(_) => "CONFIGURATION_MISSING",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Conflict
            Self::StaleVersion { .. } => "STALE_VERSION",
            Self::DefaultConflict { .. } => "DEFAULT_CONFLICT",

            // Generation
            Self::GenerationFailed(_) => "GENERATION_FAILED",
            Self::MalformedGenerationResponse { .. } => "MALFORMED_GENERATION_RESPONSE",
            Self::AuditPersistenceFailed { .. } => "AUDIT_PERSISTENCE_FAILED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::VoiceProfileNotFound(_)
                | Self::PlatformProfileNotFound(_)
                | Self::PromptTemplateNotFound(_)
                | Self::AuditLogNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::StaleVersion { .. } | Self::DefaultConflict { .. }
        )
    }

    /// Errors raised by the generation round trip itself
    pub fn is_generation(&self) -> bool {
        matches!(
            self,
            Self::GenerationFailed(_) | Self::MalformedGenerationResponse { .. }
        )
    }

    /// Caller can fix this by creating or assigning configuration
    pub fn is_configuration_missing(&self) -> bool {
        matches!(self, Self::ConfigurationMissing(_))
    }
}
