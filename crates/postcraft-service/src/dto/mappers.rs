//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use postcraft_core::entities::{AuditLogEntry, PlatformProfile, PromptTemplate, VoiceProfile};

use super::responses::{
    AuditLogResponse, PlatformProfileResponse, PromptTemplateResponse, VoiceProfileResponse,
};

// ============================================================================
// Configuration Mappers
// ============================================================================

impl From<&VoiceProfile> for VoiceProfileResponse {
    fn from(profile: &VoiceProfile) -> Self {
        Self {
            id: profile.id,
            lineage_id: profile.lineage_id,
            owner: profile.owner,
            name: profile.name.clone(),
            persona: profile.persona.clone(),
            tone_rules: profile.tone_rules.clone(),
            readability_rules: profile.readability_rules.clone(),
            forbidden_language: profile.forbidden_language.clone(),
            version: profile.version,
            is_default: profile.is_default,
            is_active: profile.is_active,
            created_at: profile.created_at,
        }
    }
}

impl From<VoiceProfile> for VoiceProfileResponse {
    fn from(profile: VoiceProfile) -> Self {
        Self::from(&profile)
    }
}

impl From<&PlatformProfile> for PlatformProfileResponse {
    fn from(profile: &PlatformProfile) -> Self {
        Self {
            id: profile.id,
            lineage_id: profile.lineage_id,
            owner: profile.owner,
            platform: profile.platform,
            name: profile.name.clone(),
            structure: profile.structure.clone(),
            formatting_rules: profile.formatting_rules.clone(),
            length_constraints: profile.length_constraints.clone(),
            required_output_fields: profile.required_output_fields.clone(),
            version: profile.version,
            is_default: profile.is_default,
            is_active: profile.is_active,
            created_at: profile.created_at,
        }
    }
}

impl From<PlatformProfile> for PlatformProfileResponse {
    fn from(profile: PlatformProfile) -> Self {
        Self::from(&profile)
    }
}

impl From<&PromptTemplate> for PromptTemplateResponse {
    fn from(template: &PromptTemplate) -> Self {
        Self {
            id: template.id,
            lineage_id: template.lineage_id,
            owner: template.owner,
            task_type: template.task_type,
            name: template.name.clone(),
            content: template.content.clone(),
            version: template.version,
            is_active: template.is_active,
            created_at: template.created_at,
        }
    }
}

impl From<PromptTemplate> for PromptTemplateResponse {
    fn from(template: PromptTemplate) -> Self {
        Self::from(&template)
    }
}

// ============================================================================
// Audit Mappers
// ============================================================================

impl From<&AuditLogEntry> for AuditLogResponse {
    fn from(entry: &AuditLogEntry) -> Self {
        Self {
            id: entry.id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            prompt_snapshot: entry.prompt_snapshot.clone(),
            model_used: entry.model_used.clone(),
            input_tokens: entry.input_tokens,
            output_tokens: entry.output_tokens,
            total_tokens: entry.total_tokens(),
            response_snapshot: entry.response_snapshot.clone(),
            template_versions: entry.template_versions,
            created_at: entry.created_at,
        }
    }
}

impl From<AuditLogEntry> for AuditLogResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self::from(&entry)
    }
}
