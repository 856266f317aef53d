//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use postcraft_core::entities::{LengthConstraints, PlatformStructure, PromptSnapshot, TemplateVersions};
use postcraft_core::parser::{GeneratedIdea, GeneratedPost, GeneratedVariant};
use postcraft_core::prompt::VersionManifest;
use postcraft_core::traits::TokenUsage;
use postcraft_core::value_objects::{
    AuditAction, AuditLogId, EntityId, EntityType, Platform, PlatformProfileId,
    PromptTemplateId, TaskType, UserId, VoiceProfileId,
};

// ============================================================================
// Configuration Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VoiceProfileResponse {
    pub id: VoiceProfileId,
    pub lineage_id: VoiceProfileId,
    /// `None` for system profiles
    pub owner: Option<UserId>,
    pub name: String,
    pub persona: String,
    pub tone_rules: Vec<String>,
    pub readability_rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbidden_language: Option<Vec<String>>,
    pub version: i32,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformProfileResponse {
    pub id: PlatformProfileId,
    pub lineage_id: PlatformProfileId,
    pub owner: Option<UserId>,
    pub platform: Platform,
    pub name: String,
    pub structure: PlatformStructure,
    pub formatting_rules: Vec<String>,
    pub length_constraints: LengthConstraints,
    pub required_output_fields: Vec<String>,
    pub version: i32,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptTemplateResponse {
    pub id: PromptTemplateId,
    pub lineage_id: PromptTemplateId,
    pub owner: Option<UserId>,
    pub task_type: TaskType,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Audit Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogResponse {
    pub id: AuditLogId,
    pub action: AuditAction,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub prompt_snapshot: PromptSnapshot,
    pub model_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_snapshot: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_versions: Option<TemplateVersions>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Generation Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct IdeaGenerationResponse {
    pub idea_id: EntityId,
    pub idea: GeneratedIdea,
    pub audit_log_id: AuditLogId,
    pub model: String,
    pub usage: TokenUsage,
    pub versions: VersionManifest,
}

/// Drafted, rewritten or repurposed post
#[derive(Debug, Clone, Serialize)]
pub struct PostGenerationResponse {
    pub post_id: EntityId,
    pub platform: Platform,
    pub post: GeneratedPost,
    pub audit_log_id: AuditLogId,
    pub model: String,
    pub usage: TokenUsage,
    pub versions: VersionManifest,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantGenerationResponse {
    pub variant_id: EntityId,
    /// Post the variant was generated from
    pub post_id: EntityId,
    pub variant: GeneratedVariant,
    pub audit_log_id: AuditLogId,
    pub model: String,
    pub usage: TokenUsage,
}
