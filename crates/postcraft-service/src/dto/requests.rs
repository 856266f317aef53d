//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use postcraft_core::entities::{
    LengthConstraints, NewPlatformProfile, NewPromptTemplate, NewVoiceProfile,
    PlatformProfileUpdate, PlatformStructure, PromptTemplateUpdate, VoiceProfileUpdate,
};
use postcraft_core::traits::AuditQuery;
use postcraft_core::value_objects::{
    AuditAction, EntityId, EntityType, Platform, TaskType, VariationType, VoiceProfileId,
};

/// Bounds must not contradict each other
fn validate_length_constraints(constraints: &LengthConstraints) -> Result<(), ValidationError> {
    let ordered = |low: Option<u32>, high: Option<u32>| match (low, high) {
        (Some(low), Some(high)) => low <= high,
        _ => true,
    };
    if ordered(constraints.target_min, constraints.target_max)
        && ordered(constraints.target_max, constraints.hard_max)
        && ordered(constraints.target_min, constraints.hard_max)
    {
        Ok(())
    } else {
        Err(ValidationError::new("length_constraints_order"))
    }
}

// ============================================================================
// Voice Profile Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVoiceProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 2000, message = "Persona must be 1-2000 characters"))]
    pub persona: String,

    #[serde(default)]
    pub tone_rules: Vec<String>,

    #[serde(default)]
    pub readability_rules: Vec<String>,

    pub forbidden_language: Option<Vec<String>>,

    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateVoiceProfileRequest> for NewVoiceProfile {
    fn from(req: CreateVoiceProfileRequest) -> Self {
        Self {
            name: req.name,
            persona: req.persona,
            tone_rules: req.tone_rules,
            readability_rules: req.readability_rules,
            forbidden_language: req.forbidden_language,
            is_default: req.is_default,
        }
    }
}

/// Partial update; omitted fields carry over to the next version
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVoiceProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Persona must be 1-2000 characters"))]
    pub persona: Option<String>,

    pub tone_rules: Option<Vec<String>>,
    pub readability_rules: Option<Vec<String>>,
    pub forbidden_language: Option<Vec<String>>,
    pub is_default: Option<bool>,
}

impl From<UpdateVoiceProfileRequest> for VoiceProfileUpdate {
    fn from(req: UpdateVoiceProfileRequest) -> Self {
        Self {
            name: req.name,
            persona: req.persona,
            tone_rules: req.tone_rules,
            readability_rules: req.readability_rules,
            forbidden_language: req.forbidden_language,
            is_default: req.is_default,
        }
    }
}

// ============================================================================
// Platform Profile Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlatformProfileRequest {
    pub platform: Platform,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    pub structure: PlatformStructure,

    #[serde(default)]
    pub formatting_rules: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_length_constraints"))]
    pub length_constraints: LengthConstraints,

    #[serde(default)]
    pub required_output_fields: Vec<String>,

    #[serde(default)]
    pub is_default: bool,
}

impl From<CreatePlatformProfileRequest> for NewPlatformProfile {
    fn from(req: CreatePlatformProfileRequest) -> Self {
        Self {
            platform: req.platform,
            name: req.name,
            structure: req.structure,
            formatting_rules: req.formatting_rules,
            length_constraints: req.length_constraints,
            required_output_fields: req.required_output_fields,
            is_default: req.is_default,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlatformProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    pub structure: Option<PlatformStructure>,
    pub formatting_rules: Option<Vec<String>>,

    #[validate(custom(function = "validate_length_constraints"))]
    pub length_constraints: Option<LengthConstraints>,

    pub required_output_fields: Option<Vec<String>>,
    pub is_default: Option<bool>,
}

impl From<UpdatePlatformProfileRequest> for PlatformProfileUpdate {
    fn from(req: UpdatePlatformProfileRequest) -> Self {
        Self {
            name: req.name,
            structure: req.structure,
            formatting_rules: req.formatting_rules,
            length_constraints: req.length_constraints,
            required_output_fields: req.required_output_fields,
            is_default: req.is_default,
        }
    }
}

// ============================================================================
// Prompt Template Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePromptTemplateRequest {
    pub task_type: TaskType,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Template content is required"))]
    pub content: String,
}

impl From<CreatePromptTemplateRequest> for NewPromptTemplate {
    fn from(req: CreatePromptTemplateRequest) -> Self {
        Self {
            task_type: req.task_type,
            name: req.name,
            content: req.content,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePromptTemplateRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Template content must not be empty"))]
    pub content: Option<String>,
}

impl From<UpdatePromptTemplateRequest> for PromptTemplateUpdate {
    fn from(req: UpdatePromptTemplateRequest) -> Self {
        Self {
            name: req.name,
            content: req.content,
        }
    }
}

// ============================================================================
// Generation Requests
// ============================================================================

/// Where an idea's raw material came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Youtube,
    Topic,
    Document,
    Plain,
}

impl SourceType {
    /// Transcript and document sources cannot be used without their text
    pub fn requires_source_text(&self) -> bool {
        matches!(self, Self::Youtube | Self::Document)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateIdeaRequest {
    pub source_type: SourceType,

    #[validate(length(max = 500, message = "Topic must be at most 500 characters"))]
    pub topic: Option<String>,

    #[validate(length(max = 500, message = "Audience must be at most 500 characters"))]
    pub audience: Option<String>,

    #[validate(length(max = 500, message = "Angle must be at most 500 characters"))]
    pub angle: Option<String>,

    pub example: Option<String>,

    #[validate(length(max = 500, message = "CTA preference must be at most 500 characters"))]
    pub cta_preference: Option<String>,

    /// Transcript or extracted document text
    pub source_text: Option<String>,

    pub trend_summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GeneratePostRequest {
    pub platform: Platform,

    /// Explicit voice profile; the active one otherwise
    pub voice_profile_id: Option<VoiceProfileId>,

    #[validate(length(max = 2000, message = "Additional context must be at most 2000 characters"))]
    pub additional_context: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateVariantRequest {
    pub variation_type: VariationType,

    #[validate(length(max = 2000, message = "Instruction must be at most 2000 characters"))]
    pub variation_instruction: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RewritePostRequest {
    #[validate(length(max = 2000, message = "Instruction must be at most 2000 characters"))]
    pub instruction: Option<String>,

    pub voice_profile_id: Option<VoiceProfileId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RepurposePostRequest {
    pub target_platform: Platform,

    #[validate(length(max = 2000, message = "Instruction must be at most 2000 characters"))]
    pub instruction: Option<String>,
}

// ============================================================================
// Audit Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AuditLogQuery {
    pub action: Option<AuditAction>,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<EntityId>,

    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<u32>,

    pub offset: Option<u32>,
}

impl From<AuditLogQuery> for AuditQuery {
    fn from(query: AuditLogQuery) -> Self {
        Self {
            action: query.action,
            entity_type: query.entity_type,
            entity_id: query.entity_id,
            limit: query.limit,
            offset: query.offset,
        }
    }
}
