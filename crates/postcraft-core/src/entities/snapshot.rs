//! Prompt snapshots stored with each audit entry
//!
//! A snapshot copies the exact wording that went into a generation. Profiles
//! and templates keep evolving after the fact, so the snapshot is the only
//! durable record of what the model actually saw.

use serde::{Deserialize, Serialize};

use super::{PlatformProfile, PromptTemplate, VoiceProfile};
use super::{LengthConstraints, PlatformStructure};
use crate::prompt::UserInput;
use crate::value_objects::{
    AuditAction, EntityId, Platform, PlatformProfileId, PromptTemplateId, VariationType,
    VoiceProfileId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSnapshot {
    pub id: PromptTemplateId,
    pub version: i32,
    pub content: String,
}

impl From<&PromptTemplate> for TemplateSnapshot {
    fn from(template: &PromptTemplate) -> Self {
        Self {
            id: template.id,
            version: template.version,
            content: template.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfileSnapshot {
    pub id: VoiceProfileId,
    pub version: i32,
    pub persona: String,
    pub tone_rules: Vec<String>,
    pub readability_rules: Vec<String>,
}

impl From<&VoiceProfile> for VoiceProfileSnapshot {
    fn from(profile: &VoiceProfile) -> Self {
        Self {
            id: profile.id,
            version: profile.version,
            persona: profile.persona.clone(),
            tone_rules: profile.tone_rules.clone(),
            readability_rules: profile.readability_rules.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformProfileSnapshot {
    pub id: PlatformProfileId,
    pub version: i32,
    pub platform: Platform,
    pub structure: PlatformStructure,
    pub formatting_rules: Vec<String>,
    pub length_constraints: LengthConstraints,
}

impl From<&PlatformProfile> for PlatformProfileSnapshot {
    fn from(profile: &PlatformProfile) -> Self {
        Self {
            id: profile.id,
            version: profile.version,
            platform: profile.platform,
            structure: profile.structure.clone(),
            formatting_rules: profile.formatting_rules.clone(),
            length_constraints: profile.length_constraints.clone(),
        }
    }
}

/// Idea a post was drafted from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaContext {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub hook: Option<String>,
    #[serde(default)]
    pub outline: Vec<String>,
    #[serde(default)]
    pub suggested_cta: Option<String>,
}

/// Existing post a variant, rewrite or repurpose starts from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalPost {
    pub id: EntityId,
    pub content: String,
    pub platform: Platform,
}

/// Everything that went into one generation, keyed by the kind of generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptSnapshot {
    Idea {
        task_template: TemplateSnapshot,
        voice_profile: VoiceProfileSnapshot,
        user_input: UserInput,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trend_summary: Option<String>,
        composed_prompt: String,
    },
    Post {
        task_template: TemplateSnapshot,
        voice_profile: VoiceProfileSnapshot,
        platform_profile: Option<PlatformProfileSnapshot>,
        user_input: UserInput,
        idea: IdeaContext,
        composed_prompt: String,
    },
    Variant {
        original_post: OriginalPost,
        variation_type: VariationType,
        variation_instruction: String,
        composed_prompt: String,
    },
    Rewrite {
        task_template: TemplateSnapshot,
        voice_profile: VoiceProfileSnapshot,
        platform_profile: Option<PlatformProfileSnapshot>,
        user_input: UserInput,
        original_post: OriginalPost,
        composed_prompt: String,
    },
    Repurpose {
        task_template: TemplateSnapshot,
        voice_profile: VoiceProfileSnapshot,
        platform_profile: PlatformProfileSnapshot,
        user_input: UserInput,
        original_post: OriginalPost,
        composed_prompt: String,
    },
}

impl PromptSnapshot {
    /// The only audit action this snapshot may be recorded under
    pub fn action(&self) -> AuditAction {
        match self {
            Self::Idea { .. } => AuditAction::GenerateIdea,
            Self::Post { .. } => AuditAction::GeneratePost,
            Self::Variant { .. } => AuditAction::GenerateVariants,
            Self::Rewrite { .. } => AuditAction::Rewrite,
            Self::Repurpose { .. } => AuditAction::Repurpose,
        }
    }

    pub fn composed_prompt(&self) -> &str {
        match self {
            Self::Idea { composed_prompt, .. }
            | Self::Post { composed_prompt, .. }
            | Self::Variant { composed_prompt, .. }
            | Self::Rewrite { composed_prompt, .. }
            | Self::Repurpose { composed_prompt, .. } => composed_prompt,
        }
    }
}
