//! Audit log entity - one immutable record per generation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PromptSnapshot;
use crate::error::DomainError;
use crate::prompt::VersionManifest;
use crate::traits::TokenUsage;
use crate::value_objects::{AuditAction, AuditLogId, EntityId, EntityType, UserId};

/// Config versions used by a generation, kept beside the full snapshot for
/// cheap filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVersions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_template_version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_profile_version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_profile_version: Option<i32>,
}

impl From<&VersionManifest> for TemplateVersions {
    fn from(versions: &VersionManifest) -> Self {
        Self {
            task_template_version: Some(versions.task_template_version),
            voice_profile_version: Some(versions.voice_profile_version),
            platform_profile_version: versions.platform_profile_version,
        }
    }
}

/// Append-only audit entry
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    pub user_id: UserId,
    pub action: AuditAction,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub prompt_snapshot: PromptSnapshot,
    pub model_used: String,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub response_snapshot: Option<serde_json::Value>,
    pub template_versions: Option<TemplateVersions>,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to record a generation
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub prompt_snapshot: PromptSnapshot,
    pub model_used: String,
    pub usage: Option<TokenUsage>,
    pub response_snapshot: Option<serde_json::Value>,
    pub template_versions: Option<TemplateVersions>,
}

impl NewAuditEntry {
    /// Reject entries whose snapshot or entity type disagrees with the action
    pub fn check_consistency(&self) -> Result<(), DomainError> {
        let snapshot_action = self.prompt_snapshot.action();
        if snapshot_action != self.action {
            return Err(DomainError::ValidationError(format!(
                "prompt snapshot of kind {snapshot_action} cannot be recorded as {}",
                self.action
            )));
        }
        if self.action.entity_type() != self.entity_type {
            return Err(DomainError::ValidationError(format!(
                "action {} applies to {}, not {}",
                self.action,
                self.action.entity_type(),
                self.entity_type
            )));
        }
        if self.model_used.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "model_used must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl AuditLogEntry {
    /// Build the complete entry in memory; nothing is persisted here
    pub fn new(user_id: UserId, input: NewAuditEntry) -> Self {
        Self {
            id: AuditLogId::new(),
            user_id,
            action: input.action,
            entity_type: input.entity_type,
            entity_id: input.entity_id,
            prompt_snapshot: input.prompt_snapshot,
            model_used: input.model_used,
            input_tokens: input.usage.map(|u| u.input_tokens),
            output_tokens: input.usage.map(|u| u.output_tokens),
            response_snapshot: input.response_snapshot,
            template_versions: input.template_versions,
            created_at: Utc::now(),
        }
    }

    /// Total tokens when both counts were reported and the sum fits
    pub fn total_tokens(&self) -> Option<u32> {
        self.input_tokens?.checked_add(self.output_tokens?)
    }
}
