//! Audit log entity <-> model mapper

use postcraft_core::entities::{AuditLogEntry, PromptSnapshot, TemplateVersions};
use postcraft_core::value_objects::{AuditAction, AuditLogId, EntityId, EntityType, UserId};
use postcraft_core::DomainError;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::corrupt_column;
use crate::models::AuditLogModel;

impl TryFrom<AuditLogModel> for AuditLogEntry {
    type Error = DomainError;

    fn try_from(model: AuditLogModel) -> Result<Self, Self::Error> {
        let action: AuditAction = model
            .action
            .parse()
            .map_err(|e| corrupt_column("action", e))?;
        let entity_type: EntityType = model
            .entity_type
            .parse()
            .map_err(|e| corrupt_column("entity_type", e))?;
        let prompt_snapshot: PromptSnapshot = serde_json::from_value(model.prompt_snapshot)
            .map_err(|e| corrupt_column("prompt_snapshot", e))?;
        let template_versions: Option<TemplateVersions> = model
            .template_versions
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| corrupt_column("template_versions", e))?;

        Ok(AuditLogEntry {
            id: AuditLogId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            action,
            entity_type,
            entity_id: EntityId::from_uuid(model.entity_id),
            prompt_snapshot,
            model_used: model.model_used,
            input_tokens: model.input_tokens.map(|t| t.max(0) as u32),
            output_tokens: model.output_tokens.map(|t| t.max(0) as u32),
            response_snapshot: model.response_snapshot,
            template_versions,
            created_at: model.created_at,
        })
    }
}

/// Audit entry values for database insertion
pub struct AuditLogInsert<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: Uuid,
    pub prompt_snapshot: JsonValue,
    pub model_used: &'a str,
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub response_snapshot: Option<&'a JsonValue>,
    pub template_versions: Option<JsonValue>,
}

impl<'a> AuditLogInsert<'a> {
    pub fn new(entry: &'a AuditLogEntry) -> Result<Self, DomainError> {
        let prompt_snapshot = serde_json::to_value(&entry.prompt_snapshot)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        let template_versions = entry
            .template_versions
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        Ok(Self {
            id: entry.id.into_inner(),
            user_id: entry.user_id.into_inner(),
            action: entry.action.as_str(),
            entity_type: entry.entity_type.as_str(),
            entity_id: entry.entity_id.into_inner(),
            prompt_snapshot,
            model_used: &entry.model_used,
            input_tokens: entry.input_tokens.map(|t| t.min(i32::MAX as u32) as i32),
            output_tokens: entry.output_tokens.map(|t| t.min(i32::MAX as u32) as i32),
            response_snapshot: entry.response_snapshot.as_ref(),
            template_versions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use postcraft_core::entities::OriginalPost;
    use postcraft_core::value_objects::{Platform, VariationType};

    fn entry() -> AuditLogEntry {
        AuditLogEntry {
            id: AuditLogId::new(),
            user_id: UserId::new(),
            action: AuditAction::GenerateVariants,
            entity_type: EntityType::Post,
            entity_id: EntityId::new(),
            prompt_snapshot: PromptSnapshot::Variant {
                original_post: OriginalPost {
                    id: EntityId::new(),
                    content: "Original".to_string(),
                    platform: Platform::Instagram,
                },
                variation_type: VariationType::Length,
                variation_instruction: "shorter".to_string(),
                composed_prompt: "prompt".to_string(),
            },
            model_used: "gpt-4o".to_string(),
            input_tokens: Some(120),
            output_tokens: Some(80),
            response_snapshot: Some(serde_json::json!({"content": "Variant"})),
            template_versions: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_then_model_preserves_entry() {
        let original = entry();
        let insert = AuditLogInsert::new(&original).unwrap();
        assert_eq!(insert.action, "generate_variants");
        assert_eq!(insert.prompt_snapshot["kind"], "variant");

        let model = AuditLogModel {
            id: insert.id,
            user_id: insert.user_id,
            action: insert.action.to_string(),
            entity_type: insert.entity_type.to_string(),
            entity_id: insert.entity_id,
            prompt_snapshot: insert.prompt_snapshot.clone(),
            model_used: insert.model_used.to_string(),
            input_tokens: insert.input_tokens,
            output_tokens: insert.output_tokens,
            response_snapshot: insert.response_snapshot.cloned(),
            template_versions: insert.template_versions.clone(),
            created_at: original.created_at,
        };
        let restored = AuditLogEntry::try_from(model).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let original = entry();
        let insert = AuditLogInsert::new(&original).unwrap();
        let model = AuditLogModel {
            id: insert.id,
            user_id: insert.user_id,
            action: "delete_post".to_string(),
            entity_type: "post".to_string(),
            entity_id: insert.entity_id,
            prompt_snapshot: insert.prompt_snapshot,
            model_used: "gpt-4o".to_string(),
            input_tokens: None,
            output_tokens: None,
            response_snapshot: None,
            template_versions: None,
            created_at: original.created_at,
        };
        assert!(AuditLogEntry::try_from(model).is_err());
    }
}
