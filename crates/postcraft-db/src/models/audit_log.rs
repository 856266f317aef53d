//! Audit log database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for audit_logs table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    /// Tagged `PromptSnapshot` document
    pub prompt_snapshot: JsonValue,
    pub model_used: String,
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub response_snapshot: Option<JsonValue>,
    pub template_versions: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}
