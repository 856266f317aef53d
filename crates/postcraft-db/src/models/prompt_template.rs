//! Prompt template database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for prompt_templates table
#[derive(Debug, Clone, FromRow)]
pub struct PromptTemplateModel {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub user_id: Option<Uuid>,
    pub task_type: String,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
