//! Platform profile database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for platform_profiles table
#[derive(Debug, Clone, FromRow)]
pub struct PlatformProfileModel {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub user_id: Option<Uuid>,
    pub platform: String,
    pub name: String,
    /// `{"sections": [...]}`
    pub structure: JsonValue,
    pub formatting_rules: Vec<String>,
    pub length_constraints: JsonValue,
    pub required_output_fields: Vec<String>,
    pub version: i32,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
