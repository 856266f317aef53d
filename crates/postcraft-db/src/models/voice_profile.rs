//! Voice profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for voice_profiles table
#[derive(Debug, Clone, FromRow)]
pub struct VoiceProfileModel {
    pub id: Uuid,
    pub lineage_id: Uuid,
    /// NULL for system profiles
    pub user_id: Option<Uuid>,
    pub name: String,
    pub persona: String,
    pub tone_rules: Vec<String>,
    pub readability_rules: Vec<String>,
    pub forbidden_language: Option<Vec<String>>,
    pub version: i32,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
