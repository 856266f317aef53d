//! Voice profile entity - persona and style rules for generated text

use chrono::{DateTime, Utc};

use crate::value_objects::{UserId, VoiceProfileId};

/// One version of a voice profile
///
/// Rows are never edited in place. An update produces a new row with the same
/// `lineage_id`, `version + 1` and a fresh `id`, and the previous row is
/// deactivated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub id: VoiceProfileId,
    /// Id of the version-1 row of this chain
    pub lineage_id: VoiceProfileId,
    /// `None` for system profiles
    pub owner: Option<UserId>,
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

/// Fields for creating a voice profile
#[derive(Debug, Clone, Default)]
pub struct NewVoiceProfile {
    pub name: String,
    pub persona: String,
    pub tone_rules: Vec<String>,
    pub readability_rules: Vec<String>,
    pub forbidden_language: Option<Vec<String>>,
    pub is_default: bool,
}

/// Partial update; unset fields are copied from the current version
#[derive(Debug, Clone, Default)]
pub struct VoiceProfileUpdate {
    pub name: Option<String>,
    pub persona: Option<String>,
    pub tone_rules: Option<Vec<String>>,
    pub readability_rules: Option<Vec<String>>,
    pub forbidden_language: Option<Vec<String>>,
    pub is_default: Option<bool>,
}

impl VoiceProfile {
    /// Create version 1 of a new chain
    pub fn new(owner: Option<UserId>, input: NewVoiceProfile) -> Self {
        let id = VoiceProfileId::new();
        Self {
            id,
            lineage_id: id,
            owner,
            name: input.name,
            persona: input.persona,
            tone_rules: input.tone_rules,
            readability_rules: input.readability_rules,
            forbidden_language: input.forbidden_language,
            version: 1,
            is_default: input.is_default,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Build the row that supersedes this one
    pub fn next_version(&self, update: VoiceProfileUpdate) -> Self {
        Self {
            id: VoiceProfileId::new(),
            lineage_id: self.lineage_id,
            owner: self.owner,
            name: update.name.unwrap_or_else(|| self.name.clone()),
            persona: update.persona.unwrap_or_else(|| self.persona.clone()),
            tone_rules: update.tone_rules.unwrap_or_else(|| self.tone_rules.clone()),
            readability_rules: update
                .readability_rules
                .unwrap_or_else(|| self.readability_rules.clone()),
            forbidden_language: update
                .forbidden_language
                .or_else(|| self.forbidden_language.clone()),
            version: self.version + 1,
            is_default: update.is_default.unwrap_or(self.is_default),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_system(&self) -> bool {
        self.owner.is_none()
    }

    /// Whether this row can serve as the active default of its scope
    #[inline]
    pub fn is_active_default(&self) -> bool {
        self.is_default && self.is_active
    }
}
