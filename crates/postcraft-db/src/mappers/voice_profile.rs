//! Voice profile entity <-> model mapper

use postcraft_core::entities::VoiceProfile;
use postcraft_core::value_objects::{UserId, VoiceProfileId};
use postcraft_core::DomainError;
use uuid::Uuid;

use crate::models::VoiceProfileModel;

impl TryFrom<VoiceProfileModel> for VoiceProfile {
    type Error = DomainError;

    fn try_from(model: VoiceProfileModel) -> Result<Self, Self::Error> {
        Ok(VoiceProfile {
            id: VoiceProfileId::from_uuid(model.id),
            lineage_id: VoiceProfileId::from_uuid(model.lineage_id),
            owner: model.user_id.map(UserId::from_uuid),
            name: model.name,
            persona: model.persona,
            tone_rules: model.tone_rules,
            readability_rules: model.readability_rules,
            forbidden_language: model.forbidden_language,
            version: model.version,
            is_default: model.is_default,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}

/// Voice profile values for database insertion
pub struct VoiceProfileInsert<'a> {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: &'a str,
    pub persona: &'a str,
    pub tone_rules: &'a [String],
    pub readability_rules: &'a [String],
    pub forbidden_language: Option<&'a [String]>,
    pub version: i32,
    pub is_default: bool,
    pub is_active: bool,
}

impl<'a> VoiceProfileInsert<'a> {
    pub fn new(profile: &'a VoiceProfile) -> Self {
        Self {
            id: profile.id.into_inner(),
            lineage_id: profile.lineage_id.into_inner(),
            user_id: profile.owner.map(UserId::into_inner),
            name: &profile.name,
            persona: &profile.persona,
            tone_rules: &profile.tone_rules,
            readability_rules: &profile.readability_rules,
            forbidden_language: profile.forbidden_language.as_deref(),
            version: profile.version,
            is_default: profile.is_default,
            is_active: profile.is_active,
        }
    }
}
