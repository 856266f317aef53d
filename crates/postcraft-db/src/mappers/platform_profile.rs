//! Platform profile entity <-> model mapper

use postcraft_core::entities::{LengthConstraints, PlatformProfile, PlatformStructure};
use postcraft_core::value_objects::{Platform, PlatformProfileId, UserId};
use postcraft_core::DomainError;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::corrupt_column;
use crate::models::PlatformProfileModel;

impl TryFrom<PlatformProfileModel> for PlatformProfile {
    type Error = DomainError;

    fn try_from(model: PlatformProfileModel) -> Result<Self, Self::Error> {
        let platform: Platform = model
            .platform
            .parse()
            .map_err(|e| corrupt_column("platform", e))?;
        let structure: PlatformStructure = serde_json::from_value(model.structure)
            .map_err(|e| corrupt_column("structure", e))?;
        let length_constraints: LengthConstraints =
            serde_json::from_value(model.length_constraints)
                .map_err(|e| corrupt_column("length_constraints", e))?;

        Ok(PlatformProfile {
            id: PlatformProfileId::from_uuid(model.id),
            lineage_id: PlatformProfileId::from_uuid(model.lineage_id),
            owner: model.user_id.map(UserId::from_uuid),
            platform,
            name: model.name,
            structure,
            formatting_rules: model.formatting_rules,
            length_constraints,
            required_output_fields: model.required_output_fields,
            version: model.version,
            is_default: model.is_default,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}

/// Platform profile values for database insertion
pub struct PlatformProfileInsert<'a> {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub user_id: Option<Uuid>,
    pub platform: &'static str,
    pub name: &'a str,
    pub structure: JsonValue,
    pub formatting_rules: &'a [String],
    pub length_constraints: JsonValue,
    pub required_output_fields: &'a [String],
    pub version: i32,
    pub is_default: bool,
    pub is_active: bool,
}

impl<'a> PlatformProfileInsert<'a> {
    pub fn new(profile: &'a PlatformProfile) -> Result<Self, DomainError> {
        let to_json = |value: Result<JsonValue, serde_json::Error>| {
            value.map_err(|e| DomainError::InternalError(e.to_string()))
        };

        Ok(Self {
            id: profile.id.into_inner(),
            lineage_id: profile.lineage_id.into_inner(),
            user_id: profile.owner.map(UserId::into_inner),
            platform: profile.platform.as_str(),
            name: &profile.name,
            structure: to_json(serde_json::to_value(&profile.structure))?,
            formatting_rules: &profile.formatting_rules,
            length_constraints: to_json(serde_json::to_value(&profile.length_constraints))?,
            required_output_fields: &profile.required_output_fields,
            version: profile.version,
            is_default: profile.is_default,
            is_active: profile.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(platform: &str, structure: JsonValue) -> PlatformProfileModel {
        let id = Uuid::new_v4();
        PlatformProfileModel {
            id,
            lineage_id: id,
            user_id: None,
            platform: platform.to_string(),
            name: "LinkedIn".to_string(),
            structure,
            formatting_rules: vec!["No emojis".to_string()],
            length_constraints: serde_json::json!({"hard_max": 3000}),
            required_output_fields: vec![],
            version: 1,
            is_default: true,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_entity() {
        let profile = PlatformProfile::try_from(model(
            "linkedin",
            serde_json::json!({"sections": [{"name": "Hook", "description": "First line"}]}),
        ))
        .unwrap();
        assert_eq!(profile.platform, Platform::Linkedin);
        assert_eq!(profile.structure.sections.len(), 1);
        assert_eq!(profile.length_constraints.hard_max, Some(3000));
        assert!(profile.owner.is_none());
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let err = PlatformProfile::try_from(model("myspace", serde_json::json!({}))).unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_insert_serializes_json_columns() {
        let profile = PlatformProfile::try_from(model("facebook", serde_json::json!({}))).unwrap();
        let insert = PlatformProfileInsert::new(&profile).unwrap();
        assert_eq!(insert.platform, "facebook");
        assert_eq!(insert.structure, serde_json::json!({"sections": []}));
        assert_eq!(insert.length_constraints, serde_json::json!({"hard_max": 3000}));
    }
}
