//! Platform profile entity - structure and formatting rules per platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Platform, PlatformProfileId, UserId};

/// Ordered post sections a platform expects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStructure {
    #[serde(default)]
    pub sections: Vec<StructureSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSection {
    pub name: String,
    pub description: String,
    /// Unset reads as optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Length limits; every bound is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_max: Option<u32>,
    /// Defaults to "characters" when rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl LengthConstraints {
    pub fn unit_or_default(&self) -> &str {
        self.unit.as_deref().unwrap_or("characters")
    }
}

/// One version of a platform profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub id: PlatformProfileId,
    pub lineage_id: PlatformProfileId,
    pub owner: Option<UserId>,
    pub platform: Platform,
    pub name: String,
    pub structure: PlatformStructure,
    pub formatting_rules: Vec<String>,
    pub length_constraints: LengthConstraints,
    pub required_output_fields: Vec<String>,
    pub version: i32,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPlatformProfile {
    pub platform: Platform,
    pub name: String,
    pub structure: PlatformStructure,
    pub formatting_rules: Vec<String>,
    pub length_constraints: LengthConstraints,
    pub required_output_fields: Vec<String>,
    pub is_default: bool,
}

/// Partial update; the platform itself is fixed for the whole chain
#[derive(Debug, Clone, Default)]
pub struct PlatformProfileUpdate {
    pub name: Option<String>,
    pub structure: Option<PlatformStructure>,
    pub formatting_rules: Option<Vec<String>>,
    pub length_constraints: Option<LengthConstraints>,
    pub required_output_fields: Option<Vec<String>>,
    pub is_default: Option<bool>,
}

impl PlatformProfile {
    pub fn new(owner: Option<UserId>, input: NewPlatformProfile) -> Self {
        let id = PlatformProfileId::new();
        Self {
            id,
            lineage_id: id,
            owner,
            platform: input.platform,
            name: input.name,
            structure: input.structure,
            formatting_rules: input.formatting_rules,
            length_constraints: input.length_constraints,
            required_output_fields: input.required_output_fields,
            version: 1,
            is_default: input.is_default,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn next_version(&self, update: PlatformProfileUpdate) -> Self {
        Self {
            id: PlatformProfileId::new(),
            lineage_id: self.lineage_id,
            owner: self.owner,
            platform: self.platform,
            name: update.name.unwrap_or_else(|| self.name.clone()),
            structure: update.structure.unwrap_or_else(|| self.structure.clone()),
            formatting_rules: update
                .formatting_rules
                .unwrap_or_else(|| self.formatting_rules.clone()),
            length_constraints: update
                .length_constraints
                .unwrap_or_else(|| self.length_constraints.clone()),
            required_output_fields: update
                .required_output_fields
                .unwrap_or_else(|| self.required_output_fields.clone()),
            version: self.version + 1,
            is_default: update.is_default.unwrap_or(self.is_default),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_active_default(&self) -> bool {
        self.is_default && self.is_active
    }
}
