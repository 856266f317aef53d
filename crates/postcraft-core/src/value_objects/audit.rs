//! Audit classification enums

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ParseEnumError;

/// What kind of generation an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    GenerateIdea,
    GeneratePost,
    GenerateVariants,
    Rewrite,
    Repurpose,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateIdea => "generate_idea",
            Self::GeneratePost => "generate_post",
            Self::GenerateVariants => "generate_variants",
            Self::Rewrite => "rewrite",
            Self::Repurpose => "repurpose",
        }
    }

    /// Entity type the action produces or modifies
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::GenerateIdea => EntityType::Idea,
            _ => EntityType::Post,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate_idea" => Ok(Self::GenerateIdea),
            "generate_post" => Ok(Self::GeneratePost),
            "generate_variants" => Ok(Self::GenerateVariants),
            "rewrite" => Ok(Self::Rewrite),
            "repurpose" => Ok(Self::Repurpose),
            other => Err(ParseEnumError::new("audit action", other)),
        }
    }
}

/// Kind of entity an audit entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Idea,
    Post,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idea" => Ok(Self::Idea),
            "post" => Ok(Self::Post),
            other => Err(ParseEnumError::new("entity type", other)),
        }
    }
}
