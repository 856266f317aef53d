//! Task types a prompt template can be written for

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ParseEnumError, Platform};

/// Generation task a prompt template applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Ideation,
    TrendIdeation,
    Drafting,
    DraftLinkedin,
    DraftInstagram,
    DraftFacebook,
    Rewriting,
    Repurposing,
}

impl TaskType {
    pub const ALL: [TaskType; 8] = [
        Self::Ideation,
        Self::TrendIdeation,
        Self::Drafting,
        Self::DraftLinkedin,
        Self::DraftInstagram,
        Self::DraftFacebook,
        Self::Rewriting,
        Self::Repurposing,
    ];

    /// Drafting task for a specific platform
    pub fn draft_for(platform: Platform) -> Self {
        match platform {
            Platform::Linkedin => Self::DraftLinkedin,
            Platform::Instagram => Self::DraftInstagram,
            Platform::Facebook => Self::DraftFacebook,
        }
    }

    /// Platform a drafting task is bound to, if any
    pub fn platform(&self) -> Option<Platform> {
        match self {
            Self::DraftLinkedin => Some(Platform::Linkedin),
            Self::DraftInstagram => Some(Platform::Instagram),
            Self::DraftFacebook => Some(Platform::Facebook),
            _ => None,
        }
    }

    /// Platform-drafting tasks cannot be composed without a platform profile
    #[inline]
    pub fn requires_platform_profile(&self) -> bool {
        self.platform().is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ideation => "ideation",
            Self::TrendIdeation => "trend_ideation",
            Self::Drafting => "drafting",
            Self::DraftLinkedin => "draft_linkedin",
            Self::DraftInstagram => "draft_instagram",
            Self::DraftFacebook => "draft_facebook",
            Self::Rewriting => "rewriting",
            Self::Repurposing => "repurposing",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("task type", s))
    }
}
