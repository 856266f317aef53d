//! Social platforms a post can target

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ParseEnumError;

/// Target social platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Instagram,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Self::Linkedin, Self::Instagram, Self::Facebook];

    /// Lowercase wire/database name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkedin" => Ok(Self::Linkedin),
            "instagram" => Ok(Self::Instagram),
            "facebook" => Ok(Self::Facebook),
            other => Err(ParseEnumError::new("platform", other)),
        }
    }
}
