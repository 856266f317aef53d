//! Variation types for post variants

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ParseEnumError;

/// Dimension along which a variant differs from its original post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationType {
    Tone,
    Length,
    Angle,
    Cta,
}

impl VariationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tone => "tone",
            Self::Length => "length",
            Self::Angle => "angle",
            Self::Cta => "cta",
        }
    }

    /// Built-in instruction used when the caller gives none
    pub fn default_instruction(&self) -> &'static str {
        match self {
            Self::Tone => {
                "Create a variant of this post with a different tone.\n\
                 Options: more casual, more professional, more enthusiastic, more conversational.\n\
                 Choose the most appropriate alternative tone based on the content."
            }
            Self::Length => {
                "Create a variant of this post with a different length.\n\
                 If the original is long, make it shorter and punchier.\n\
                 If the original is short, expand it with more detail or examples."
            }
            Self::Angle => {
                "Create a variant of this post approaching the same topic from a different angle.\n\
                 Consider: different perspective, different hook, different storytelling approach, or different value proposition."
            }
            Self::Cta => {
                "Create a variant of this post with a different call-to-action.\n\
                 Options: ask a question, encourage sharing, prompt comments, drive to a link, or inspire action.\n\
                 Choose the most effective alternative CTA for this content."
            }
        }
    }
}

impl fmt::Display for VariationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VariationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tone" => Ok(Self::Tone),
            "length" => Ok(Self::Length),
            "angle" => Ok(Self::Angle),
            "cta" => Ok(Self::Cta),
            other => Err(ParseEnumError::new("variation type", other)),
        }
    }
}
