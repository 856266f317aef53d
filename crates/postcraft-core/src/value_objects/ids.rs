//! Typed identifiers
//!
//! Every record family gets its own UUID newtype so that a voice profile id
//! can never be handed to a lookup expecting an audit log id.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Error when parsing an identifier from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid identifier format")]
    InvalidFormat,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID
            #[inline]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Get the inner UUID
            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }

            /// Parse from the hyphenated string representation
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| IdParseError::InvalidFormat)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_id!(
    /// Account that owns profiles, templates and audit entries
    UserId
);
define_id!(
    /// One row (one version) of a voice profile
    VoiceProfileId
);
define_id!(
    /// One row (one version) of a platform profile
    PlatformProfileId
);
define_id!(
    /// One row (one version) of a prompt template
    PromptTemplateId
);
define_id!(
    /// Immutable audit log entry
    AuditLogId
);
define_id!(
    /// Idea, post or variant persisted by the caller
    EntityId
);
