//! Value objects - immutable types that represent domain concepts

mod audit;
mod ids;
mod platform;
mod task_type;
mod variation;

pub use audit::{AuditAction, EntityType};
pub use ids::{
    AuditLogId, EntityId, IdParseError, PlatformProfileId, PromptTemplateId, UserId,
    VoiceProfileId,
};
pub use platform::Platform;
pub use task_type::TaskType;
pub use variation::VariationType;

/// Error when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
