use serde::{Deserialize, Serialize};

/// Free-form request fields layered into the USER INPUT section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idea_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idea_hook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idea_outline: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idea_cta: Option<String>,
}

/// Treat empty strings like missing fields
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
