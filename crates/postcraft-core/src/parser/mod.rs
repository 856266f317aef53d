//! Response parser - typed views over raw generation output

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Idea returned by ideation tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedIdea {
    pub title: String,
    #[serde(default)]
    pub hook: Option<String>,
    #[serde(default)]
    pub outline: Vec<String>,
    #[serde(default)]
    pub suggested_cta: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Post returned by drafting, rewriting and repurposing tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_image_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedVariant {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default)]
    pub variation_description: String,
}

/// Parse raw generation output as JSON into `T`
///
/// Unknown fields are ignored. Invalid JSON, or JSON missing a field `T`
/// requires, yields [`DomainError::MalformedGenerationResponse`] carrying the
/// raw content for diagnosis.
pub fn parse<T: DeserializeOwned>(raw: &str) -> Result<T, DomainError> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| {
        DomainError::MalformedGenerationResponse {
            reason: format!("Failed to parse AI response as JSON: {e}"),
            raw: raw.to_string(),
        }
    })
}

/// Unwrap a response the model wrapped in a Markdown code fence
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string (`json`, `JSON`, ...), with or without a newline after it
    let info_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let body = rest[info_len..].trim_start();
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_idea() {
        let idea: GeneratedIdea = parse(
            r#"{"title":"x","hook":"y","outline":["a","b"],"suggested_cta":"c","tags":["t1"]}"#,
        )
        .unwrap();
        assert_eq!(idea.title, "x");
        assert_eq!(idea.outline.len(), 2);
        assert_eq!(idea.tags, vec!["t1".to_string()]);
    }

    #[test]
    fn test_parse_invalid_json_keeps_raw() {
        let err = parse::<GeneratedIdea>("not json").unwrap_err();
        match err {
            DomainError::MalformedGenerationResponse { raw, reason } => {
                assert_eq!(raw, "not json");
                assert!(reason.starts_with("Failed to parse AI response as JSON"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let err = parse::<GeneratedIdea>(r#"{"hook":"y"}"#).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_GENERATION_RESPONSE");

        let err = parse::<GeneratedPost>(r#"{"hashtags":["a"]}"#).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_GENERATION_RESPONSE");
    }

    #[test]
    fn test_permissive_fields() {
        let post: GeneratedPost =
            parse(r#"{"content":"Hello","unexpected":{"nested":true}}"#).unwrap();
        assert_eq!(post.content, "Hello");
        assert!(post.hashtags.is_none());

        let variant: GeneratedVariant = parse(r#"{"content":"Hi"}"#).unwrap();
        assert_eq!(variant.variation_description, "");
    }

    #[test]
    fn test_code_fence_stripped() {
        let raw = "```json\n{\"content\":\"Fenced\"}\n```";
        let post: GeneratedPost = parse(raw).unwrap();
        assert_eq!(post.content, "Fenced");

        let raw = "```\n{\"content\":\"Plain fence\"}```";
        let post: GeneratedPost = parse(raw).unwrap();
        assert_eq!(post.content, "Plain fence");
    }

    #[test]
    fn test_single_line_fence() {
        let post: GeneratedPost = parse("```json{\"content\":\"x\"}```").unwrap();
        assert_eq!(post.content, "x");

        let post: GeneratedPost = parse("```{\"content\":\"y\"}```").unwrap();
        assert_eq!(post.content, "y");
    }
}
