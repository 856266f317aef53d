//! Layered prompt composer
//!
//! Sections, in fixed order and separated by one blank line:
//!
//! 1. `=== TASK ===` with the template content verbatim
//! 2. `=== VOICE PROFILE ===`
//! 3. `=== PLATFORM PROFILE ===` (only when a platform profile is given)
//! 4. `=== USER INPUT ===`
//! 5. `=== CURRENT TRENDS ===` (only for a non-empty trend summary)

use serde::{Deserialize, Serialize};

use super::user_input::{present, UserInput};
use crate::entities::{PlatformProfile, PromptTemplate, VoiceProfile};
use crate::error::DomainError;
use crate::value_objects::{PlatformProfileId, PromptTemplateId, TaskType, VoiceProfileId};

const SECTION_SEPARATOR: &str = "\n\n";

/// Exact ids and versions of the rows that produced a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionManifest {
    pub task_template_id: PromptTemplateId,
    pub task_template_version: i32,
    pub voice_profile_id: VoiceProfileId,
    pub voice_profile_version: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_profile_id: Option<PlatformProfileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_profile_version: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub prompt: String,
    pub versions: VersionManifest,
}

/// Borrowed inputs for one composition
#[derive(Debug, Clone, Copy)]
pub struct CompositionInput<'a> {
    pub task_type: TaskType,
    pub voice_profile: Option<&'a VoiceProfile>,
    pub prompt_template: Option<&'a PromptTemplate>,
    pub user_input: &'a UserInput,
    pub platform_profile: Option<&'a PlatformProfile>,
    pub trend_summary: Option<&'a str>,
}

/// Compose the layered prompt
///
/// Fails only when the voice profile or the template is missing. Rows are
/// used as given; callers are responsible for picking active ones.
pub fn compose(input: CompositionInput<'_>) -> Result<ComposedPrompt, DomainError> {
    let template = input.prompt_template.ok_or_else(|| {
        DomainError::ConfigurationMissing(format!(
            "prompt template for task {}",
            input.task_type
        ))
    })?;
    let voice = input
        .voice_profile
        .ok_or_else(|| DomainError::ConfigurationMissing("voice profile".to_string()))?;

    let mut sections = Vec::with_capacity(5);
    sections.push(format!("=== TASK ===\n{}", template.content));
    sections.push(format_voice_profile(voice));
    if let Some(platform) = input.platform_profile {
        sections.push(format_platform_profile(platform));
    }
    sections.push(format_user_input(input.user_input));
    if let Some(trends) = present(input.trend_summary) {
        sections.push(format!("=== CURRENT TRENDS ===\n{trends}"));
    }

    Ok(ComposedPrompt {
        prompt: sections.join(SECTION_SEPARATOR),
        versions: VersionManifest {
            task_template_id: template.id,
            task_template_version: template.version,
            voice_profile_id: voice.id,
            voice_profile_version: voice.version,
            platform_profile_id: input.platform_profile.map(|p| p.id),
            platform_profile_version: input.platform_profile.map(|p| p.version),
        },
    })
}

fn push_bullets(lines: &mut Vec<String>, header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("\n{header}"));
    lines.extend(items.iter().map(|item| format!("- {item}")));
}

fn format_voice_profile(profile: &VoiceProfile) -> String {
    let mut lines = vec![
        "=== VOICE PROFILE ===".to_string(),
        format!("PERSONA: {}", profile.persona),
    ];

    push_bullets(&mut lines, "TONE RULES:", &profile.tone_rules);
    push_bullets(&mut lines, "READABILITY RULES:", &profile.readability_rules);

    if let Some(forbidden) = profile
        .forbidden_language
        .as_ref()
        .filter(|words| !words.is_empty())
    {
        lines.push("\nFORBIDDEN LANGUAGE (never use these words/phrases):".to_string());
        lines.push(forbidden.join(", "));
    }

    lines.join("\n")
}

fn format_platform_profile(profile: &PlatformProfile) -> String {
    let mut lines = vec![
        "=== PLATFORM PROFILE ===".to_string(),
        format!("PLATFORM: {}", profile.platform.as_str().to_uppercase()),
    ];

    let sections = &profile.structure.sections;
    if !sections.is_empty() {
        lines.push("\nSTRUCTURE:".to_string());
        for section in sections {
            let required = if section.required.unwrap_or(false) {
                "required"
            } else {
                "optional"
            };
            lines.push(format!(
                "- {} ({required}): {}",
                section.name, section.description
            ));
        }
    }

    push_bullets(&mut lines, "FORMATTING RULES:", &profile.formatting_rules);

    let constraints = &profile.length_constraints;
    let unit = constraints.unit_or_default();
    let mut length_lines = Vec::new();
    if let (Some(min), Some(max)) = (constraints.target_min, constraints.target_max) {
        length_lines.push(format!("- Target: {min}-{max} {unit}"));
    }
    if let Some(hard_max) = constraints.hard_max {
        length_lines.push(format!("- Hard max: {hard_max} {unit}"));
    }
    if !length_lines.is_empty() {
        lines.push("\nLENGTH CONSTRAINTS:".to_string());
        lines.append(&mut length_lines);
    }

    push_bullets(
        &mut lines,
        "REQUIRED OUTPUT FIELDS:",
        &profile.required_output_fields,
    );

    lines.join("\n")
}

fn format_user_input(input: &UserInput) -> String {
    let mut lines = vec!["=== USER INPUT ===".to_string()];

    let labelled = [
        ("TOPIC", input.topic.as_deref()),
        ("AUDIENCE", input.audience.as_deref()),
        ("ANGLE", input.angle.as_deref()),
        ("EXAMPLE/REFERENCE", input.example.as_deref()),
        ("CTA PREFERENCE", input.cta_preference.as_deref()),
    ];
    for (label, value) in labelled {
        if let Some(value) = present(value) {
            lines.push(format!("{label}: {value}"));
        }
    }

    // Only the title line opens the idea block with a blank line
    if let Some(title) = present(input.idea_title.as_deref()) {
        lines.push(format!("\nIDEA TITLE: {title}"));
    }
    if let Some(hook) = present(input.idea_hook.as_deref()) {
        lines.push(format!("IDEA HOOK: {hook}"));
    }
    if let Some(outline) = input.idea_outline.as_ref().filter(|o| !o.is_empty()) {
        lines.push("IDEA OUTLINE:".to_string());
        lines.extend(
            outline
                .iter()
                .enumerate()
                .map(|(i, point)| format!("{}. {point}", i + 1)),
        );
    }
    if let Some(cta) = present(input.idea_cta.as_deref()) {
        lines.push(format!("IDEA CTA: {cta}"));
    }

    lines.join("\n")
}
