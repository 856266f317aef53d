//! Test fixtures and data generators
//!
//! Seeds a complete configuration set and builds the requests the flows
//! take.

use postcraft_core::entities::{
    IdeaContext, LengthConstraints, NewPlatformProfile, NewPromptTemplate, NewVoiceProfile,
    OriginalPost, PlatformProfile, PlatformStructure, PromptTemplate, StructureSection,
    VoiceProfile,
};
use postcraft_core::value_objects::{EntityId, Platform, TaskType, UserId};
use postcraft_core::DomainError;
use postcraft_service::dto::{GenerateIdeaRequest, GeneratePostRequest, SourceType};
use postcraft_service::ServiceContext;

pub const IDEA_REPLY: &str = r#"{
    "title": "Why small releases win",
    "hook": "Nobody reads your launch post.",
    "outline": ["Big launches hide risk", "Small releases teach faster"],
    "suggested_cta": "What did your last release teach you?",
    "tags": ["shipping", "product"]
}"#;

pub const POST_REPLY: &str = r##"{
    "content": "Nobody reads your launch post.\n\nShip small instead.",
    "hashtags": ["#shipping"],
    "suggested_image_prompt": "A tiny rocket"
}"##;

pub const VARIANT_REPLY: &str = r#"{
    "content": "Ship small. Learn fast.",
    "variation_description": "Shorter and punchier"
}"#;

/// Rows created by [`seed_configuration`]
#[derive(Debug, Clone)]
pub struct SeededConfiguration {
    pub voice_profile: VoiceProfile,
    pub linkedin_profile: PlatformProfile,
    pub templates: Vec<PromptTemplate>,
}

impl SeededConfiguration {
    pub fn template(&self, task_type: TaskType) -> Option<&PromptTemplate> {
        self.templates.iter().find(|t| t.task_type == task_type)
    }
}

pub fn voice_profile_input() -> NewVoiceProfile {
    NewVoiceProfile {
        name: "Pragmatic founder".to_string(),
        persona: "A founder who has shipped and failed in public".to_string(),
        tone_rules: vec!["Confident, never smug".to_string()],
        readability_rules: vec!["One idea per sentence".to_string()],
        forbidden_language: Some(vec!["synergy".to_string(), "leverage".to_string()]),
        is_default: true,
    }
}

pub fn linkedin_profile_input() -> NewPlatformProfile {
    NewPlatformProfile {
        platform: Platform::Linkedin,
        name: "LinkedIn long form".to_string(),
        structure: PlatformStructure {
            sections: vec![
                StructureSection {
                    name: "Hook".to_string(),
                    description: "First line that stops the scroll".to_string(),
                    required: Some(true),
                },
                StructureSection {
                    name: "Story".to_string(),
                    description: "Short narrative".to_string(),
                    required: None,
                },
            ],
        },
        formatting_rules: vec!["Short paragraphs".to_string()],
        length_constraints: LengthConstraints {
            target_min: Some(800),
            target_max: Some(1300),
            hard_max: Some(3000),
            unit: None,
        },
        required_output_fields: vec!["content".to_string(), "hashtags".to_string()],
        is_default: true,
    }
}

/// Template body used for a task
pub fn template_content(task_type: TaskType) -> String {
    format!("You are writing for the {task_type} task. Respond with JSON.")
}

/// Seed a voice profile, a LinkedIn profile and one template per task
///
/// `owner = None` seeds system rows.
pub async fn seed_configuration(
    ctx: &ServiceContext,
    owner: Option<UserId>,
) -> Result<SeededConfiguration, DomainError> {
    let voice_profile = ctx
        .voice_profile_repo()
        .create(owner, voice_profile_input())
        .await?;
    let linkedin_profile = ctx
        .platform_profile_repo()
        .create(owner, linkedin_profile_input())
        .await?;

    let mut templates = Vec::with_capacity(TaskType::ALL.len());
    for task_type in TaskType::ALL {
        let template = ctx
            .prompt_template_repo()
            .create(
                owner,
                NewPromptTemplate {
                    task_type,
                    name: format!("{task_type} template"),
                    content: template_content(task_type),
                },
            )
            .await?;
        templates.push(template);
    }

    Ok(SeededConfiguration {
        voice_profile,
        linkedin_profile,
        templates,
    })
}

pub fn topic_idea_request(topic: &str) -> GenerateIdeaRequest {
    GenerateIdeaRequest {
        source_type: SourceType::Topic,
        topic: Some(topic.to_string()),
        audience: Some("Early-stage founders".to_string()),
        angle: None,
        example: None,
        cta_preference: None,
        source_text: None,
        trend_summary: None,
    }
}

pub fn linkedin_post_request() -> GeneratePostRequest {
    GeneratePostRequest {
        platform: Platform::Linkedin,
        voice_profile_id: None,
        additional_context: None,
    }
}

pub fn sample_idea() -> IdeaContext {
    IdeaContext {
        id: EntityId::new(),
        title: "Why small releases win".to_string(),
        hook: Some("Nobody reads your launch post.".to_string()),
        outline: vec![
            "Big launches hide risk".to_string(),
            "Small releases teach faster".to_string(),
        ],
        suggested_cta: Some("What did your last release teach you?".to_string()),
    }
}

pub fn sample_post(platform: Platform) -> OriginalPost {
    OriginalPost {
        id: EntityId::new(),
        content: "Nobody reads your launch post. Ship small instead.".to_string(),
        platform,
    }
}
