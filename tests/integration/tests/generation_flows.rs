//! End-to-end generation flows over in-memory repositories
//!
//! Run with: cargo test -p integration-tests --test generation_flows

use integration_tests::*;
use postcraft_core::entities::{PromptSnapshot, VoiceProfileUpdate};
use postcraft_core::value_objects::{AuditAction, Platform, TaskType, UserId, VariationType};
use postcraft_core::DomainError;
use postcraft_service::dto::{
    AuditLogQuery, GenerateIdeaRequest, GenerateVariantRequest, RepurposePostRequest,
    RewritePostRequest, SourceType,
};
use postcraft_service::{AuditService, GenerationService, ServiceError};

const EXPECTED_LINKEDIN_PROMPT: &str = "\
=== TASK ===
You are writing for the draft_linkedin task. Respond with JSON.

=== VOICE PROFILE ===
PERSONA: A founder who has shipped and failed in public

TONE RULES:
- Confident, never smug

READABILITY RULES:
- One idea per sentence

FORBIDDEN LANGUAGE (never use these words/phrases):
synergy, leverage

=== PLATFORM PROFILE ===
PLATFORM: LINKEDIN

STRUCTURE:
- Hook (required): First line that stops the scroll
- Story (optional): Short narrative

FORMATTING RULES:
- Short paragraphs

LENGTH CONSTRAINTS:
- Target: 800-1300 characters
- Hard max: 3000 characters

REQUIRED OUTPUT FIELDS:
- content
- hashtags

=== USER INPUT ===
TOPIC: Why small releases win
ANGLE: Nobody reads your launch post.
EXAMPLE/REFERENCE: Big launches hide risk
Small releases teach faster
CTA PREFERENCE: What did your last release teach you?";

// ============================================================================
// Drafting
// ============================================================================

#[tokio::test]
async fn test_draft_linkedin_prompt_and_audit() {
    let client = ScriptedGenerationClient::new();
    client.reply(POST_REPLY);
    let ctx = memory_context(client.clone());
    let seeded = seed_configuration(&ctx, None).await.unwrap();
    let user = UserId::new();
    let idea = sample_idea();

    let response = GenerationService::new(&ctx)
        .generate_post(user, idea.clone(), linkedin_post_request())
        .await
        .unwrap();

    assert_eq!(client.last_prompt().unwrap(), EXPECTED_LINKEDIN_PROMPT);
    assert_eq!(response.model, SCRIPTED_MODEL);
    assert_eq!(response.post.hashtags, Some(vec!["#shipping".to_string()]));

    let template = seeded.template(TaskType::DraftLinkedin).unwrap();
    assert_eq!(response.versions.task_template_id, template.id);
    assert_eq!(response.versions.voice_profile_id, seeded.voice_profile.id);
    assert_eq!(
        response.versions.platform_profile_id,
        Some(seeded.linkedin_profile.id)
    );

    let entry = AuditService::new(&ctx)
        .get(user, response.audit_log_id)
        .await
        .unwrap();
    assert_eq!(entry.action, AuditAction::GeneratePost);
    assert_eq!(entry.entity_id, response.post_id);
    assert_eq!(entry.model_used, SCRIPTED_MODEL);
    assert_eq!(entry.total_tokens, Some(600));
    assert_eq!(entry.prompt_snapshot.composed_prompt(), EXPECTED_LINKEDIN_PROMPT);
    match &entry.prompt_snapshot {
        PromptSnapshot::Post {
            idea: recorded,
            platform_profile,
            ..
        } => {
            assert_eq!(recorded, &idea);
            assert_eq!(platform_profile.as_ref().unwrap().version, 1);
        }
        other => panic!("unexpected snapshot: {other:?}"),
    }
}

#[tokio::test]
async fn test_composition_is_deterministic() {
    let client = ScriptedGenerationClient::new();
    client.reply(POST_REPLY).reply(POST_REPLY);
    let ctx = memory_context(client.clone());
    seed_configuration(&ctx, None).await.unwrap();
    let service = GenerationService::new(&ctx);
    let idea = sample_idea();

    service
        .generate_post(UserId::new(), idea.clone(), linkedin_post_request())
        .await
        .unwrap();
    service
        .generate_post(UserId::new(), idea, linkedin_post_request())
        .await
        .unwrap();

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
}

#[tokio::test]
async fn test_missing_configuration_never_calls_backend() {
    let client = ScriptedGenerationClient::new();
    let ctx = memory_context(client.clone());
    let service = GenerationService::new(&ctx);

    let err = service
        .generate_idea(UserId::new(), topic_idea_request("Shipping"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::ConfigurationMissing(_))
    ));

    // templates and voice exist, but nothing for instagram
    seed_configuration(&ctx, None).await.unwrap();
    let mut request = linkedin_post_request();
    request.platform = Platform::Instagram;
    let err = service
        .generate_post(UserId::new(), sample_idea(), request)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFIGURATION_MISSING");
    assert_eq!(err.status_code(), 422);

    assert_eq!(client.calls(), 0);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_malformed_response_writes_no_audit_row() {
    let client = ScriptedGenerationClient::new();
    client.reply(r#"{"hook":"title is missing"}"#);
    let (ctx, audit) = memory_context_with_audit(client.clone());
    seed_configuration(&ctx, None).await.unwrap();

    let err = GenerationService::new(&ctx)
        .generate_idea(UserId::new(), topic_idea_request("Shipping"))
        .await
        .unwrap_err();

    match err.as_domain() {
        Some(DomainError::MalformedGenerationResponse { raw, .. }) => {
            assert_eq!(raw, r#"{"hook":"title is missing"}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status_code(), 502);
    assert!(audit.is_empty());
}

#[tokio::test]
async fn test_backend_failure_surfaces() {
    let client = ScriptedGenerationClient::new();
    client.fail("backend returned 503 Service Unavailable: overloaded");
    let (ctx, audit) = memory_context_with_audit(client);
    seed_configuration(&ctx, None).await.unwrap();

    let err = GenerationService::new(&ctx)
        .generate_idea(UserId::new(), topic_idea_request("Shipping"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "GENERATION_FAILED");
    assert!(audit.is_empty());
}

#[tokio::test]
async fn test_audit_failure_is_reported_with_entity_id() {
    let client = ScriptedGenerationClient::new();
    client.reply(IDEA_REPLY);
    let (ctx, audit) = memory_context_with_audit(client.clone());
    seed_configuration(&ctx, None).await.unwrap();
    audit.set_failing(true);

    let err = GenerationService::new(&ctx)
        .generate_idea(UserId::new(), topic_idea_request("Shipping"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::AuditPersistenceFailed { .. })
    ));
    assert_eq!(err.error_code(), "AUDIT_PERSISTENCE_FAILED");
    assert_eq!(err.status_code(), 500);
    assert_eq!(client.calls(), 1);
    assert!(audit.is_empty());
}

// ============================================================================
// Versions
// ============================================================================

#[tokio::test]
async fn test_audit_records_versions_in_use() {
    let client = ScriptedGenerationClient::new();
    client.reply(IDEA_REPLY).reply(IDEA_REPLY);
    let ctx = memory_context(client);
    let user = UserId::new();
    let seeded = seed_configuration(&ctx, Some(user)).await.unwrap();
    let service = GenerationService::new(&ctx);

    let first = service
        .generate_idea(user, topic_idea_request("Shipping"))
        .await
        .unwrap();

    let v2 = ctx
        .voice_profile_repo()
        .update(
            seeded.voice_profile.id,
            user,
            VoiceProfileUpdate {
                persona: Some("A founder who now ships weekly".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let second = service
        .generate_idea(user, topic_idea_request("Shipping"))
        .await
        .unwrap();

    assert_eq!(first.versions.voice_profile_version, 1);
    assert_eq!(second.versions.voice_profile_version, 2);
    assert_eq!(second.versions.voice_profile_id, v2.id);

    let audit = AuditService::new(&ctx);
    let first_entry = audit.get(user, first.audit_log_id).await.unwrap();
    let second_entry = audit.get(user, second.audit_log_id).await.unwrap();
    assert_eq!(
        first_entry.template_versions.unwrap().voice_profile_version,
        Some(1)
    );
    assert_eq!(
        second_entry.template_versions.unwrap().voice_profile_version,
        Some(2)
    );
    assert!(first_entry
        .prompt_snapshot
        .composed_prompt()
        .contains("PERSONA: A founder who has shipped and failed in public"));
    assert!(second_entry
        .prompt_snapshot
        .composed_prompt()
        .contains("PERSONA: A founder who now ships weekly"));
}

// ============================================================================
// Other flows
// ============================================================================

#[tokio::test]
async fn test_idea_from_long_transcript_is_truncated() {
    let client = ScriptedGenerationClient::new();
    client.reply(IDEA_REPLY);
    let ctx = memory_context(client.clone());
    seed_configuration(&ctx, None).await.unwrap();

    let transcript = "word ".repeat(4_000);
    let request = GenerateIdeaRequest {
        source_type: SourceType::Youtube,
        source_text: Some(transcript),
        ..topic_idea_request("Shipping")
    };
    GenerationService::new(&ctx)
        .generate_idea(UserId::new(), request)
        .await
        .unwrap();

    let prompt = client.last_prompt().unwrap();
    assert!(prompt.ends_with("...\n\n[Source truncated due to length]"));
    assert!(prompt.chars().count() < 16_000);
}

#[tokio::test]
async fn test_variant_rewrite_and_repurpose() {
    let client = ScriptedGenerationClient::new();
    client
        .reply(VARIANT_REPLY)
        .reply(POST_REPLY)
        .reply(POST_REPLY);
    let ctx = memory_context(client.clone());
    let user = UserId::new();
    seed_configuration(&ctx, None).await.unwrap();
    let mut instagram = linkedin_profile_input();
    instagram.platform = Platform::Instagram;
    instagram.name = "Instagram caption".to_string();
    ctx.platform_profile_repo()
        .create(None, instagram)
        .await
        .unwrap();

    let service = GenerationService::new(&ctx);
    let original = sample_post(Platform::Linkedin);

    let variant = service
        .generate_variant(
            user,
            original.clone(),
            GenerateVariantRequest {
                variation_type: VariationType::Tone,
                variation_instruction: Some("More playful".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(variant.variant.variation_description, "Shorter and punchier");
    assert!(client
        .last_prompt()
        .unwrap()
        .contains("VARIATION INSTRUCTION:\nMore playful"));

    let rewritten = service
        .rewrite_post(user, original.clone(), RewritePostRequest::default())
        .await
        .unwrap();
    assert_eq!(rewritten.post_id, original.id);
    assert!(client
        .last_prompt()
        .unwrap()
        .starts_with("=== TASK ===\nYou are writing for the rewriting task."));

    let repurposed = service
        .repurpose_post(
            user,
            original.clone(),
            RepurposePostRequest {
                target_platform: Platform::Instagram,
                instruction: Some("Make it visual".to_string()),
            },
        )
        .await
        .unwrap();
    assert_ne!(repurposed.post_id, original.id);
    assert_eq!(repurposed.platform, Platform::Instagram);
    assert!(client.last_prompt().unwrap().contains("PLATFORM: INSTAGRAM"));

    let entries = AuditService::new(&ctx)
        .list(user, AuditLogQuery::default())
        .await
        .unwrap();
    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Repurpose,
            AuditAction::Rewrite,
            AuditAction::GenerateVariants
        ]
    );
}

#[tokio::test]
async fn test_audit_listing_newest_first_and_stable() {
    let client = ScriptedGenerationClient::new();
    for _ in 0..3 {
        client.reply(IDEA_REPLY);
    }
    let ctx = memory_context(client);
    seed_configuration(&ctx, None).await.unwrap();
    let user = UserId::new();
    let service = GenerationService::new(&ctx);

    let mut ids = Vec::new();
    for topic in ["one", "two", "three"] {
        let response = service
            .generate_idea(user, topic_idea_request(topic))
            .await
            .unwrap();
        ids.push(response.audit_log_id);
    }

    let audit = AuditService::new(&ctx);
    let listed: Vec<_> = audit
        .list(user, AuditLogQuery::default())
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);

    let again: Vec<_> = audit
        .list(user, AuditLogQuery::default())
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(again, listed);

    let page = audit
        .list(
            user,
            AuditLogQuery {
                limit: Some(1),
                offset: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, listed[1]);

    // another user sees nothing
    assert!(audit
        .list(UserId::new(), AuditLogQuery::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_generation_options_forwarded() {
    let client = ScriptedGenerationClient::new();
    client.reply(IDEA_REPLY);
    let ctx = memory_context(client.clone());
    seed_configuration(&ctx, None).await.unwrap();

    GenerationService::new(&ctx)
        .generate_idea(UserId::new(), topic_idea_request("Shipping"))
        .await
        .unwrap();

    assert_eq!(client.last_options().unwrap(), *ctx.generation_options());
}
