//! Generation flows against PostgreSQL
//!
//! These tests require a running PostgreSQL instance and `DATABASE_URL`.
//! Configuration is seeded per user so tests never share rows.
//!
//! Run with: cargo test -p integration-tests --test postgres_flows

use integration_tests::*;
use postcraft_core::entities::VoiceProfileUpdate;
use postcraft_core::value_objects::{AuditAction, UserId};
use postcraft_service::dto::AuditLogQuery;
use postcraft_service::{AuditService, GenerationService};

#[tokio::test]
async fn test_idea_then_post_round_trip() {
    if !check_test_env() {
        return;
    }

    let pool = test_pool().await.expect("Failed to connect");
    let client = ScriptedGenerationClient::new();
    client.reply(IDEA_REPLY).reply(POST_REPLY);
    let ctx = postgres_context(&pool, client.clone());
    let user = UserId::new();
    seed_configuration(&ctx, Some(user)).await.unwrap();

    let service = GenerationService::new(&ctx);
    let idea = service
        .generate_idea(user, topic_idea_request("Shipping"))
        .await
        .unwrap();
    let post = service
        .generate_post(user, sample_idea(), linkedin_post_request())
        .await
        .unwrap();

    let entries = AuditService::new(&ctx)
        .list(user, AuditLogQuery::default())
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, post.audit_log_id);
    assert_eq!(entries[0].action, AuditAction::GeneratePost);
    assert_eq!(entries[1].id, idea.audit_log_id);
    assert_eq!(entries[1].entity_id, idea.idea_id);

    // snapshot survives the JSON column unchanged
    let stored = AuditService::new(&ctx)
        .get(user, post.audit_log_id)
        .await
        .unwrap();
    assert_eq!(
        stored.prompt_snapshot.composed_prompt(),
        client.last_prompt().unwrap()
    );
    assert_eq!(
        stored.template_versions.unwrap().platform_profile_version,
        Some(1)
    );
}

#[tokio::test]
async fn test_versions_follow_updates() {
    if !check_test_env() {
        return;
    }

    let pool = test_pool().await.expect("Failed to connect");
    let client = ScriptedGenerationClient::new();
    client.reply(IDEA_REPLY).reply(IDEA_REPLY);
    let ctx = postgres_context(&pool, client);
    let user = UserId::new();
    let seeded = seed_configuration(&ctx, Some(user)).await.unwrap();
    let service = GenerationService::new(&ctx);

    let before = service
        .generate_idea(user, topic_idea_request("Shipping"))
        .await
        .unwrap();
    ctx.voice_profile_repo()
        .update(
            seeded.voice_profile.id,
            user,
            VoiceProfileUpdate {
                tone_rules: Some(vec!["Warmer".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let after = service
        .generate_idea(user, topic_idea_request("Shipping"))
        .await
        .unwrap();

    assert_eq!(before.versions.voice_profile_version, 1);
    assert_eq!(after.versions.voice_profile_version, 2);
    assert_eq!(
        before.versions.task_template_version,
        after.versions.task_template_version
    );
}
