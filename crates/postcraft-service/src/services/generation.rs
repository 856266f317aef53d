//! Generation service
//!
//! Each flow runs strictly in order: resolve configuration, compose, call
//! the generation backend, parse, record the audit entry. Configuration is
//! resolved before the backend is called so a missing profile or template
//! never costs tokens. The audit entry is written before anything is
//! returned; the caller persists the artifact under the returned id.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use postcraft_core::entities::{
    AuditLogEntry, IdeaContext, NewAuditEntry, OriginalPost, PromptSnapshot, TemplateVersions,
};
use postcraft_core::parser::{parse, GeneratedIdea, GeneratedPost, GeneratedVariant};
use postcraft_core::prompt::{compose, compose_variant, CompositionInput, UserInput, VariantPrompt};
use postcraft_core::traits::Generation;
use postcraft_core::value_objects::{EntityId, TaskType, UserId};
use postcraft_core::DomainError;

use crate::dto::{
    GenerateIdeaRequest, GeneratePostRequest, GenerateVariantRequest, IdeaGenerationResponse,
    PostGenerationResponse, RepurposePostRequest, RewritePostRequest, VariantGenerationResponse,
};

use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::profile::{missing_platform_profile, ProfileService};
use super::source_text::truncate_source;
use super::template::TemplateService;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Generation service
pub struct GenerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GenerationService<'a> {
    /// Create a new GenerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Generate a content idea
    ///
    /// A trend summary switches the task to trend ideation. Without an
    /// explicit example the (truncated) source text is used as reference.
    #[instrument(skip(self, request), fields(source_type = ?request.source_type))]
    pub async fn generate_idea(
        &self,
        user_id: UserId,
        request: GenerateIdeaRequest,
    ) -> ServiceResult<IdeaGenerationResponse> {
        request.validate()?;

        let source_text = request
            .source_text
            .as_deref()
            .filter(|text| !text.trim().is_empty());
        if request.source_type.requires_source_text() && source_text.is_none() {
            return Err(ServiceError::validation(
                "source_text is required for transcript and document sources",
            ));
        }

        let trend_summary = request
            .trend_summary
            .as_deref()
            .filter(|summary| !summary.trim().is_empty());
        let task_type = if trend_summary.is_some() {
            TaskType::TrendIdeation
        } else {
            TaskType::Ideation
        };

        let max_source_chars = self.ctx.audit_config().max_source_chars;
        let example = non_empty(request.example).or_else(|| {
            source_text.map(|text| truncate_source(text, max_source_chars).into_owned())
        });
        let user_input = UserInput {
            topic: request.topic,
            audience: request.audience,
            angle: request.angle,
            example,
            cta_preference: request.cta_preference,
            ..Default::default()
        };

        let voice = ProfileService::new(self.ctx)
            .resolve_voice_profile(user_id, None)
            .await?;
        let template = TemplateService::new(self.ctx)
            .resolve_template(user_id, task_type)
            .await?;

        let composed = compose(CompositionInput {
            task_type,
            voice_profile: Some(&voice),
            prompt_template: Some(&template),
            user_input: &user_input,
            platform_profile: None,
            trend_summary,
        })?;

        let (generation, idea) = self.round_trip::<GeneratedIdea>(&composed.prompt).await?;

        let idea_id = EntityId::new();
        let snapshot = PromptSnapshot::Idea {
            task_template: (&template).into(),
            voice_profile: (&voice).into(),
            user_input,
            trend_summary: trend_summary.map(str::to_string),
            composed_prompt: composed.prompt,
        };
        let entry = self
            .record(
                user_id,
                idea_id,
                snapshot,
                &generation,
                &idea,
                Some(TemplateVersions::from(&composed.versions)),
            )
            .await?;

        info!(
            idea_id = %idea_id,
            audit_log_id = %entry.id,
            task_type = %task_type,
            template_version = composed.versions.task_template_version,
            voice_profile_version = composed.versions.voice_profile_version,
            total_tokens = generation.usage.total(),
            "Idea generated"
        );

        Ok(IdeaGenerationResponse {
            idea_id,
            idea,
            audit_log_id: entry.id,
            model: generation.model,
            usage: generation.usage,
            versions: composed.versions,
        })
    }

    /// Draft a post for one platform from an idea
    #[instrument(skip(self, idea, request), fields(idea_id = %idea.id, platform = %request.platform))]
    pub async fn generate_post(
        &self,
        user_id: UserId,
        idea: IdeaContext,
        request: GeneratePostRequest,
    ) -> ServiceResult<PostGenerationResponse> {
        request.validate()?;

        let task_type = TaskType::draft_for(request.platform);
        let profiles = ProfileService::new(self.ctx);
        let voice = profiles
            .resolve_voice_profile(user_id, request.voice_profile_id)
            .await?;
        let platform = profiles
            .resolve_platform_profile(user_id, request.platform)
            .await?
            .ok_or_else(|| missing_platform_profile(request.platform))?;
        let template = TemplateService::new(self.ctx)
            .resolve_template(user_id, task_type)
            .await?;

        let user_input = UserInput {
            topic: Some(idea.title.clone()),
            audience: non_empty(request.additional_context),
            angle: idea.hook.clone(),
            example: (!idea.outline.is_empty()).then(|| idea.outline.join("\n")),
            cta_preference: idea.suggested_cta.clone(),
            ..Default::default()
        };

        let composed = compose(CompositionInput {
            task_type,
            voice_profile: Some(&voice),
            prompt_template: Some(&template),
            user_input: &user_input,
            platform_profile: Some(&platform),
            trend_summary: None,
        })?;

        let (generation, post) = self.round_trip::<GeneratedPost>(&composed.prompt).await?;

        let post_id = EntityId::new();
        let snapshot = PromptSnapshot::Post {
            task_template: (&template).into(),
            voice_profile: (&voice).into(),
            platform_profile: Some((&platform).into()),
            user_input,
            idea,
            composed_prompt: composed.prompt,
        };
        let entry = self
            .record(
                user_id,
                post_id,
                snapshot,
                &generation,
                &post,
                Some(TemplateVersions::from(&composed.versions)),
            )
            .await?;

        info!(
            post_id = %post_id,
            audit_log_id = %entry.id,
            task_type = %task_type,
            template_version = composed.versions.task_template_version,
            voice_profile_version = composed.versions.voice_profile_version,
            platform_profile_version = ?composed.versions.platform_profile_version,
            total_tokens = generation.usage.total(),
            "Post generated"
        );

        Ok(PostGenerationResponse {
            post_id,
            platform: request.platform,
            post,
            audit_log_id: entry.id,
            model: generation.model,
            usage: generation.usage,
            versions: composed.versions,
        })
    }

    /// Generate a variant of an existing post
    ///
    /// The audit entry points at the original post; the returned variant id
    /// is fresh.
    #[instrument(skip(self, original, request), fields(post_id = %original.id, variation_type = %request.variation_type))]
    pub async fn generate_variant(
        &self,
        user_id: UserId,
        original: OriginalPost,
        request: GenerateVariantRequest,
    ) -> ServiceResult<VariantGenerationResponse> {
        request.validate()?;

        let VariantPrompt {
            prompt,
            instruction,
        } = compose_variant(
            &original,
            request.variation_type,
            request.variation_instruction.as_deref(),
        );

        let (generation, variant) = self.round_trip::<GeneratedVariant>(&prompt).await?;

        let post_id = original.id;
        let snapshot = PromptSnapshot::Variant {
            original_post: original,
            variation_type: request.variation_type,
            variation_instruction: instruction,
            composed_prompt: prompt,
        };
        let entry = self
            .record(user_id, post_id, snapshot, &generation, &variant, None)
            .await?;

        let variant_id = EntityId::new();
        info!(
            variant_id = %variant_id,
            audit_log_id = %entry.id,
            total_tokens = generation.usage.total(),
            "Variant generated"
        );

        Ok(VariantGenerationResponse {
            variant_id,
            post_id,
            variant,
            audit_log_id: entry.id,
            model: generation.model,
            usage: generation.usage,
        })
    }

    /// Rewrite a post in place
    ///
    /// The original platform's profile is layered in when one is active.
    #[instrument(skip(self, original, request), fields(post_id = %original.id))]
    pub async fn rewrite_post(
        &self,
        user_id: UserId,
        original: OriginalPost,
        request: RewritePostRequest,
    ) -> ServiceResult<PostGenerationResponse> {
        request.validate()?;

        let task_type = TaskType::Rewriting;
        let profiles = ProfileService::new(self.ctx);
        let voice = profiles
            .resolve_voice_profile(user_id, request.voice_profile_id)
            .await?;
        let platform = profiles
            .resolve_platform_profile(user_id, original.platform)
            .await?;
        let template = TemplateService::new(self.ctx)
            .resolve_template(user_id, task_type)
            .await?;

        let user_input = UserInput {
            angle: non_empty(request.instruction),
            example: Some(original.content.clone()),
            ..Default::default()
        };

        let composed = compose(CompositionInput {
            task_type,
            voice_profile: Some(&voice),
            prompt_template: Some(&template),
            user_input: &user_input,
            platform_profile: platform.as_ref(),
            trend_summary: None,
        })?;

        let (generation, post) = self.round_trip::<GeneratedPost>(&composed.prompt).await?;

        let post_id = original.id;
        let post_platform = original.platform;
        let snapshot = PromptSnapshot::Rewrite {
            task_template: (&template).into(),
            voice_profile: (&voice).into(),
            platform_profile: platform.as_ref().map(Into::into),
            user_input,
            original_post: original,
            composed_prompt: composed.prompt,
        };
        let entry = self
            .record(
                user_id,
                post_id,
                snapshot,
                &generation,
                &post,
                Some(TemplateVersions::from(&composed.versions)),
            )
            .await?;

        info!(
            post_id = %post_id,
            audit_log_id = %entry.id,
            template_version = composed.versions.task_template_version,
            total_tokens = generation.usage.total(),
            "Post rewritten"
        );

        Ok(PostGenerationResponse {
            post_id,
            platform: post_platform,
            post,
            audit_log_id: entry.id,
            model: generation.model,
            usage: generation.usage,
            versions: composed.versions,
        })
    }

    /// Adapt a post for another platform
    ///
    /// The result is a new post on the target platform.
    #[instrument(skip(self, original, request), fields(post_id = %original.id, target = %request.target_platform))]
    pub async fn repurpose_post(
        &self,
        user_id: UserId,
        original: OriginalPost,
        request: RepurposePostRequest,
    ) -> ServiceResult<PostGenerationResponse> {
        request.validate()?;

        if request.target_platform == original.platform {
            return Err(ServiceError::validation(format!(
                "post is already on {}",
                original.platform
            )));
        }

        let task_type = TaskType::Repurposing;
        let profiles = ProfileService::new(self.ctx);
        let voice = profiles.resolve_voice_profile(user_id, None).await?;
        let platform = profiles
            .resolve_platform_profile(user_id, request.target_platform)
            .await?
            .ok_or_else(|| missing_platform_profile(request.target_platform))?;
        let template = TemplateService::new(self.ctx)
            .resolve_template(user_id, task_type)
            .await?;

        let user_input = UserInput {
            angle: non_empty(request.instruction),
            example: Some(original.content.clone()),
            ..Default::default()
        };

        let composed = compose(CompositionInput {
            task_type,
            voice_profile: Some(&voice),
            prompt_template: Some(&template),
            user_input: &user_input,
            platform_profile: Some(&platform),
            trend_summary: None,
        })?;

        let (generation, post) = self.round_trip::<GeneratedPost>(&composed.prompt).await?;

        let post_id = EntityId::new();
        let snapshot = PromptSnapshot::Repurpose {
            task_template: (&template).into(),
            voice_profile: (&voice).into(),
            platform_profile: (&platform).into(),
            user_input,
            original_post: original,
            composed_prompt: composed.prompt,
        };
        let entry = self
            .record(
                user_id,
                post_id,
                snapshot,
                &generation,
                &post,
                Some(TemplateVersions::from(&composed.versions)),
            )
            .await?;

        info!(
            post_id = %post_id,
            audit_log_id = %entry.id,
            platform_profile_version = platform.version,
            total_tokens = generation.usage.total(),
            "Post repurposed"
        );

        Ok(PostGenerationResponse {
            post_id,
            platform: request.target_platform,
            post,
            audit_log_id: entry.id,
            model: generation.model,
            usage: generation.usage,
            versions: composed.versions,
        })
    }

    /// One backend call followed by parsing into `T`
    async fn round_trip<T: DeserializeOwned>(
        &self,
        prompt: &str,
    ) -> ServiceResult<(Generation, T)> {
        let generation = self
            .ctx
            .generation_client()
            .generate(prompt, self.ctx.generation_options())
            .await?;

        let parsed = parse::<T>(&generation.content).inspect_err(|e| {
            warn!(
                error = %e,
                model = %generation.model,
                total_tokens = generation.usage.total(),
                "Discarding unparseable generation"
            );
        })?;

        Ok((generation, parsed))
    }

    async fn record<T: Serialize>(
        &self,
        user_id: UserId,
        entity_id: EntityId,
        snapshot: PromptSnapshot,
        generation: &Generation,
        output: &T,
        template_versions: Option<TemplateVersions>,
    ) -> ServiceResult<AuditLogEntry> {
        let action = snapshot.action();
        let response_snapshot =
            serde_json::to_value(output).map_err(|e| ServiceError::internal(e.to_string()))?;

        let input = NewAuditEntry {
            action,
            entity_type: action.entity_type(),
            entity_id,
            prompt_snapshot: snapshot,
            model_used: generation.model.clone(),
            usage: Some(generation.usage),
            response_snapshot: Some(response_snapshot),
            template_versions,
        };

        // After generation an inconsistent entry counts as an audit failure
        let result = match input.check_consistency() {
            Ok(()) => AuditService::new(self.ctx).record(user_id, input).await,
            Err(e) => Err(DomainError::AuditPersistenceFailed {
                reason: e.to_string(),
                entity_id,
            }
            .into()),
        };

        result.inspect_err(|e| {
            warn!(
                error = %e,
                entity_id = %entity_id,
                input_tokens = generation.usage.input_tokens,
                output_tokens = generation.usage.output_tokens,
                "Generation succeeded but its audit entry was not recorded"
            );
        })
    }
}
