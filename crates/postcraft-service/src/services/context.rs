//! Service context - dependency container for services
//!
//! Holds the repositories, the generation client and the generation and
//! audit settings every flow needs.

use std::sync::Arc;

use postcraft_common::{AuditConfig, GenerationConfig};
use postcraft_core::traits::{
    AuditLogRepository, GenerationClient, GenerationOptions, PlatformProfileRepository,
    PromptTemplateRepository, VoiceProfileRepository,
};
use postcraft_db::{
    InMemoryAuditLogRepository, InMemoryPlatformProfileRepository,
    InMemoryPromptTemplateRepository, InMemoryVoiceProfileRepository, PgAuditLogRepository,
    PgPlatformProfileRepository, PgPool, PgPromptTemplateRepository, PgVoiceProfileRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    voice_profile_repo: Arc<dyn VoiceProfileRepository>,
    platform_profile_repo: Arc<dyn PlatformProfileRepository>,
    prompt_template_repo: Arc<dyn PromptTemplateRepository>,
    audit_log_repo: Arc<dyn AuditLogRepository>,

    // Generation
    generation_client: Arc<dyn GenerationClient>,
    generation_options: GenerationOptions,

    audit_config: AuditConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        voice_profile_repo: Arc<dyn VoiceProfileRepository>,
        platform_profile_repo: Arc<dyn PlatformProfileRepository>,
        prompt_template_repo: Arc<dyn PromptTemplateRepository>,
        audit_log_repo: Arc<dyn AuditLogRepository>,
        generation_client: Arc<dyn GenerationClient>,
        generation_options: GenerationOptions,
        audit_config: AuditConfig,
    ) -> Self {
        Self {
            voice_profile_repo,
            platform_profile_repo,
            prompt_template_repo,
            audit_log_repo,
            generation_client,
            generation_options,
            audit_config,
        }
    }

    // === Repositories ===

    /// Get the voice profile repository
    pub fn voice_profile_repo(&self) -> &dyn VoiceProfileRepository {
        self.voice_profile_repo.as_ref()
    }

    /// Get the platform profile repository
    pub fn platform_profile_repo(&self) -> &dyn PlatformProfileRepository {
        self.platform_profile_repo.as_ref()
    }

    /// Get the prompt template repository
    pub fn prompt_template_repo(&self) -> &dyn PromptTemplateRepository {
        self.prompt_template_repo.as_ref()
    }

    /// Get the audit log repository
    pub fn audit_log_repo(&self) -> &dyn AuditLogRepository {
        self.audit_log_repo.as_ref()
    }

    // === Generation ===

    /// Get the generation client
    pub fn generation_client(&self) -> &dyn GenerationClient {
        self.generation_client.as_ref()
    }

    /// Options used for every generation call
    pub fn generation_options(&self) -> &GenerationOptions {
        &self.generation_options
    }

    pub fn audit_config(&self) -> &AuditConfig {
        &self.audit_config
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("generation_client", &"dyn GenerationClient")
            .field("generation_options", &self.generation_options)
            .field("audit_config", &self.audit_config)
            .finish()
    }
}

/// Generation options derived from the backend configuration
pub fn generation_options_from(config: &GenerationConfig) -> GenerationOptions {
    GenerationOptions {
        model: Some(config.model.clone()),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
        ..Default::default()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    voice_profile_repo: Option<Arc<dyn VoiceProfileRepository>>,
    platform_profile_repo: Option<Arc<dyn PlatformProfileRepository>>,
    prompt_template_repo: Option<Arc<dyn PromptTemplateRepository>>,
    audit_log_repo: Option<Arc<dyn AuditLogRepository>>,
    generation_client: Option<Arc<dyn GenerationClient>>,
    generation_options: Option<GenerationOptions>,
    audit_config: Option<AuditConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the PostgreSQL repositories for every port
    pub fn postgres(self, pool: &PgPool) -> Self {
        self.voice_profile_repo(Arc::new(PgVoiceProfileRepository::new(pool.clone())))
            .platform_profile_repo(Arc::new(PgPlatformProfileRepository::new(pool.clone())))
            .prompt_template_repo(Arc::new(PgPromptTemplateRepository::new(pool.clone())))
            .audit_log_repo(Arc::new(PgAuditLogRepository::new(pool.clone())))
    }

    /// Use fresh in-memory repositories for every port
    pub fn in_memory(self) -> Self {
        self.voice_profile_repo(Arc::new(InMemoryVoiceProfileRepository::new()))
            .platform_profile_repo(Arc::new(InMemoryPlatformProfileRepository::new()))
            .prompt_template_repo(Arc::new(InMemoryPromptTemplateRepository::new()))
            .audit_log_repo(Arc::new(InMemoryAuditLogRepository::new()))
    }

    pub fn voice_profile_repo(mut self, repo: Arc<dyn VoiceProfileRepository>) -> Self {
        self.voice_profile_repo = Some(repo);
        self
    }

    pub fn platform_profile_repo(mut self, repo: Arc<dyn PlatformProfileRepository>) -> Self {
        self.platform_profile_repo = Some(repo);
        self
    }

    pub fn prompt_template_repo(mut self, repo: Arc<dyn PromptTemplateRepository>) -> Self {
        self.prompt_template_repo = Some(repo);
        self
    }

    pub fn audit_log_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_log_repo = Some(repo);
        self
    }

    pub fn generation_client(mut self, client: Arc<dyn GenerationClient>) -> Self {
        self.generation_client = Some(client);
        self
    }

    pub fn generation_options(mut self, options: GenerationOptions) -> Self {
        self.generation_options = Some(options);
        self
    }

    /// Take model, temperature and token limit from the backend settings
    pub fn generation_config(self, config: &GenerationConfig) -> Self {
        self.generation_options(generation_options_from(config))
    }

    pub fn audit_config(mut self, config: AuditConfig) -> Self {
        self.audit_config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.voice_profile_repo
                .ok_or_else(|| ServiceError::validation("voice_profile_repo is required"))?,
            self.platform_profile_repo
                .ok_or_else(|| ServiceError::validation("platform_profile_repo is required"))?,
            self.prompt_template_repo
                .ok_or_else(|| ServiceError::validation("prompt_template_repo is required"))?,
            self.audit_log_repo
                .ok_or_else(|| ServiceError::validation("audit_log_repo is required"))?,
            self.generation_client
                .ok_or_else(|| ServiceError::validation("generation_client is required"))?,
            self.generation_options.unwrap_or_default(),
            self.audit_config.unwrap_or_default(),
        ))
    }
}
