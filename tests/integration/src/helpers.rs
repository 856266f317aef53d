//! Test helpers for integration tests
//!
//! Provides a scripted generation backend, an audit repository that can be
//! switched to fail, and context builders for both storage backends.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use postcraft_core::entities::AuditLogEntry;
use postcraft_core::traits::{
    AuditLogRepository, AuditQuery, Generation, GenerationClient, GenerationOptions, RepoResult,
    TokenUsage,
};
use postcraft_core::value_objects::{AuditLogId, UserId};
use postcraft_core::DomainError;
use postcraft_db::{
    create_pool, run_migrations, InMemoryAuditLogRepository, PgPool, PoolConfig,
};
use postcraft_service::{ServiceContext, ServiceContextBuilder};

/// Model name reported by the scripted backend
pub const SCRIPTED_MODEL: &str = "gpt-4o-2024-08-06";

/// Generation backend replying with queued bodies in order
///
/// Every prompt it receives is kept for inspection.
#[derive(Default)]
pub struct ScriptedGenerationClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    options: Mutex<Vec<GenerationOptions>>,
}

impl ScriptedGenerationClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful reply
    pub fn reply(&self, body: impl Into<String>) -> &Self {
        self.replies.lock().push_back(Ok(body.into()));
        self
    }

    /// Queue a backend failure
    pub fn fail(&self, reason: impl Into<String>) -> &Self {
        self.replies.lock().push_back(Err(reason.into()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn last_options(&self) -> Option<GenerationOptions> {
        self.options.lock().last().cloned()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, DomainError> {
        self.prompts.lock().push(prompt.to_string());
        self.options.lock().push(options.clone());

        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));

        reply
            .map(|content| Generation {
                content,
                usage: TokenUsage {
                    input_tokens: 420,
                    output_tokens: 180,
                },
                model: SCRIPTED_MODEL.to_string(),
            })
            .map_err(DomainError::GenerationFailed)
    }
}

/// In-memory audit repository whose inserts can be made to fail
#[derive(Default)]
pub struct FailingAuditLogRepository {
    inner: InMemoryAuditLogRepository,
    failing: AtomicBool,
}

impl FailingAuditLogRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl AuditLogRepository for FailingAuditLogRepository {
    async fn insert(&self, entry: &AuditLogEntry) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError(
                "connection reset by peer".to_string(),
            ));
        }
        self.inner.insert(entry).await
    }

    async fn find_by_id(
        &self,
        user_id: UserId,
        id: AuditLogId,
    ) -> RepoResult<Option<AuditLogEntry>> {
        self.inner.find_by_id(user_id, id).await
    }

    async fn list(&self, user_id: UserId, query: &AuditQuery) -> RepoResult<Vec<AuditLogEntry>> {
        self.inner.list(user_id, query).await
    }
}

/// Context over fresh in-memory repositories
pub fn memory_context(client: Arc<ScriptedGenerationClient>) -> ServiceContext {
    ServiceContextBuilder::new()
        .in_memory()
        .generation_client(client)
        .build()
        .expect("in-memory context")
}

/// In-memory context whose audit repository is handed back for control
pub fn memory_context_with_audit(
    client: Arc<ScriptedGenerationClient>,
) -> (ServiceContext, Arc<FailingAuditLogRepository>) {
    let audit = FailingAuditLogRepository::new();
    let ctx = ServiceContextBuilder::new()
        .in_memory()
        .audit_log_repo(audit.clone())
        .generation_client(client)
        .build()
        .expect("in-memory context");
    (ctx, audit)
}

/// Check if the test environment has a database
pub fn check_test_env() -> bool {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Pool with migrations applied
pub async fn test_pool() -> Result<PgPool> {
    let config = PoolConfig {
        url: std::env::var("DATABASE_URL")?,
        max_connections: 5,
        min_connections: 1,
        ..Default::default()
    };
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Context over PostgreSQL repositories
pub fn postgres_context(pool: &PgPool, client: Arc<ScriptedGenerationClient>) -> ServiceContext {
    ServiceContextBuilder::new()
        .postgres(pool)
        .generation_client(client)
        .build()
        .expect("postgres context")
}
