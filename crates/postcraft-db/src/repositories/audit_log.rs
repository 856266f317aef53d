//! PostgreSQL implementation of AuditLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use postcraft_core::entities::AuditLogEntry;
use postcraft_core::traits::{AuditLogRepository, AuditQuery, RepoResult};
use postcraft_core::value_objects::{AuditLogId, UserId};

use crate::mappers::AuditLogInsert;
use crate::models::AuditLogModel;

use super::error::map_db_error;

macro_rules! select_audit_logs {
    () => {
        r"
        SELECT id, user_id, action, entity_type, entity_id, prompt_snapshot, model_used,
               input_tokens, output_tokens, response_snapshot, template_versions, created_at
        FROM audit_logs
        "
    };
}

/// PostgreSQL implementation of AuditLogRepository
#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    /// Create a new PgAuditLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    #[instrument(skip(self, entry), fields(audit_log_id = %entry.id, action = %entry.action))]
    async fn insert(&self, entry: &AuditLogEntry) -> RepoResult<()> {
        let row = AuditLogInsert::new(entry)?;

        sqlx::query(
            r"
            INSERT INTO audit_logs (
                id, user_id, action, entity_type, entity_id, prompt_snapshot, model_used,
                input_tokens, output_tokens, response_snapshot, template_versions, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.action)
        .bind(row.entity_type)
        .bind(row.entity_id)
        .bind(row.prompt_snapshot)
        .bind(row.model_used)
        .bind(row.input_tokens)
        .bind(row.output_tokens)
        .bind(row.response_snapshot)
        .bind(row.template_versions)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: AuditLogId,
    ) -> RepoResult<Option<AuditLogEntry>> {
        let result = sqlx::query_as::<_, AuditLogModel>(concat!(
            select_audit_logs!(),
            "WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AuditLogEntry::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, user_id: UserId, query: &AuditQuery) -> RepoResult<Vec<AuditLogEntry>> {
        // seq breaks ties between entries created in the same instant
        let results = sqlx::query_as::<_, AuditLogModel>(concat!(
            select_audit_logs!(),
            r"
            WHERE user_id = $1
              AND ($2::text IS NULL OR action = $2)
              AND ($3::text IS NULL OR entity_type = $3)
              AND ($4::uuid IS NULL OR entity_id = $4)
            ORDER BY created_at DESC, seq DESC
            LIMIT $5 OFFSET $6
            "
        ))
        .bind(user_id.into_inner())
        .bind(query.action.map(|a| a.as_str()))
        .bind(query.entity_type.map(|t| t.as_str()))
        .bind(query.entity_id.map(|id| id.into_inner()))
        .bind(i64::from(query.effective_limit()))
        .bind(i64::from(query.effective_offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(AuditLogEntry::try_from).collect()
    }
}
