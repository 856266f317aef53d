//! PostgreSQL implementation of PromptTemplateRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use postcraft_core::entities::{NewPromptTemplate, PromptTemplate, PromptTemplateUpdate};
use postcraft_core::traits::{PromptTemplateRepository, RepoResult};
use postcraft_core::value_objects::{PromptTemplateId, TaskType, UserId};
use postcraft_core::DomainError;

use crate::mappers::PromptTemplateInsert;
use crate::models::PromptTemplateModel;

use super::error::{map_db_error, map_unique_violation, stale_version};

macro_rules! select_prompt_templates {
    () => {
        r"
        SELECT id, lineage_id, user_id, task_type, name, content, version, is_active, created_at
        FROM prompt_templates
        "
    };
}

/// PostgreSQL implementation of PromptTemplateRepository
#[derive(Clone)]
pub struct PgPromptTemplateRepository {
    pool: PgPool,
}

impl PgPromptTemplateRepository {
    /// Create a new PgPromptTemplateRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn to_entities(models: Vec<PromptTemplateModel>) -> RepoResult<Vec<PromptTemplate>> {
        models.into_iter().map(PromptTemplate::try_from).collect()
    }

    async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        template: &PromptTemplate,
    ) -> RepoResult<()> {
        let row = PromptTemplateInsert::new(template);
        sqlx::query(
            r"
            INSERT INTO prompt_templates (
                id, lineage_id, user_id, task_type, name, content, version, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(row.id)
        .bind(row.lineage_id)
        .bind(row.user_id)
        .bind(row.task_type)
        .bind(row.name)
        .bind(row.content)
        .bind(row.version)
        .bind(row.is_active)
        .bind(template.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || stale_version("prompt template", template.lineage_id))
        })?;

        Ok(())
    }
}

#[async_trait]
impl PromptTemplateRepository for PgPromptTemplateRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PromptTemplateId) -> RepoResult<Option<PromptTemplate>> {
        let result = sqlx::query_as::<_, PromptTemplateModel>(concat!(
            select_prompt_templates!(),
            "WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PromptTemplate::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: PromptTemplateId,
    ) -> RepoResult<Option<PromptTemplate>> {
        let result = sqlx::query_as::<_, PromptTemplateModel>(concat!(
            select_prompt_templates!(),
            "WHERE id = $1 AND is_active AND (user_id = $2 OR user_id IS NULL)"
        ))
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PromptTemplate::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn get_active(
        &self,
        owner: UserId,
        task_type: TaskType,
    ) -> RepoResult<Option<PromptTemplate>> {
        let result = sqlx::query_as::<_, PromptTemplateModel>(concat!(
            select_prompt_templates!(),
            r"
            WHERE task_type = $2 AND is_active AND (user_id = $1 OR user_id IS NULL)
            ORDER BY (user_id IS NULL), version DESC, created_at DESC
            LIMIT 1
            "
        ))
        .bind(owner.into_inner())
        .bind(task_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PromptTemplate::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_active(
        &self,
        owner: UserId,
        task_type: Option<TaskType>,
    ) -> RepoResult<Vec<PromptTemplate>> {
        let results = sqlx::query_as::<_, PromptTemplateModel>(concat!(
            select_prompt_templates!(),
            r"
            WHERE is_active AND (user_id = $1 OR user_id IS NULL)
              AND ($2::text IS NULL OR task_type = $2)
            ORDER BY created_at DESC
            "
        ))
        .bind(owner.into_inner())
        .bind(task_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::to_entities(results)
    }

    #[instrument(skip(self))]
    async fn history(&self, id: PromptTemplateId) -> RepoResult<Vec<PromptTemplate>> {
        let results = sqlx::query_as::<_, PromptTemplateModel>(concat!(
            select_prompt_templates!(),
            r"
            WHERE lineage_id = (SELECT lineage_id FROM prompt_templates WHERE id = $1)
            ORDER BY version ASC
            "
        ))
        .bind(id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::to_entities(results)
    }

    #[instrument(skip(self, input), fields(task_type = %input.task_type))]
    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewPromptTemplate,
    ) -> RepoResult<PromptTemplate> {
        let template = PromptTemplate::new(owner, input);

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        Self::insert(&mut tx, &template).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(template)
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        id: PromptTemplateId,
        owner: UserId,
        update: PromptTemplateUpdate,
    ) -> RepoResult<PromptTemplate> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let current = sqlx::query_as::<_, PromptTemplateModel>(concat!(
            select_prompt_templates!(),
            "WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::PromptTemplateNotFound(id))?;
        let current = PromptTemplate::try_from(current)?;

        if !current.is_active {
            return Err(stale_version("prompt template", id));
        }

        let next = current.next_version(update);

        sqlx::query("UPDATE prompt_templates SET is_active = FALSE WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        Self::insert(&mut tx, &next).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(next)
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: PromptTemplateId, owner: UserId) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE prompt_templates
            SET is_active = FALSE
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PromptTemplateNotFound(id));
        }

        Ok(())
    }
}
