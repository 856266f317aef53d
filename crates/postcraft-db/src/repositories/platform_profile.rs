//! PostgreSQL implementation of PlatformProfileRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use postcraft_core::entities::{NewPlatformProfile, PlatformProfile, PlatformProfileUpdate};
use postcraft_core::traits::{PlatformProfileRepository, RepoResult};
use postcraft_core::value_objects::{Platform, PlatformProfileId, UserId};
use postcraft_core::DomainError;

use crate::mappers::PlatformProfileInsert;
use crate::models::PlatformProfileModel;

use super::error::{map_db_error, map_profile_violation, stale_version};

macro_rules! select_platform_profiles {
    () => {
        r"
        SELECT id, lineage_id, user_id, platform, name, structure, formatting_rules,
               length_constraints, required_output_fields, version, is_default, is_active,
               created_at
        FROM platform_profiles
        "
    };
}

/// PostgreSQL implementation of PlatformProfileRepository
#[derive(Clone)]
pub struct PgPlatformProfileRepository {
    pool: PgPool,
}

impl PgPlatformProfileRepository {
    /// Create a new PgPlatformProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn to_entities(models: Vec<PlatformProfileModel>) -> RepoResult<Vec<PlatformProfile>> {
        models.into_iter().map(PlatformProfile::try_from).collect()
    }

    /// Default scope is (owner, platform)
    async fn clear_defaults(
        tx: &mut Transaction<'_, Postgres>,
        owner: Option<UserId>,
        platform: Platform,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE platform_profiles
            SET is_default = FALSE
            WHERE user_id IS NOT DISTINCT FROM $1 AND platform = $2 AND is_default
            ",
        )
        .bind(owner.map(UserId::into_inner))
        .bind(platform.as_str())
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        profile: &PlatformProfile,
    ) -> RepoResult<()> {
        let row = PlatformProfileInsert::new(profile)?;
        sqlx::query(
            r"
            INSERT INTO platform_profiles (
                id, lineage_id, user_id, platform, name, structure, formatting_rules,
                length_constraints, required_output_fields, version, is_default, is_active,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(row.id)
        .bind(row.lineage_id)
        .bind(row.user_id)
        .bind(row.platform)
        .bind(row.name)
        .bind(row.structure)
        .bind(row.formatting_rules)
        .bind(row.length_constraints)
        .bind(row.required_output_fields)
        .bind(row.version)
        .bind(row.is_default)
        .bind(row.is_active)
        .bind(profile.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            map_profile_violation(e, "platform profile", profile.lineage_id)
        })?;

        Ok(())
    }
}

#[async_trait]
impl PlatformProfileRepository for PgPlatformProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PlatformProfileId) -> RepoResult<Option<PlatformProfile>> {
        let result = sqlx::query_as::<_, PlatformProfileModel>(concat!(
            select_platform_profiles!(),
            "WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PlatformProfile::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: PlatformProfileId,
    ) -> RepoResult<Option<PlatformProfile>> {
        let result = sqlx::query_as::<_, PlatformProfileModel>(concat!(
            select_platform_profiles!(),
            "WHERE id = $1 AND is_active AND (user_id = $2 OR user_id IS NULL)"
        ))
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PlatformProfile::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn get_active(
        &self,
        owner: UserId,
        platform: Platform,
    ) -> RepoResult<Option<PlatformProfile>> {
        let result = sqlx::query_as::<_, PlatformProfileModel>(concat!(
            select_platform_profiles!(),
            r"
            WHERE platform = $2 AND is_default AND is_active
              AND (user_id = $1 OR user_id IS NULL)
            ORDER BY (user_id IS NULL), version DESC
            LIMIT 1
            "
        ))
        .bind(owner.into_inner())
        .bind(platform.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PlatformProfile::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_active(
        &self,
        owner: UserId,
        platform: Option<Platform>,
    ) -> RepoResult<Vec<PlatformProfile>> {
        let results = sqlx::query_as::<_, PlatformProfileModel>(concat!(
            select_platform_profiles!(),
            r"
            WHERE is_active AND (user_id = $1 OR user_id IS NULL)
              AND ($2::text IS NULL OR platform = $2)
            ORDER BY is_default DESC, created_at DESC
            "
        ))
        .bind(owner.into_inner())
        .bind(platform.map(|p| p.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::to_entities(results)
    }

    #[instrument(skip(self))]
    async fn history(&self, id: PlatformProfileId) -> RepoResult<Vec<PlatformProfile>> {
        let results = sqlx::query_as::<_, PlatformProfileModel>(concat!(
            select_platform_profiles!(),
            r"
            WHERE lineage_id = (SELECT lineage_id FROM platform_profiles WHERE id = $1)
            ORDER BY version ASC
            "
        ))
        .bind(id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::to_entities(results)
    }

    #[instrument(skip(self, input), fields(platform = %input.platform))]
    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewPlatformProfile,
    ) -> RepoResult<PlatformProfile> {
        let profile = PlatformProfile::new(owner, input);

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        if profile.is_default {
            Self::clear_defaults(&mut tx, owner, profile.platform).await?;
        }
        Self::insert(&mut tx, &profile).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(profile)
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        id: PlatformProfileId,
        owner: UserId,
        update: PlatformProfileUpdate,
    ) -> RepoResult<PlatformProfile> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let current = sqlx::query_as::<_, PlatformProfileModel>(concat!(
            select_platform_profiles!(),
            "WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::PlatformProfileNotFound(id))?;
        let current = PlatformProfile::try_from(current)?;

        if !current.is_active {
            return Err(stale_version("platform profile", id));
        }

        let next = current.next_version(update);

        sqlx::query("UPDATE platform_profiles SET is_active = FALSE WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        if next.is_default {
            Self::clear_defaults(&mut tx, Some(owner), next.platform).await?;
        }
        Self::insert(&mut tx, &next).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(next)
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: PlatformProfileId, owner: UserId) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE platform_profiles
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
            return Err(DomainError::PlatformProfileNotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgPlatformProfileRepository>();
    }
}
