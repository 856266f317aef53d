//! PostgreSQL implementation of VoiceProfileRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use postcraft_core::entities::{NewVoiceProfile, VoiceProfile, VoiceProfileUpdate};
use postcraft_core::traits::{RepoResult, VoiceProfileRepository};
use postcraft_core::value_objects::{UserId, VoiceProfileId};
use postcraft_core::DomainError;

use crate::mappers::VoiceProfileInsert;
use crate::models::VoiceProfileModel;

use super::error::{map_db_error, map_profile_violation, stale_version};

macro_rules! select_voice_profiles {
    () => {
        r"
        SELECT id, lineage_id, user_id, name, persona, tone_rules, readability_rules,
               forbidden_language, version, is_default, is_active, created_at
        FROM voice_profiles
        "
    };
}

/// PostgreSQL implementation of VoiceProfileRepository
#[derive(Clone)]
pub struct PgVoiceProfileRepository {
    pool: PgPool,
}

impl PgVoiceProfileRepository {
    /// Create a new PgVoiceProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn to_entities(models: Vec<VoiceProfileModel>) -> RepoResult<Vec<VoiceProfile>> {
        models.into_iter().map(VoiceProfile::try_from).collect()
    }

    /// Clear every active default in the owner's scope
    async fn clear_defaults(
        tx: &mut Transaction<'_, Postgres>,
        owner: Option<UserId>,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE voice_profiles
            SET is_default = FALSE
            WHERE user_id IS NOT DISTINCT FROM $1 AND is_default
            ",
        )
        .bind(owner.map(UserId::into_inner))
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn insert(tx: &mut Transaction<'_, Postgres>, profile: &VoiceProfile) -> RepoResult<()> {
        let row = VoiceProfileInsert::new(profile);
        sqlx::query(
            r"
            INSERT INTO voice_profiles (
                id, lineage_id, user_id, name, persona, tone_rules, readability_rules,
                forbidden_language, version, is_default, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(row.id)
        .bind(row.lineage_id)
        .bind(row.user_id)
        .bind(row.name)
        .bind(row.persona)
        .bind(row.tone_rules)
        .bind(row.readability_rules)
        .bind(row.forbidden_language)
        .bind(row.version)
        .bind(row.is_default)
        .bind(row.is_active)
        .bind(profile.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_profile_violation(e, "voice profile", profile.lineage_id))?;

        Ok(())
    }
}

#[async_trait]
impl VoiceProfileRepository for PgVoiceProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: VoiceProfileId) -> RepoResult<Option<VoiceProfile>> {
        let result = sqlx::query_as::<_, VoiceProfileModel>(concat!(
            select_voice_profiles!(),
            "WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(VoiceProfile::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: VoiceProfileId,
    ) -> RepoResult<Option<VoiceProfile>> {
        let result = sqlx::query_as::<_, VoiceProfileModel>(concat!(
            select_voice_profiles!(),
            "WHERE id = $1 AND is_active AND (user_id = $2 OR user_id IS NULL)"
        ))
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(VoiceProfile::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn get_active(&self, owner: UserId) -> RepoResult<Option<VoiceProfile>> {
        // Owner rows sort before system rows
        let result = sqlx::query_as::<_, VoiceProfileModel>(concat!(
            select_voice_profiles!(),
            r"
            WHERE is_default AND is_active AND (user_id = $1 OR user_id IS NULL)
            ORDER BY (user_id IS NULL), version DESC
            LIMIT 1
            "
        ))
        .bind(owner.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(VoiceProfile::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_active(&self, owner: UserId) -> RepoResult<Vec<VoiceProfile>> {
        let results = sqlx::query_as::<_, VoiceProfileModel>(concat!(
            select_voice_profiles!(),
            r"
            WHERE is_active AND (user_id = $1 OR user_id IS NULL)
            ORDER BY is_default DESC, created_at DESC
            "
        ))
        .bind(owner.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::to_entities(results)
    }

    #[instrument(skip(self))]
    async fn history(&self, id: VoiceProfileId) -> RepoResult<Vec<VoiceProfile>> {
        let results = sqlx::query_as::<_, VoiceProfileModel>(concat!(
            select_voice_profiles!(),
            r"
            WHERE lineage_id = (SELECT lineage_id FROM voice_profiles WHERE id = $1)
            ORDER BY version ASC
            "
        ))
        .bind(id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::to_entities(results)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewVoiceProfile,
    ) -> RepoResult<VoiceProfile> {
        let profile = VoiceProfile::new(owner, input);

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        if profile.is_default {
            Self::clear_defaults(&mut tx, owner).await?;
        }
        Self::insert(&mut tx, &profile).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(profile)
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        id: VoiceProfileId,
        owner: UserId,
        update: VoiceProfileUpdate,
    ) -> RepoResult<VoiceProfile> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let current = sqlx::query_as::<_, VoiceProfileModel>(concat!(
            select_voice_profiles!(),
            "WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::VoiceProfileNotFound(id))?;
        let current = VoiceProfile::try_from(current)?;

        if !current.is_active {
            return Err(stale_version("voice profile", id));
        }

        let next = current.next_version(update);

        sqlx::query("UPDATE voice_profiles SET is_active = FALSE WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        if next.is_default {
            Self::clear_defaults(&mut tx, Some(owner)).await?;
        }
        Self::insert(&mut tx, &next).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(next)
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: VoiceProfileId, owner: UserId) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE voice_profiles
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
            return Err(DomainError::VoiceProfileNotFound(id));
        }

        Ok(())
    }
}
