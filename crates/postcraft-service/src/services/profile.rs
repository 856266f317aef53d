//! Profile service
//!
//! Voice and platform profile management plus the lookups generation flows
//! use to pick the active configuration.

use postcraft_core::entities::{PlatformProfile, VoiceProfile};
use postcraft_core::value_objects::{Platform, PlatformProfileId, UserId, VoiceProfileId};
use postcraft_core::DomainError;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    CreatePlatformProfileRequest, CreateVoiceProfileRequest, PlatformProfileResponse,
    UpdatePlatformProfileRequest, UpdateVoiceProfileRequest, VoiceProfileResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Voice Profiles
    // ========================================================================

    /// The voice profile generation would use right now
    #[instrument(skip(self))]
    pub async fn get_active_voice_profile(
        &self,
        user_id: UserId,
    ) -> ServiceResult<VoiceProfileResponse> {
        let profile = self.resolve_voice_profile(user_id, None).await?;
        Ok(VoiceProfileResponse::from(&profile))
    }

    /// Get any version visible to the user
    #[instrument(skip(self))]
    pub async fn get_voice_profile(
        &self,
        user_id: UserId,
        id: VoiceProfileId,
    ) -> ServiceResult<VoiceProfileResponse> {
        let profile = self.visible_voice_profile(user_id, id).await?;
        Ok(VoiceProfileResponse::from(&profile))
    }

    #[instrument(skip(self))]
    pub async fn list_voice_profiles(
        &self,
        user_id: UserId,
    ) -> ServiceResult<Vec<VoiceProfileResponse>> {
        let profiles = self.ctx.voice_profile_repo().list_active(user_id).await?;
        Ok(profiles.iter().map(VoiceProfileResponse::from).collect())
    }

    /// Every version of the profile's chain, oldest first
    #[instrument(skip(self))]
    pub async fn voice_profile_history(
        &self,
        user_id: UserId,
        id: VoiceProfileId,
    ) -> ServiceResult<Vec<VoiceProfileResponse>> {
        self.visible_voice_profile(user_id, id).await?;
        let versions = self.ctx.voice_profile_repo().history(id).await?;
        Ok(versions.iter().map(VoiceProfileResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_voice_profile(
        &self,
        user_id: UserId,
        request: CreateVoiceProfileRequest,
    ) -> ServiceResult<VoiceProfileResponse> {
        request.validate()?;

        let profile = self
            .ctx
            .voice_profile_repo()
            .create(Some(user_id), request.into())
            .await?;

        info!(voice_profile_id = %profile.id, is_default = profile.is_default, "Voice profile created");

        Ok(VoiceProfileResponse::from(&profile))
    }

    /// Publish the next version of a profile
    #[instrument(skip(self, request))]
    pub async fn update_voice_profile(
        &self,
        user_id: UserId,
        id: VoiceProfileId,
        request: UpdateVoiceProfileRequest,
    ) -> ServiceResult<VoiceProfileResponse> {
        request.validate()?;

        let profile = self
            .ctx
            .voice_profile_repo()
            .update(id, user_id, request.into())
            .await?;

        info!(
            previous_id = %id,
            voice_profile_id = %profile.id,
            version = profile.version,
            "Voice profile updated"
        );

        Ok(VoiceProfileResponse::from(&profile))
    }

    #[instrument(skip(self))]
    pub async fn deactivate_voice_profile(
        &self,
        user_id: UserId,
        id: VoiceProfileId,
    ) -> ServiceResult<()> {
        self.ctx.voice_profile_repo().deactivate(id, user_id).await?;
        info!(voice_profile_id = %id, "Voice profile deactivated");
        Ok(())
    }

    // ========================================================================
    // Platform Profiles
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_active_platform_profile(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> ServiceResult<PlatformProfileResponse> {
        let profile = self
            .resolve_platform_profile(user_id, platform)
            .await?
            .ok_or_else(|| missing_platform_profile(platform))?;
        Ok(PlatformProfileResponse::from(&profile))
    }

    #[instrument(skip(self))]
    pub async fn get_platform_profile(
        &self,
        user_id: UserId,
        id: PlatformProfileId,
    ) -> ServiceResult<PlatformProfileResponse> {
        let profile = self.visible_platform_profile(user_id, id).await?;
        Ok(PlatformProfileResponse::from(&profile))
    }

    /// Active profiles, optionally narrowed to one platform
    #[instrument(skip(self))]
    pub async fn list_platform_profiles(
        &self,
        user_id: UserId,
        platform: Option<Platform>,
    ) -> ServiceResult<Vec<PlatformProfileResponse>> {
        let profiles = self
            .ctx
            .platform_profile_repo()
            .list_active(user_id, platform)
            .await?;
        Ok(profiles.iter().map(PlatformProfileResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn platform_profile_history(
        &self,
        user_id: UserId,
        id: PlatformProfileId,
    ) -> ServiceResult<Vec<PlatformProfileResponse>> {
        self.visible_platform_profile(user_id, id).await?;
        let versions = self.ctx.platform_profile_repo().history(id).await?;
        Ok(versions.iter().map(PlatformProfileResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_platform_profile(
        &self,
        user_id: UserId,
        request: CreatePlatformProfileRequest,
    ) -> ServiceResult<PlatformProfileResponse> {
        request.validate()?;

        let profile = self
            .ctx
            .platform_profile_repo()
            .create(Some(user_id), request.into())
            .await?;

        info!(
            platform_profile_id = %profile.id,
            platform = %profile.platform,
            is_default = profile.is_default,
            "Platform profile created"
        );

        Ok(PlatformProfileResponse::from(&profile))
    }

    #[instrument(skip(self, request))]
    pub async fn update_platform_profile(
        &self,
        user_id: UserId,
        id: PlatformProfileId,
        request: UpdatePlatformProfileRequest,
    ) -> ServiceResult<PlatformProfileResponse> {
        request.validate()?;

        let profile = self
            .ctx
            .platform_profile_repo()
            .update(id, user_id, request.into())
            .await?;

        info!(
            previous_id = %id,
            platform_profile_id = %profile.id,
            version = profile.version,
            "Platform profile updated"
        );

        Ok(PlatformProfileResponse::from(&profile))
    }

    #[instrument(skip(self))]
    pub async fn deactivate_platform_profile(
        &self,
        user_id: UserId,
        id: PlatformProfileId,
    ) -> ServiceResult<()> {
        self.ctx
            .platform_profile_repo()
            .deactivate(id, user_id)
            .await?;
        info!(platform_profile_id = %id, "Platform profile deactivated");
        Ok(())
    }

    // ========================================================================
    // Generation lookups
    // ========================================================================

    /// Explicit profile when given, else the active default
    pub(crate) async fn resolve_voice_profile(
        &self,
        user_id: UserId,
        explicit: Option<VoiceProfileId>,
    ) -> ServiceResult<VoiceProfile> {
        let repo = self.ctx.voice_profile_repo();
        let profile = match explicit {
            Some(id) => repo
                .find_active_by_id(user_id, id)
                .await?
                .ok_or(DomainError::VoiceProfileNotFound(id))?,
            None => repo.get_active(user_id).await?.ok_or_else(|| {
                DomainError::ConfigurationMissing(
                    "no active voice profile for user or system".to_string(),
                )
            })?,
        };
        Ok(profile)
    }

    pub(crate) async fn resolve_platform_profile(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> ServiceResult<Option<PlatformProfile>> {
        Ok(self
            .ctx
            .platform_profile_repo()
            .get_active(user_id, platform)
            .await?)
    }

    async fn visible_voice_profile(
        &self,
        user_id: UserId,
        id: VoiceProfileId,
    ) -> ServiceResult<VoiceProfile> {
        let profile = self
            .ctx
            .voice_profile_repo()
            .find_by_id(id)
            .await?
            .filter(|p| p.owner.is_none_or(|owner| owner == user_id))
            .ok_or(DomainError::VoiceProfileNotFound(id))?;
        Ok(profile)
    }

    async fn visible_platform_profile(
        &self,
        user_id: UserId,
        id: PlatformProfileId,
    ) -> ServiceResult<PlatformProfile> {
        let profile = self
            .ctx
            .platform_profile_repo()
            .find_by_id(id)
            .await?
            .filter(|p| p.owner.is_none_or(|owner| owner == user_id))
            .ok_or(DomainError::PlatformProfileNotFound(id))?;
        Ok(profile)
    }
}

pub(crate) fn missing_platform_profile(platform: Platform) -> DomainError {
    DomainError::ConfigurationMissing(format!(
        "no active {platform} platform profile for user or system"
    ))
}
