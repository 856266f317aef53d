//! Repository traits (ports) - define the interface for data access
//!
//! Config repositories share one versioning contract:
//!
//! * `create` inserts version 1 of a new chain.
//! * `update` inserts `version + 1` merged with the current row and
//!   deactivates the current row. Clearing other defaults in the scope when
//!   the update sets `is_default` happens in the same transaction.
//! * `update` on an inactive row fails with [`DomainError::StaleVersion`], so a
//!   chain never forks.
//! * `deactivate` is a soft delete.
//! * Only the owner's rows can be changed; system rows (no owner) are
//!   read-only and look like missing rows to `update`/`deactivate`.

use async_trait::async_trait;

use crate::entities::{
    AuditLogEntry, NewPlatformProfile, NewPromptTemplate, NewVoiceProfile, PlatformProfile,
    PlatformProfileUpdate, PromptTemplate, PromptTemplateUpdate, VoiceProfile, VoiceProfileUpdate,
};
use crate::error::DomainError;
use crate::value_objects::{
    AuditAction, AuditLogId, EntityId, EntityType, Platform, PlatformProfileId,
    PromptTemplateId, TaskType, UserId, VoiceProfileId,
};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Voice Profile Repository
// ============================================================================

#[async_trait]
pub trait VoiceProfileRepository: Send + Sync {
    /// Find any version by id, active or not
    async fn find_by_id(&self, id: VoiceProfileId) -> RepoResult<Option<VoiceProfile>>;

    /// Find an active row visible to the owner (own or system)
    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: VoiceProfileId,
    ) -> RepoResult<Option<VoiceProfile>>;

    /// Owner's active default, else the system default
    async fn get_active(&self, owner: UserId) -> RepoResult<Option<VoiceProfile>>;

    /// Active owner and system rows, defaults first, newest first
    async fn list_active(&self, owner: UserId) -> RepoResult<Vec<VoiceProfile>>;

    /// Every version of the chain containing `id`, ascending
    async fn history(&self, id: VoiceProfileId) -> RepoResult<Vec<VoiceProfile>>;

    /// Create version 1; `owner = None` seeds a system profile
    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewVoiceProfile,
    ) -> RepoResult<VoiceProfile>;

    async fn update(
        &self,
        id: VoiceProfileId,
        owner: UserId,
        update: VoiceProfileUpdate,
    ) -> RepoResult<VoiceProfile>;

    async fn deactivate(&self, id: VoiceProfileId, owner: UserId) -> RepoResult<()>;
}

// ============================================================================
// Platform Profile Repository
// ============================================================================

#[async_trait]
pub trait PlatformProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: PlatformProfileId) -> RepoResult<Option<PlatformProfile>>;

    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: PlatformProfileId,
    ) -> RepoResult<Option<PlatformProfile>>;

    /// Owner's active default for the platform, else the system default
    async fn get_active(
        &self,
        owner: UserId,
        platform: Platform,
    ) -> RepoResult<Option<PlatformProfile>>;

    async fn list_active(
        &self,
        owner: UserId,
        platform: Option<Platform>,
    ) -> RepoResult<Vec<PlatformProfile>>;

    async fn history(&self, id: PlatformProfileId) -> RepoResult<Vec<PlatformProfile>>;

    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewPlatformProfile,
    ) -> RepoResult<PlatformProfile>;

    async fn update(
        &self,
        id: PlatformProfileId,
        owner: UserId,
        update: PlatformProfileUpdate,
    ) -> RepoResult<PlatformProfile>;

    async fn deactivate(&self, id: PlatformProfileId, owner: UserId) -> RepoResult<()>;
}

// ============================================================================
// Prompt Template Repository
// ============================================================================

#[async_trait]
pub trait PromptTemplateRepository: Send + Sync {
    async fn find_by_id(&self, id: PromptTemplateId) -> RepoResult<Option<PromptTemplate>>;

    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: PromptTemplateId,
    ) -> RepoResult<Option<PromptTemplate>>;

    /// Owner's highest active version for the task, else the system's
    async fn get_active(
        &self,
        owner: UserId,
        task_type: TaskType,
    ) -> RepoResult<Option<PromptTemplate>>;

    /// Active owner and system rows, newest first
    async fn list_active(
        &self,
        owner: UserId,
        task_type: Option<TaskType>,
    ) -> RepoResult<Vec<PromptTemplate>>;

    async fn history(&self, id: PromptTemplateId) -> RepoResult<Vec<PromptTemplate>>;

    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewPromptTemplate,
    ) -> RepoResult<PromptTemplate>;

    async fn update(
        &self,
        id: PromptTemplateId,
        owner: UserId,
        update: PromptTemplateUpdate,
    ) -> RepoResult<PromptTemplate>;

    async fn deactivate(&self, id: PromptTemplateId, owner: UserId) -> RepoResult<()>;
}

// ============================================================================
// Audit Log Repository
// ============================================================================

/// Filters and pagination for audit listings
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub action: Option<AuditAction>,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<EntityId>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl AuditQuery {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 100;

    /// Limit clamped to `1..=MAX_LIMIT`
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn effective_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        self.action.is_none_or(|a| a == entry.action)
            && self.entity_type.is_none_or(|t| t == entry.entity_type)
            && self.entity_id.is_none_or(|id| id == entry.entity_id)
    }
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append an entry; entries are never updated or deleted
    async fn insert(&self, entry: &AuditLogEntry) -> RepoResult<()>;

    /// Find an entry belonging to the user
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: AuditLogId,
    ) -> RepoResult<Option<AuditLogEntry>>;

    /// User's entries newest first
    async fn list(&self, user_id: UserId, query: &AuditQuery) -> RepoResult<Vec<AuditLogEntry>>;
}
