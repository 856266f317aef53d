//! In-memory config repositories

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use postcraft_core::entities::{
    NewPlatformProfile, NewPromptTemplate, NewVoiceProfile, PlatformProfile,
    PlatformProfileUpdate, PromptTemplate, PromptTemplateUpdate, VoiceProfile,
    VoiceProfileUpdate,
};
use postcraft_core::traits::{
    PlatformProfileRepository, PromptTemplateRepository, RepoResult, VoiceProfileRepository,
};
use postcraft_core::value_objects::{
    Platform, PlatformProfileId, PromptTemplateId, TaskType, UserId, VoiceProfileId,
};
use postcraft_core::DomainError;

use super::store::{VersionStore, Versioned};

// ============================================================================
// Versioned impls
// ============================================================================

impl Versioned for VoiceProfile {
    type Id = VoiceProfileId;
    type Scope = ();

    const ENTITY: &'static str = "voice profile";

    fn id(&self) -> Self::Id {
        self.id
    }
    fn lineage_id(&self) -> Self::Id {
        self.lineage_id
    }
    fn owner(&self) -> Option<UserId> {
        self.owner
    }
    fn version(&self) -> i32 {
        self.version
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn set_inactive(&mut self) {
        self.is_active = false;
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn scope(&self) -> Self::Scope {}
    fn is_default(&self) -> bool {
        self.is_default
    }
    fn clear_default(&mut self) {
        self.is_default = false;
    }
    fn not_found(id: Self::Id) -> DomainError {
        DomainError::VoiceProfileNotFound(id)
    }
}

impl Versioned for PlatformProfile {
    type Id = PlatformProfileId;
    type Scope = Platform;

    const ENTITY: &'static str = "platform profile";

    fn id(&self) -> Self::Id {
        self.id
    }
    fn lineage_id(&self) -> Self::Id {
        self.lineage_id
    }
    fn owner(&self) -> Option<UserId> {
        self.owner
    }
    fn version(&self) -> i32 {
        self.version
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn set_inactive(&mut self) {
        self.is_active = false;
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn scope(&self) -> Self::Scope {
        self.platform
    }
    fn is_default(&self) -> bool {
        self.is_default
    }
    fn clear_default(&mut self) {
        self.is_default = false;
    }
    fn not_found(id: Self::Id) -> DomainError {
        DomainError::PlatformProfileNotFound(id)
    }
}

// Templates have no default flag
impl Versioned for PromptTemplate {
    type Id = PromptTemplateId;
    type Scope = TaskType;

    const ENTITY: &'static str = "prompt template";

    fn id(&self) -> Self::Id {
        self.id
    }
    fn lineage_id(&self) -> Self::Id {
        self.lineage_id
    }
    fn owner(&self) -> Option<UserId> {
        self.owner
    }
    fn version(&self) -> i32 {
        self.version
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn set_inactive(&mut self) {
        self.is_active = false;
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn scope(&self) -> Self::Scope {
        self.task_type
    }
    fn is_default(&self) -> bool {
        false
    }
    fn clear_default(&mut self) {}
    fn not_found(id: Self::Id) -> DomainError {
        DomainError::PromptTemplateNotFound(id)
    }
}

// ============================================================================
// Repositories
// ============================================================================

/// In-memory implementation of VoiceProfileRepository
#[derive(Default)]
pub struct InMemoryVoiceProfileRepository {
    store: VersionStore<VoiceProfile>,
}

impl InMemoryVoiceProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoiceProfileRepository for InMemoryVoiceProfileRepository {
    async fn find_by_id(&self, id: VoiceProfileId) -> RepoResult<Option<VoiceProfile>> {
        Ok(self.store.find(id))
    }

    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: VoiceProfileId,
    ) -> RepoResult<Option<VoiceProfile>> {
        Ok(self.store.find_active(owner, id))
    }

    async fn get_active(&self, owner: UserId) -> RepoResult<Option<VoiceProfile>> {
        Ok(self.store.resolve(owner, |p| p.is_default))
    }

    async fn list_active(&self, owner: UserId) -> RepoResult<Vec<VoiceProfile>> {
        Ok(self.store.list(owner, |_| true))
    }

    async fn history(&self, id: VoiceProfileId) -> RepoResult<Vec<VoiceProfile>> {
        Ok(self.store.history(id))
    }

    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewVoiceProfile,
    ) -> RepoResult<VoiceProfile> {
        Ok(self.store.insert(VoiceProfile::new(owner, input)))
    }

    async fn update(
        &self,
        id: VoiceProfileId,
        owner: UserId,
        update: VoiceProfileUpdate,
    ) -> RepoResult<VoiceProfile> {
        self.store
            .update(id, owner, |current| current.next_version(update))
    }

    async fn deactivate(&self, id: VoiceProfileId, owner: UserId) -> RepoResult<()> {
        self.store.deactivate(id, owner)
    }
}

/// In-memory implementation of PlatformProfileRepository
#[derive(Default)]
pub struct InMemoryPlatformProfileRepository {
    store: VersionStore<PlatformProfile>,
}

impl InMemoryPlatformProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlatformProfileRepository for InMemoryPlatformProfileRepository {
    async fn find_by_id(&self, id: PlatformProfileId) -> RepoResult<Option<PlatformProfile>> {
        Ok(self.store.find(id))
    }

    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: PlatformProfileId,
    ) -> RepoResult<Option<PlatformProfile>> {
        Ok(self.store.find_active(owner, id))
    }

    async fn get_active(
        &self,
        owner: UserId,
        platform: Platform,
    ) -> RepoResult<Option<PlatformProfile>> {
        Ok(self
            .store
            .resolve(owner, |p| p.platform == platform && p.is_default))
    }

    async fn list_active(
        &self,
        owner: UserId,
        platform: Option<Platform>,
    ) -> RepoResult<Vec<PlatformProfile>> {
        Ok(self
            .store
            .list(owner, |p| platform.is_none_or(|wanted| p.platform == wanted)))
    }

    async fn history(&self, id: PlatformProfileId) -> RepoResult<Vec<PlatformProfile>> {
        Ok(self.store.history(id))
    }

    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewPlatformProfile,
    ) -> RepoResult<PlatformProfile> {
        Ok(self.store.insert(PlatformProfile::new(owner, input)))
    }

    async fn update(
        &self,
        id: PlatformProfileId,
        owner: UserId,
        update: PlatformProfileUpdate,
    ) -> RepoResult<PlatformProfile> {
        self.store
            .update(id, owner, |current| current.next_version(update))
    }

    async fn deactivate(&self, id: PlatformProfileId, owner: UserId) -> RepoResult<()> {
        self.store.deactivate(id, owner)
    }
}

/// In-memory implementation of PromptTemplateRepository
#[derive(Default)]
pub struct InMemoryPromptTemplateRepository {
    store: VersionStore<PromptTemplate>,
}

impl InMemoryPromptTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptTemplateRepository for InMemoryPromptTemplateRepository {
    async fn find_by_id(&self, id: PromptTemplateId) -> RepoResult<Option<PromptTemplate>> {
        Ok(self.store.find(id))
    }

    async fn find_active_by_id(
        &self,
        owner: UserId,
        id: PromptTemplateId,
    ) -> RepoResult<Option<PromptTemplate>> {
        Ok(self.store.find_active(owner, id))
    }

    async fn get_active(
        &self,
        owner: UserId,
        task_type: TaskType,
    ) -> RepoResult<Option<PromptTemplate>> {
        Ok(self.store.resolve(owner, |t| t.task_type == task_type))
    }

    async fn list_active(
        &self,
        owner: UserId,
        task_type: Option<TaskType>,
    ) -> RepoResult<Vec<PromptTemplate>> {
        Ok(self
            .store
            .list(owner, |t| task_type.is_none_or(|wanted| t.task_type == wanted)))
    }

    async fn history(&self, id: PromptTemplateId) -> RepoResult<Vec<PromptTemplate>> {
        Ok(self.store.history(id))
    }

    async fn create(
        &self,
        owner: Option<UserId>,
        input: NewPromptTemplate,
    ) -> RepoResult<PromptTemplate> {
        Ok(self.store.insert(PromptTemplate::new(owner, input)))
    }

    async fn update(
        &self,
        id: PromptTemplateId,
        owner: UserId,
        update: PromptTemplateUpdate,
    ) -> RepoResult<PromptTemplate> {
        self.store
            .update(id, owner, |current| current.next_version(update))
    }

    async fn deactivate(&self, id: PromptTemplateId, owner: UserId) -> RepoResult<()> {
        self.store.deactivate(id, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postcraft_core::entities::{LengthConstraints, PlatformStructure};
    use std::sync::Arc;

    fn voice(name: &str, is_default: bool) -> NewVoiceProfile {
        NewVoiceProfile {
            name: name.to_string(),
            persona: format!("{name} persona"),
            tone_rules: vec!["Warm".to_string()],
            is_default,
            ..Default::default()
        }
    }

    fn platform(platform: Platform, is_default: bool) -> NewPlatformProfile {
        NewPlatformProfile {
            platform,
            name: format!("{platform} default"),
            structure: PlatformStructure::default(),
            formatting_rules: vec![],
            length_constraints: LengthConstraints::default(),
            required_output_fields: vec!["content".to_string()],
            is_default,
        }
    }

    fn template(task_type: TaskType, content: &str) -> NewPromptTemplate {
        NewPromptTemplate {
            task_type,
            name: task_type.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_creates_next_version() {
        let repo = InMemoryVoiceProfileRepository::new();
        let owner = UserId::new();
        let v1 = repo.create(Some(owner), voice("Mentor", true)).await.unwrap();

        let v2 = repo
            .update(
                v1.id,
                owner,
                VoiceProfileUpdate {
                    persona: Some("Coach".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(v2.version, 2);
        assert_eq!(v2.lineage_id, v1.id);
        assert!(!repo.find_by_id(v1.id).await.unwrap().unwrap().is_active);
        assert_eq!(repo.get_active(owner).await.unwrap().unwrap().id, v2.id);

        let history = repo.history(v2.id).await.unwrap();
        let versions: Vec<i32> = history.iter().map(|p| p.version).collect();
        assert_eq!(versions, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_update_of_superseded_row_is_stale() {
        let repo = InMemoryVoiceProfileRepository::new();
        let owner = UserId::new();
        let v1 = repo.create(Some(owner), voice("Mentor", true)).await.unwrap();
        repo.update(v1.id, owner, VoiceProfileUpdate::default())
            .await
            .unwrap();

        let err = repo
            .update(v1.id, owner, VoiceProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StaleVersion { .. }));
        assert_eq!(repo.history(v1.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_updates_do_not_fork() {
        let repo = Arc::new(InMemoryVoiceProfileRepository::new());
        let owner = UserId::new();
        let v1 = repo.create(Some(owner), voice("Mentor", true)).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.update(v1.id, owner, VoiceProfileUpdate::default())
                        .await
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 1);
        let history = repo.history(v1.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().filter(|p| p.is_active).count(), 1);
    }

    #[tokio::test]
    async fn test_new_default_clears_previous_default() {
        let repo = InMemoryVoiceProfileRepository::new();
        let owner = UserId::new();
        let first = repo.create(Some(owner), voice("First", true)).await.unwrap();
        let second = repo.create(Some(owner), voice("Second", true)).await.unwrap();

        assert!(!repo.find_by_id(first.id).await.unwrap().unwrap().is_default);
        assert_eq!(repo.get_active(owner).await.unwrap().unwrap().id, second.id);

        let listed = repo.list_active(owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
    }

    #[tokio::test]
    async fn test_owner_default_shadows_system_default() {
        let repo = InMemoryVoiceProfileRepository::new();
        let owner = UserId::new();
        let system = repo.create(None, voice("System", true)).await.unwrap();

        assert_eq!(repo.get_active(owner).await.unwrap().unwrap().id, system.id);

        let own = repo.create(Some(owner), voice("Mine", true)).await.unwrap();
        assert_eq!(repo.get_active(owner).await.unwrap().unwrap().id, own.id);
        // The owner's default never touches the system default
        assert!(repo.find_by_id(system.id).await.unwrap().unwrap().is_default);
        assert_eq!(
            repo.get_active(UserId::new()).await.unwrap().unwrap().id,
            system.id
        );
    }

    #[tokio::test]
    async fn test_system_rows_are_read_only() {
        let repo = InMemoryVoiceProfileRepository::new();
        let system = repo.create(None, voice("System", true)).await.unwrap();
        let owner = UserId::new();

        let err = repo
            .update(system.id, owner, VoiceProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(repo.deactivate(system.id, owner).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_deactivated_default_no_longer_resolves() {
        let repo = InMemoryVoiceProfileRepository::new();
        let owner = UserId::new();
        let profile = repo.create(Some(owner), voice("Mine", true)).await.unwrap();

        repo.deactivate(profile.id, owner).await.unwrap();
        repo.deactivate(profile.id, owner).await.unwrap();

        assert!(repo.get_active(owner).await.unwrap().is_none());
        assert!(repo.find_active_by_id(owner, profile.id).await.unwrap().is_none());
        assert!(repo.find_by_id(profile.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_platform_defaults_are_scoped_per_platform() {
        let repo = InMemoryPlatformProfileRepository::new();
        let owner = UserId::new();
        let linkedin = repo
            .create(Some(owner), platform(Platform::Linkedin, true))
            .await
            .unwrap();
        let instagram = repo
            .create(Some(owner), platform(Platform::Instagram, true))
            .await
            .unwrap();

        let resolved = repo.get_active(owner, Platform::Linkedin).await.unwrap();
        assert_eq!(resolved.unwrap().id, linkedin.id);
        let resolved = repo.get_active(owner, Platform::Instagram).await.unwrap();
        assert_eq!(resolved.unwrap().id, instagram.id);
        assert!(repo
            .get_active(owner, Platform::Facebook)
            .await
            .unwrap()
            .is_none());

        let listed = repo
            .list_active(owner, Some(Platform::Instagram))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_template_resolves_highest_active_version() {
        let repo = InMemoryPromptTemplateRepository::new();
        let owner = UserId::new();
        let system = repo
            .create(None, template(TaskType::Ideation, "System ideas"))
            .await
            .unwrap();
        let own = repo
            .create(Some(owner), template(TaskType::Ideation, "My ideas v1"))
            .await
            .unwrap();
        let own_v2 = repo
            .update(
                own.id,
                owner,
                PromptTemplateUpdate {
                    content: Some("My ideas v2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let resolved = repo.get_active(owner, TaskType::Ideation).await.unwrap().unwrap();
        assert_eq!(resolved.id, own_v2.id);
        assert_eq!(resolved.content, "My ideas v2");

        let other = repo
            .get_active(UserId::new(), TaskType::Ideation)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(other.id, system.id);
        assert!(repo
            .get_active(owner, TaskType::Rewriting)
            .await
            .unwrap()
            .is_none());
    }
}
