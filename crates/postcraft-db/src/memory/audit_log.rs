//! In-memory AuditLogRepository

use async_trait::async_trait;
use parking_lot::RwLock;

use postcraft_core::entities::AuditLogEntry;
use postcraft_core::traits::{AuditLogRepository, AuditQuery, RepoResult};
use postcraft_core::value_objects::{AuditLogId, UserId};
use postcraft_core::DomainError;

/// Append-only in-memory audit log
#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded entries across all users
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn insert(&self, entry: &AuditLogEntry) -> RepoResult<()> {
        let mut entries = self.entries.write();
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(DomainError::DatabaseError(format!(
                "audit log entry {} already exists",
                entry.id
            )));
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        user_id: UserId,
        id: AuditLogId,
    ) -> RepoResult<Option<AuditLogEntry>> {
        Ok(self
            .entries
            .read()
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: UserId, query: &AuditQuery) -> RepoResult<Vec<AuditLogEntry>> {
        // Reverse insertion order first so equal timestamps stay newest first
        let mut matching: Vec<AuditLogEntry> = self
            .entries
            .read()
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id && query.matches(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(query.effective_offset() as usize)
            .take(query.effective_limit() as usize)
            .collect())
    }
}
