//! Audit service
//!
//! Records one immutable entry per generation and serves the read side.

use postcraft_core::entities::{AuditLogEntry, NewAuditEntry};
use postcraft_core::traits::AuditQuery;
use postcraft_core::value_objects::{AuditLogId, UserId};
use postcraft_core::DomainError;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{AuditLogQuery, AuditLogResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Audit service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a generation
    ///
    /// The entry is built completely before the single insert. A failed
    /// insert is reported as `AuditPersistenceFailed` carrying the entity id.
    #[instrument(skip(self, input), fields(action = %input.action, entity_id = %input.entity_id))]
    pub async fn record(
        &self,
        user_id: UserId,
        input: NewAuditEntry,
    ) -> ServiceResult<AuditLogEntry> {
        input.check_consistency()?;

        let entry = AuditLogEntry::new(user_id, input);

        self.ctx
            .audit_log_repo()
            .insert(&entry)
            .await
            .map_err(|e| DomainError::AuditPersistenceFailed {
                reason: e.to_string(),
                entity_id: entry.entity_id,
            })?;

        info!(
            audit_log_id = %entry.id,
            model = %entry.model_used,
            input_tokens = ?entry.input_tokens,
            output_tokens = ?entry.output_tokens,
            "Audit entry recorded"
        );

        Ok(entry)
    }

    /// Get one of the user's entries
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: UserId, id: AuditLogId) -> ServiceResult<AuditLogResponse> {
        let entry = self
            .ctx
            .audit_log_repo()
            .find_by_id(user_id, id)
            .await?
            .ok_or(DomainError::AuditLogNotFound(id))?;

        Ok(AuditLogResponse::from(&entry))
    }

    /// List the user's entries, newest first
    #[instrument(skip(self, query))]
    pub async fn list(
        &self,
        user_id: UserId,
        query: AuditLogQuery,
    ) -> ServiceResult<Vec<AuditLogResponse>> {
        query.validate()?;

        let query = AuditQuery::from(query);
        let entries = self.ctx.audit_log_repo().list(user_id, &query).await?;

        Ok(entries.iter().map(AuditLogResponse::from).collect())
    }
}
