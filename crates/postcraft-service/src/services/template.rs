//! Prompt template service

use postcraft_core::entities::PromptTemplate;
use postcraft_core::value_objects::{PromptTemplateId, TaskType, UserId};
use postcraft_core::DomainError;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{CreatePromptTemplateRequest, PromptTemplateResponse, UpdatePromptTemplateRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Prompt template service
pub struct TemplateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TemplateService<'a> {
    /// Create a new TemplateService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The template generation would use for the task right now
    #[instrument(skip(self))]
    pub async fn get_active_template(
        &self,
        user_id: UserId,
        task_type: TaskType,
    ) -> ServiceResult<PromptTemplateResponse> {
        let template = self.resolve_template(user_id, task_type).await?;
        Ok(PromptTemplateResponse::from(&template))
    }

    #[instrument(skip(self))]
    pub async fn get_template(
        &self,
        user_id: UserId,
        id: PromptTemplateId,
    ) -> ServiceResult<PromptTemplateResponse> {
        let template = self.visible_template(user_id, id).await?;
        Ok(PromptTemplateResponse::from(&template))
    }

    #[instrument(skip(self))]
    pub async fn list_templates(
        &self,
        user_id: UserId,
        task_type: Option<TaskType>,
    ) -> ServiceResult<Vec<PromptTemplateResponse>> {
        let templates = self
            .ctx
            .prompt_template_repo()
            .list_active(user_id, task_type)
            .await?;
        Ok(templates.iter().map(PromptTemplateResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn template_history(
        &self,
        user_id: UserId,
        id: PromptTemplateId,
    ) -> ServiceResult<Vec<PromptTemplateResponse>> {
        self.visible_template(user_id, id).await?;
        let versions = self.ctx.prompt_template_repo().history(id).await?;
        Ok(versions.iter().map(PromptTemplateResponse::from).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_template(
        &self,
        user_id: UserId,
        request: CreatePromptTemplateRequest,
    ) -> ServiceResult<PromptTemplateResponse> {
        request.validate()?;

        let template = self
            .ctx
            .prompt_template_repo()
            .create(Some(user_id), request.into())
            .await?;

        info!(prompt_template_id = %template.id, task_type = %template.task_type, "Prompt template created");

        Ok(PromptTemplateResponse::from(&template))
    }

    #[instrument(skip(self, request))]
    pub async fn update_template(
        &self,
        user_id: UserId,
        id: PromptTemplateId,
        request: UpdatePromptTemplateRequest,
    ) -> ServiceResult<PromptTemplateResponse> {
        request.validate()?;

        let template = self
            .ctx
            .prompt_template_repo()
            .update(id, user_id, request.into())
            .await?;

        info!(
            previous_id = %id,
            prompt_template_id = %template.id,
            version = template.version,
            "Prompt template updated"
        );

        Ok(PromptTemplateResponse::from(&template))
    }

    #[instrument(skip(self))]
    pub async fn deactivate_template(
        &self,
        user_id: UserId,
        id: PromptTemplateId,
    ) -> ServiceResult<()> {
        self.ctx
            .prompt_template_repo()
            .deactivate(id, user_id)
            .await?;
        info!(prompt_template_id = %id, "Prompt template deactivated");
        Ok(())
    }

    pub(crate) async fn resolve_template(
        &self,
        user_id: UserId,
        task_type: TaskType,
    ) -> ServiceResult<PromptTemplate> {
        let template = self
            .ctx
            .prompt_template_repo()
            .get_active(user_id, task_type)
            .await?
            .ok_or_else(|| {
                DomainError::ConfigurationMissing(format!(
                    "no active prompt template for task {task_type}"
                ))
            })?;
        Ok(template)
    }

    async fn visible_template(
        &self,
        user_id: UserId,
        id: PromptTemplateId,
    ) -> ServiceResult<PromptTemplate> {
        let template = self
            .ctx
            .prompt_template_repo()
            .find_by_id(id)
            .await?
            .filter(|t| t.owner.is_none_or(|owner| owner == user_id))
            .ok_or(DomainError::PromptTemplateNotFound(id))?;
        Ok(template)
    }
}
