//! Prompt template entity <-> model mapper

use postcraft_core::entities::PromptTemplate;
use postcraft_core::value_objects::{PromptTemplateId, TaskType, UserId};
use postcraft_core::DomainError;
use uuid::Uuid;

use super::corrupt_column;
use crate::models::PromptTemplateModel;

impl TryFrom<PromptTemplateModel> for PromptTemplate {
    type Error = DomainError;

    fn try_from(model: PromptTemplateModel) -> Result<Self, Self::Error> {
        let task_type: TaskType = model
            .task_type
            .parse()
            .map_err(|e| corrupt_column("task_type", e))?;

        Ok(PromptTemplate {
            id: PromptTemplateId::from_uuid(model.id),
            lineage_id: PromptTemplateId::from_uuid(model.lineage_id),
            owner: model.user_id.map(UserId::from_uuid),
            task_type,
            name: model.name,
            content: model.content,
            version: model.version,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}

pub struct PromptTemplateInsert<'a> {
    pub id: Uuid,
    pub lineage_id: Uuid,
    pub user_id: Option<Uuid>,
    pub task_type: &'static str,
    pub name: &'a str,
    pub content: &'a str,
    pub version: i32,
    pub is_active: bool,
}

impl<'a> PromptTemplateInsert<'a> {
    pub fn new(template: &'a PromptTemplate) -> Self {
        Self {
            id: template.id.into_inner(),
            lineage_id: template.lineage_id.into_inner(),
            user_id: template.owner.map(UserId::into_inner),
            task_type: template.task_type.as_str(),
            name: &template.name,
            content: &template.content,
            version: template.version,
            is_active: template.is_active,
        }
    }
}
