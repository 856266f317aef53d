//! Prompt template entity - task instructions

use chrono::{DateTime, Utc};

use crate::value_objects::{PromptTemplateId, TaskType, UserId};

/// One version of a task template. The active template for a task is the
/// highest active version; templates have no default flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: PromptTemplateId,
    pub lineage_id: PromptTemplateId,
    pub owner: Option<UserId>,
    pub task_type: TaskType,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPromptTemplate {
    pub task_type: TaskType,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct PromptTemplateUpdate {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl PromptTemplate {
    pub fn new(owner: Option<UserId>, input: NewPromptTemplate) -> Self {
        let id = PromptTemplateId::new();
        Self {
            id,
            lineage_id: id,
            owner,
            task_type: input.task_type,
            name: input.name,
            content: input.content,
            version: 1,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn next_version(&self, update: PromptTemplateUpdate) -> Self {
        Self {
            id: PromptTemplateId::new(),
            lineage_id: self.lineage_id,
            owner: self.owner,
            task_type: self.task_type,
            name: update.name.unwrap_or_else(|| self.name.clone()),
            content: update.content.unwrap_or_else(|| self.content.clone()),
            version: self.version + 1,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
