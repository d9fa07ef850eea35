use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require_text, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Row of the task/tag association table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskTag {
    pub task_id: i64,
    pub tag_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagInput {
    pub name: String,
}

impl TagInput {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self { name: require_text(&self.name, "Tag name")? })
    }
}

/// Body of POST /tasks/:id/tags
#[derive(Debug, Clone, Deserialize)]
pub struct AttachTagInput {
    pub tag_id: i64,
}
