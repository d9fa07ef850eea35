use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{reject_nul, require_text, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of POST /projects and PUT /projects/:id
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectInput {
    pub fn validate(self) -> Result<Self, ValidationError> {
        if let Some(description) = &self.description {
            reject_nul(description, "Project description")?;
        }
        Ok(Self {
            name: require_text(&self.name, "Project name")?,
            description: self.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_name_and_keeps_description() {
        let input = ProjectInput {
            name: "  Work ".to_string(),
            description: Some("Day job".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(input.name, "Work");
        assert_eq!(input.description.as_deref(), Some("Day job"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = ProjectInput { name: "   ".to_string(), description: None }
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Project name is required");
    }

    #[test]
    fn nul_in_description_is_rejected() {
        let input = ProjectInput {
            name: "Work".to_string(),
            description: Some("a\u{0}b".to_string()),
        };
        assert!(input.validate().is_err());
    }
}
