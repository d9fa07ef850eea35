use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require_text, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarEvent {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of POST /calendar and PUT /calendar/:id
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEventInput {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub is_all_day: bool,
}

impl CalendarEventInput {
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.end_time < self.start_time {
            return Err(ValidationError::new("end_time must not be before start_time"));
        }
        Ok(Self {
            title: require_text(&self.title, "Event title")?,
            ..self
        })
    }
}
