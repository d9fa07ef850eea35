use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{reject_nul, ValidationError};

/// Upper bound on an entry body, counted in characters
pub const MAX_ENTRY_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: String,
    pub task_id: Option<i64>,
    pub entry: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJournalEntry {
    pub entry: String,
    #[serde(default)]
    pub task_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JournalEntryUpdate {
    pub entry: String,
}

pub fn validate_entry(entry: &str) -> Result<(), ValidationError> {
    reject_nul(entry, "Entry")?;
    if entry.chars().count() > MAX_ENTRY_CHARS {
        return Err(ValidationError::new(format!(
            "Entry exceeds maximum length of {} characters",
            MAX_ENTRY_CHARS
        )));
    }
    Ok(())
}
