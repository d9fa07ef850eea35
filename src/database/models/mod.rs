pub mod calendar;
pub mod journal;
pub mod project;
pub mod tag;
pub mod task;

use thiserror::Error;

/// Request payload rejected before it reaches the store
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError(message.into())
    }
}

/// Postgres text columns cannot store NUL characters
pub(crate) fn reject_nul(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(ValidationError::new(format!("{} must not contain NUL characters", field)));
    }
    Ok(())
}

/// Trimmed, non-empty text or a validation error naming the field
pub(crate) fn require_text(value: &str, field: &str) -> Result<String, ValidationError> {
    reject_nul(value, field)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims() {
        assert_eq!(require_text("  Read  ", "Task title").unwrap(), "Read");
    }

    #[test]
    fn require_text_rejects_blank() {
        let err = require_text(" \t ", "Tag name").unwrap_err();
        assert_eq!(err.to_string(), "Tag name is required");
    }

    #[test]
    fn require_text_rejects_nul() {
        let err = require_text("x\u{0}", "Task title").unwrap_err();
        assert_eq!(err.to_string(), "Task title must not contain NUL characters");
    }
}
