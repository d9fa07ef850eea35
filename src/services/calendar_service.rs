use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::calendar::{CalendarEvent, CalendarEventInput};

const EVENT_COLUMNS: &str =
    "id, user_id, title, start_time, end_time, is_all_day, created_at, updated_at";

pub struct CalendarService {
    pool: PgPool,
}

impl CalendarService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        input: CalendarEventInput,
    ) -> Result<CalendarEvent, DatabaseError> {
        let sql = format!(
            "INSERT INTO calendar_events (user_id, title, start_time, end_time, is_all_day)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, CalendarEvent>(&sql)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.is_all_day)
            .fetch_one(&self.pool)
            .await?;

        Ok(event)
    }

    /// Ordered by start time
    pub async fn list(&self, user_id: &str) -> Result<Vec<CalendarEvent>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM calendar_events WHERE user_id = $1 ORDER BY start_time, id",
            EVENT_COLUMNS
        );
        let events = sqlx::query_as::<_, CalendarEvent>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    pub async fn get(&self, user_id: &str, event_id: i64) -> Result<CalendarEvent, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM calendar_events WHERE id = $1 AND user_id = $2",
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, CalendarEvent>(&sql)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn update(
        &self,
        user_id: &str,
        event_id: i64,
        input: CalendarEventInput,
    ) -> Result<CalendarEvent, DatabaseError> {
        let sql = format!(
            "UPDATE calendar_events
             SET title = $1, start_time = $2, end_time = $3, is_all_day = $4,
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = $5 AND user_id = $6
             RETURNING {}",
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, CalendarEvent>(&sql)
            .bind(&input.title)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.is_all_day)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, user_id: &str, event_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}

fn not_found() -> DatabaseError {
    DatabaseError::NotFound("Calendar event not found or does not belong to you".to_string())
}
