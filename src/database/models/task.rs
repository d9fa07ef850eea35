use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require_text, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub priority: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Whole seconds between start and end, set when the task is stopped
    pub total_time: Option<i64>,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Where a task sits in its lifecycle. Stopped is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Active,
    Stopped,
}

impl Task {
    pub fn state(&self) -> TaskState {
        if self.is_active {
            TaskState::Active
        } else {
            TaskState::Stopped
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaskWithTags {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub tags: Vec<String>,
}

/// The running task joined with its project name
#[derive(Debug, Clone, FromRow)]
pub struct ActiveTask {
    #[sqlx(flatten)]
    pub task: Task,
    pub project_name: Option<String>,
}

/// Response body of GET /tasks/active
#[derive(Debug, Clone, Serialize)]
pub struct ActiveTaskView {
    #[serde(flatten)]
    pub task: Task,
    pub project_name: Option<String>,
    #[serde(rename = "elapsedTime")]
    pub elapsed_time: i64,
}

impl ActiveTask {
    pub fn view_at(self, now: DateTime<Utc>) -> ActiveTaskView {
        let elapsed_time = elapsed_seconds(self.task.start_time, now);
        ActiveTaskView {
            task: self.task,
            project_name: self.project_name,
            elapsed_time,
        }
    }
}

/// Response body of PUT /tasks/:id/stop; `total_time` is rendered for display
#[derive(Debug, Clone, Serialize)]
pub struct StoppedTaskView {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub priority: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub total_time: String,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Task> for StoppedTaskView {
    fn from(task: Task) -> Self {
        Self {
            total_time: format_total_time(task.total_time.unwrap_or(0)),
            id: task.id,
            user_id: task.user_id,
            title: task.title,
            priority: task.priority,
            start_time: task.start_time,
            end_time: task.end_time,
            is_active: task.is_active,
            project_id: task.project_id,
            created_at: task.created_at,
        }
    }
}

/// Body of POST /tasks
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl NewTask {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: require_text(&self.title, "Task title")?,
            priority: self.priority,
        })
    }
}

/// Whole seconds from `start` to `now`, floored; never negative.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_seconds().max(0)
}

/// Display form used by the stop response, e.g. `"1h 5m"`.
pub fn format_total_time(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}
