pub mod calendar_service;
pub mod journal_service;
pub mod project_service;
pub mod tag_service;
pub mod task_service;

pub use calendar_service::CalendarService;
pub use journal_service::JournalService;
pub use project_service::ProjectService;
pub use tag_service::TagService;
pub use task_service::TaskService;
