// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here runs behind `middleware::require_auth` and receives the
// verified `AuthUser`. All queries are scoped by `AuthUser::uid`.

pub mod calendar;
pub mod identity;
pub mod journals;
pub mod projects;
pub mod tags;
pub mod tasks;
