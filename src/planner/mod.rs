pub mod error;
pub mod event;
pub mod quote;
pub mod store;
pub mod subject;
pub mod task;
pub mod timer;

use chrono::{DateTime, Utc};

pub use error::ValidationError;
pub use event::{EventBook, EventDraft, EventKind, StudyEvent};
pub use store::{Store, StoreError};
pub use subject::{GradeBand, Subject, SubjectBook, SubjectColor};
pub use task::{Category, Priority, Task, TaskDraft, TaskFilter, TaskList, TaskStats};
pub use timer::{Phase, PomodoroTimer, SessionKind, SessionLog, StudySession, TimerSettings};

/// Timestamp-derived identifier (milliseconds since epoch).
///
/// Bumped past the largest numeric id in `existing` so two entities created
/// within the same millisecond still get distinct ids.
pub fn fresh_id<'a>(now: DateTime<Utc>, existing: impl IntoIterator<Item = &'a str>) -> String {
    let candidate = now.timestamp_millis();
    let max_taken = existing
        .into_iter()
        .filter_map(|id| id.parse::<i64>().ok())
        .max();
    match max_taken {
        Some(max) if max >= candidate => (max + 1).to_string(),
        _ => candidate.to_string(),
    }
}
