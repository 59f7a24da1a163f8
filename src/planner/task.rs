use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{fresh_id, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Mathematics,
    Science,
    History,
    English,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Mathematics,
        Category::Science,
        Category::History,
        Category::English,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Mathematics => "mathematics",
            Category::Science => "science",
            Category::History => "history",
            Category::English => "english",
        }
    }
}

/// Task list view selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 4] = [
        TaskFilter::All,
        TaskFilter::Pending,
        TaskFilter::Completed,
        TaskFilter::Overdue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskFilter::All => "All Tasks",
            TaskFilter::Pending => "Pending",
            TaskFilter::Completed => "Completed",
            TaskFilter::Overdue => "Overdue",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TaskFilter::All => TaskFilter::Pending,
            TaskFilter::Pending => TaskFilter::Completed,
            TaskFilter::Completed => TaskFilter::Overdue,
            TaskFilter::Overdue => TaskFilter::All,
        }
    }

    /// Pending and Overdue are disjoint: an overdue task only shows under
    /// Overdue (and All).
    pub fn matches(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed && !task.is_overdue(today),
            TaskFilter::Completed => task.completed,
            TaskFilter::Overdue => task.is_overdue(today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub category: Category,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Raw form input for a new task.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub due_date: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn sample(now: DateTime<Utc>) -> Self {
        let task = |id: &str, title: &str, description: &str, completed, priority, category, due: (i32, u32, u32)| Task {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            completed,
            priority,
            category,
            due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2),
            created_at: now,
        };
        Self::new(vec![
            task(
                "1",
                "Complete Math Assignment",
                "Finish exercises 1-20 from Chapter 5",
                false,
                Priority::High,
                Category::Mathematics,
                (2024, 12, 15),
            ),
            task(
                "2",
                "Study for Science Test",
                "Review chapters 3-5 on chemistry",
                false,
                Priority::Medium,
                Category::Science,
                (2024, 12, 20),
            ),
            task(
                "3",
                "Read History Chapter",
                "Chapter 8: World War II",
                true,
                Priority::Low,
                Category::History,
                (2024, 12, 10),
            ),
        ])
    }

    #[cfg(test)]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Validate the draft and put the new task at the top of the list.
    pub fn add(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Result<&Task, ValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let due_date = parse_optional_date(&draft.due_date)?;
        let id = fresh_id(now, self.tasks.iter().map(|t| t.id.as_str()));
        self.tasks.insert(
            0,
            Task {
                id,
                title: title.to_string(),
                description: draft.description.trim().to_string(),
                completed: false,
                priority: draft.priority,
                category: draft.category,
                due_date,
                created_at: now,
            },
        );
        Ok(&self.tasks[0])
    }

    /// Flip the completed flag, returning the new value.
    pub fn toggle(&mut self, id: &str) -> Result<bool, ValidationError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| unknown(id))?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn delete(&mut self, id: &str) -> Result<Task, ValidationError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| unknown(id))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn filtered(&self, filter: TaskFilter, today: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t, today)).collect()
    }

    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        let mut stats = TaskStats {
            total: self.tasks.len(),
            ..TaskStats::default()
        };
        for task in &self.tasks {
            if task.completed {
                stats.completed += 1;
            } else if task.is_overdue(today) {
                stats.overdue += 1;
            } else {
                stats.pending += 1;
            }
        }
        stats
    }
}

fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

fn unknown(id: &str) -> ValidationError {
    ValidationError::UnknownId {
        kind: "task",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn draft(title: &str, due: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            due_date: due.to_string(),
            ..TaskDraft::default()
        }
    }

    fn ids(tasks: Vec<&Task>) -> Vec<String> {
        tasks.into_iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn overdue_task_only_in_overdue_filter() {
        let mut list = TaskList::default();
        let id = list.add(draft("Essay", "2026-10-01"), now()).unwrap().id.clone();

        assert_eq!(ids(list.filtered(TaskFilter::Overdue, today())), vec![id.clone()]);
        assert!(list.filtered(TaskFilter::Pending, today()).is_empty());
        assert!(list.filtered(TaskFilter::Completed, today()).is_empty());
        assert_eq!(list.filtered(TaskFilter::All, today()).len(), 1);
    }

    #[test]
    fn due_today_is_not_overdue() {
        let mut list = TaskList::default();
        list.add(draft("Quiz", "2026-10-19"), now()).unwrap();
        assert!(list.filtered(TaskFilter::Overdue, today()).is_empty());
        assert_eq!(list.filtered(TaskFilter::Pending, today()).len(), 1);
    }

    #[test]
    fn completing_clears_overdue() {
        let mut list = TaskList::default();
        let id = list.add(draft("Lab", "2026-01-01"), now()).unwrap().id.clone();
        assert_eq!(list.toggle(&id), Ok(true));
        assert!(list.filtered(TaskFilter::Overdue, today()).is_empty());
        assert_eq!(ids(list.filtered(TaskFilter::Completed, today())), vec![id.clone()]);
        assert_eq!(list.toggle(&id), Ok(false));
    }

    #[test]
    fn new_tasks_go_first() {
        let mut list = TaskList::sample(now());
        let id = list.add(draft("Newest", ""), now()).unwrap().id.clone();
        assert_eq!(list.tasks()[0].id, id);
        assert_eq!(list.tasks()[0].due_date, None);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn rejects_blank_title_and_bad_date() {
        let mut list = TaskList::default();
        assert_eq!(list.add(draft("  ", ""), now()).unwrap_err(), ValidationError::MissingTitle);
        assert_eq!(
            list.add(draft("Read", "2026-13-40"), now()).unwrap_err(),
            ValidationError::InvalidDate("2026-13-40".to_string())
        );
        assert!(list.is_empty());
    }

    #[test]
    fn stats_count_each_bucket() {
        let list = TaskList::sample(now());
        // Sample due dates are all in 2024.
        assert_eq!(
            list.stats(today()),
            TaskStats {
                total: 3,
                completed: 1,
                pending: 0,
                overdue: 2,
            }
        );
    }

    #[test]
    fn stats_agree_with_filters() {
        let mut list = TaskList::sample(now());
        list.add(draft("Later", "2026-11-02"), now()).unwrap();
        list.add(draft("Today", "2026-10-19"), now()).unwrap();
        list.add(draft("Someday", ""), now()).unwrap();

        let stats = list.stats(today());
        let count = |filter| list.filtered(filter, today()).len();
        assert_eq!(stats.total, count(TaskFilter::All));
        assert_eq!(stats.completed, count(TaskFilter::Completed));
        assert_eq!(stats.pending, count(TaskFilter::Pending));
        assert_eq!(stats.overdue, count(TaskFilter::Overdue));
        assert_eq!(stats.pending, 3);
    }

    #[test]
    fn delete_removes_task() {
        let mut list = TaskList::sample(now());
        assert_eq!(list.delete("2").unwrap().title, "Study for Science Test");
        assert!(list.get("2").is_none());
        assert!(list.delete("2").is_err());
    }

    #[test]
    fn storage_shape_uses_camel_case() {
        let json = serde_json::to_value(TaskList::sample(now())).unwrap();
        let first = &json[0];
        assert_eq!(first["dueDate"], "2024-12-15");
        assert_eq!(first["priority"], "high");
        assert_eq!(first["category"], "mathematics");
        assert!(first.get("createdAt").is_some());
    }
}
