use chrono::{Datelike, Local, NaiveDate, Utc};
use rand::thread_rng;
use tracing::{info, warn};

use crate::components::form::{self, FormKind, FormState};
use crate::planner::event::UPCOMING_LIMIT;
use crate::planner::quote::random_quote;
use crate::planner::store::{EVENTS_KEY, SESSIONS_KEY, SETTINGS_KEY, SUBJECTS_KEY, TASKS_KEY};
use crate::planner::timer::TodayStats;
use crate::planner::{
    Category, EventBook, EventDraft, EventKind, Phase, PomodoroTimer, Priority, SessionKind, SessionLog,
    Store, StoreError, StudyEvent, Subject, SubjectBook, Task, TaskDraft, TaskFilter, TaskList,
    TimerSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Subjects,
    Tasks,
    Calendar,
    Timer,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Home, Page::Subjects, Page::Tasks, Page::Calendar, Page::Timer];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Subjects => "Subjects",
            Page::Tasks => "To-Do List",
            Page::Calendar => "Calendar",
            Page::Timer => "Study Timer",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
}

/// Quick actions listed on the home page.
pub const QUICK_ACTIONS: [(Page, &str); 4] = [
    (Page::Subjects, "View and manage your subjects and grades"),
    (Page::Tasks, "Add and track your academic tasks"),
    (Page::Calendar, "See your deadlines and events"),
    (Page::Timer, "Focus with the Pomodoro technique"),
];

pub struct App {
    pub running: bool,
    pub page: Page,
    pub input_mode: InputMode,
    pub today: NaiveDate,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub form_state: Option<FormState>,

    pub quote: &'static str,
    pub home_selected: usize,

    pub subjects: SubjectBook,
    pub subject_selected: usize,

    pub tasks: TaskList,
    pub task_filter: TaskFilter,
    pub task_selected: usize,

    pub events: EventBook,
    pub selected_date: NaiveDate,
    pub day_selected: usize,

    pub timer: PomodoroTimer,
    pub sessions: SessionLog,

    store: Store,
}

impl App {
    /// Load every slot, seeding sample data where a slot is absent.
    pub fn new(store: Store) -> Result<Self, StoreError> {
        let today = Local::now().date_naive();
        let now = Utc::now();

        let subjects = store.load_or_seed(SUBJECTS_KEY, SubjectBook::sample)?;
        let tasks = store.load_or_seed(TASKS_KEY, || TaskList::sample(now))?;
        let events = store.load_or_seed(EVENTS_KEY, EventBook::sample)?;
        let sessions: SessionLog = store.load(SESSIONS_KEY)?.unwrap_or_default();
        let settings: TimerSettings = store.load(SETTINGS_KEY)?.unwrap_or_default();

        info!(
            subjects = subjects.len(),
            tasks = tasks.len(),
            events = events.len(),
            sessions = sessions.len(),
            "loaded planner state"
        );

        let completed_work = sessions.work_count() as u32;
        Ok(Self {
            running: true,
            page: Page::Home,
            input_mode: InputMode::Normal,
            today,
            show_help: false,
            status_message: None,
            form_state: None,
            quote: random_quote(&mut thread_rng()),
            home_selected: 0,
            subjects,
            subject_selected: 0,
            tasks,
            task_filter: TaskFilter::All,
            task_selected: 0,
            events,
            selected_date: today,
            day_selected: 0,
            timer: PomodoroTimer::new(settings, completed_work),
            sessions,
            store,
        })
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// A failed write keeps the in-memory state and surfaces on the status
    /// line. Returns whether the slot was written.
    fn report_save(&mut self, key: &str, result: Result<(), StoreError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "failed to persist slot");
                self.notify(format!("Failed to save: {err}"));
                false
            }
        }
    }

    /// Show `message` unless a save error already owns the status line.
    fn notify_saved(&mut self, saved: bool, message: impl Into<String>) {
        if saved {
            self.notify(message);
        }
    }

    fn save_subjects(&mut self) -> bool {
        let result = self.store.save(SUBJECTS_KEY, &self.subjects);
        self.report_save(SUBJECTS_KEY, result)
    }

    fn save_tasks(&mut self) -> bool {
        let result = self.store.save(TASKS_KEY, &self.tasks);
        self.report_save(TASKS_KEY, result)
    }

    fn save_events(&mut self) -> bool {
        let result = self.store.save(EVENTS_KEY, &self.events);
        self.report_save(EVENTS_KEY, result)
    }

    fn save_sessions(&mut self) -> bool {
        let result = self.store.save(SESSIONS_KEY, &self.sessions);
        self.report_save(SESSIONS_KEY, result)
    }

    fn save_settings(&mut self) -> bool {
        let result = self.store.save(SETTINGS_KEY, self.timer.settings());
        self.report_save(SETTINGS_KEY, result)
    }

    // ── Navigation ──

    pub fn go_to(&mut self, page: Page) {
        if self.page != page && page == Page::Home {
            self.new_quote();
        }
        self.page = page;
    }

    pub fn next_page(&mut self) {
        self.go_to(self.page.next());
    }

    pub fn prev_page(&mut self) {
        self.go_to(self.page.prev());
    }

    /// Move the list selection of the current page.
    pub fn select_next(&mut self) {
        let len = self.current_list_len();
        if let Some(selected) = self.current_selection_mut() {
            if len > 0 {
                *selected = (*selected + 1).min(len - 1);
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(selected) = self.current_selection_mut() {
            *selected = selected.saturating_sub(1);
        }
    }

    fn current_list_len(&self) -> usize {
        match self.page {
            Page::Home => QUICK_ACTIONS.len(),
            Page::Subjects => self.subjects.len(),
            Page::Tasks => self.visible_tasks().len(),
            Page::Calendar => self.day_events().len(),
            Page::Timer => 0,
        }
    }

    fn current_selection_mut(&mut self) -> Option<&mut usize> {
        match self.page {
            Page::Home => Some(&mut self.home_selected),
            Page::Subjects => Some(&mut self.subject_selected),
            Page::Tasks => Some(&mut self.task_selected),
            Page::Calendar => Some(&mut self.day_selected),
            Page::Timer => None,
        }
    }

    fn clamp_selections(&mut self) {
        self.subject_selected = self.subject_selected.min(self.subjects.len().saturating_sub(1));
        self.task_selected = self.task_selected.min(self.visible_tasks().len().saturating_sub(1));
        self.day_selected = self.day_selected.min(self.day_events().len().saturating_sub(1));
    }

    // ── Home ──

    pub fn new_quote(&mut self) {
        self.quote = random_quote(&mut thread_rng());
    }

    pub fn open_quick_action(&mut self) {
        if let Some((page, _)) = QUICK_ACTIONS.get(self.home_selected) {
            self.go_to(*page);
        }
    }

    // ── Subjects ──

    pub fn selected_subject(&self) -> Option<&Subject> {
        self.subjects.subjects().get(self.subject_selected)
    }

    pub fn open_subject_form(&mut self) {
        self.open_form(FormState::subject());
    }

    pub fn open_grade_form(&mut self) {
        match self.selected_subject().map(FormState::grade) {
            Some(form) => self.open_form(form),
            None => self.notify("Add a subject first"),
        }
    }

    pub fn remove_selected_subject(&mut self) {
        let Some(id) = self.selected_subject().map(|s| s.id.clone()) else {
            return;
        };
        if let Ok(removed) = self.subjects.remove_subject(&id) {
            info!(id = %removed.id, "removed subject");
            let saved = self.save_subjects();
            self.clamp_selections();
            self.notify_saved(saved, format!("{} has been deleted", removed.name));
        }
    }

    // ── Tasks ──

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.filtered(self.task_filter, self.today)
    }

    fn selected_task_id(&self) -> Option<String> {
        self.visible_tasks().get(self.task_selected).map(|t| t.id.clone())
    }

    pub fn cycle_task_filter(&mut self) {
        self.task_filter = self.task_filter.next();
        self.task_selected = 0;
    }

    pub fn open_task_form(&mut self) {
        self.open_form(FormState::task());
    }

    pub fn toggle_selected_task(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if let Ok(done) = self.tasks.toggle(&id) {
            let saved = self.save_tasks();
            self.clamp_selections();
            self.notify_saved(saved, if done { "Task completed" } else { "Task reopened" });
        }
    }

    pub fn delete_selected_task(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if self.tasks.delete(&id).is_ok() {
            let saved = self.save_tasks();
            self.clamp_selections();
            self.notify_saved(saved, "Task has been removed from your list");
        }
    }

    // ── Calendar ──

    pub fn day_events(&self) -> Vec<&StudyEvent> {
        self.events.on_date(self.selected_date)
    }

    pub fn upcoming_events(&self) -> Vec<&StudyEvent> {
        self.events.upcoming(self.today, UPCOMING_LIMIT)
    }

    pub fn days_with_events(&self) -> std::collections::HashSet<u32> {
        self.events
            .days_with_events(self.selected_date.year(), self.selected_date.month())
    }

    pub fn next_day(&mut self) {
        self.selected_date = self.selected_date.succ_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn prev_day(&mut self) {
        self.selected_date = self.selected_date.pred_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn next_week(&mut self) {
        self.selected_date += chrono::Duration::weeks(1);
        self.on_date_changed();
    }

    pub fn prev_week(&mut self) {
        self.selected_date -= chrono::Duration::weeks(1);
        self.on_date_changed();
    }

    pub fn next_month(&mut self) {
        if let Some(date) = self.selected_date.checked_add_months(chrono::Months::new(1)) {
            self.selected_date = date;
        }
        self.on_date_changed();
    }

    pub fn prev_month(&mut self) {
        if let Some(date) = self.selected_date.checked_sub_months(chrono::Months::new(1)) {
            self.selected_date = date;
        }
        self.on_date_changed();
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.selected_date = self.today;
        self.on_date_changed();
    }

    fn on_date_changed(&mut self) {
        self.day_selected = 0;
    }

    pub fn open_event_form(&mut self) {
        self.open_form(FormState::event(self.selected_date));
    }

    pub fn delete_selected_event(&mut self) {
        let Some(id) = self.day_events().get(self.day_selected).map(|e| e.id.clone()) else {
            self.notify("No event selected");
            return;
        };
        if let Ok(removed) = self.events.delete(&id) {
            let saved = self.save_events();
            self.clamp_selections();
            self.notify_saved(saved, format!("Deleted '{}'", removed.title));
        }
    }

    // ── Timer ──

    pub fn toggle_timer(&mut self) {
        self.timer.toggle();
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    pub fn today_stats(&self) -> TodayStats {
        self.sessions.today_stats(self.today, &Local)
    }

    pub fn update_settings(&mut self, change: impl FnOnce(&mut TimerSettings)) {
        let mut settings = *self.timer.settings();
        change(&mut settings);
        self.timer.apply_settings(settings);
        self.save_settings();
    }

    /// One second of wall time has passed.
    pub fn on_tick(&mut self) {
        self.today = Local::now().date_naive();

        let Some(done) = self.timer.tick() else {
            return;
        };
        self.sessions.record(done, Utc::now());
        let saved = self.save_sessions();
        info!(kind = ?done.kind, minutes = done.minutes, "study session recorded");

        let message = match (done.kind, done.next) {
            (SessionKind::Break, _) => "Break Complete! Time to get back to work!",
            (SessionKind::Work, Phase::LongBreak) => {
                "Work Session Complete! Time for a long break!"
            }
            (SessionKind::Work, _) => "Work Session Complete! Time for a short break!",
        };
        self.notify_saved(saved, message);
    }

    // ── Forms ──

    fn open_form(&mut self, form: FormState) {
        self.form_state = Some(form);
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.form_state.as_mut()
    }

    /// Validate and apply the open form. Invalid input keeps it open.
    pub fn submit_form(&mut self) {
        let Some(state) = self.form_state.clone() else {
            return;
        };
        let now = Utc::now();

        let outcome = match &state.kind {
            FormKind::Subject => self
                .subjects
                .add_subject(state.text(form::NAME), now)
                .map(|s| format!("{} has been added!", s.name)),
            FormKind::Grade { subject_id, .. } => self
                .subjects
                .add_grade(subject_id, state.text(form::GRADE))
                .map(|g| format!("Grade {g} added successfully!")),
            FormKind::Task => {
                let draft = TaskDraft {
                    title: state.text(form::TITLE).to_string(),
                    description: state.text(form::DESCRIPTION).to_string(),
                    priority: Priority::ALL[state.choice(form::PRIORITY).min(Priority::ALL.len() - 1)],
                    category: Category::ALL[state.choice(form::CATEGORY).min(Category::ALL.len() - 1)],
                    due_date: state.text(form::DUE).to_string(),
                };
                self.tasks
                    .add(draft, now)
                    .map(|_| "Your task has been added successfully!".to_string())
            }
            FormKind::Event => {
                let draft = EventDraft {
                    title: state.text(form::TITLE).to_string(),
                    date: state.text(form::DATE).to_string(),
                    time: state.text(form::TIME).to_string(),
                    kind: EventKind::ALL[state.choice(form::KIND).min(EventKind::ALL.len() - 1)],
                    description: state.text(form::DESCRIPTION).to_string(),
                };
                match self.events.add(draft, now) {
                    Ok(event) => {
                        self.selected_date = event.date;
                        self.day_selected = 0;
                        Ok("Your event has been added to the calendar!".to_string())
                    }
                    Err(err) => Err(err),
                }
            }
        };

        match outcome {
            Ok(message) => {
                let saved = match state.kind {
                    FormKind::Subject | FormKind::Grade { .. } => self.save_subjects(),
                    FormKind::Task => self.save_tasks(),
                    FormKind::Event => self.save_events(),
                };
                self.close_form();
                self.clamp_selections();
                self.notify_saved(saved, message);
            }
            Err(err) => {
                info!(error = %err, "rejected form input");
                self.notify(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let app = App::new(store).unwrap();
        (dir, app)
    }

    fn type_into(app: &mut App, text: &str) {
        for c in text.chars() {
            app.form_mut().unwrap().input_char(c);
        }
    }

    #[test]
    fn first_start_seeds_and_persists_samples() {
        let (dir, app) = app();
        assert_eq!(app.subjects.len(), 3);
        assert_eq!(app.tasks.len(), 3);
        assert_eq!(app.events.len(), 3);
        assert!(app.sessions.is_empty());
        assert!(dir.path().join(format!("{SUBJECTS_KEY}.json")).exists());
        assert!(!dir.path().join(format!("{SESSIONS_KEY}.json")).exists());
    }

    #[test]
    fn grade_form_appends_and_saves() {
        let (dir, mut app) = app();
        app.go_to(Page::Subjects);
        app.open_grade_form();
        type_into(&mut app, "95");
        app.submit_form();

        assert!(app.form_state.is_none());
        assert_eq!(app.subjects.get("1").unwrap().grades.len(), 5);

        let reloaded = App::new(Store::open(dir.path()).unwrap()).unwrap();
        assert_eq!(reloaded.subjects.get("1").unwrap().grades.last(), Some(&95.0));
    }

    #[test]
    fn invalid_grade_keeps_form_open() {
        let (_dir, mut app) = app();
        app.open_grade_form();
        type_into(&mut app, "120");
        app.submit_form();

        assert!(app.form_state.is_some());
        assert_eq!(app.input_mode, InputMode::Form);
        assert!(app.status_message.as_deref().unwrap().contains("valid grade"));
        assert_eq!(app.subjects.get("1").unwrap().grades.len(), 4);
    }

    #[test]
    fn new_task_lands_on_top() {
        let (_dir, mut app) = app();
        app.go_to(Page::Tasks);
        app.open_task_form();
        type_into(&mut app, "Flashcards");
        app.submit_form();
        assert_eq!(app.tasks.tasks()[0].title, "Flashcards");
        assert_eq!(app.tasks.tasks()[0].priority, Priority::Medium);
    }

    #[test]
    fn event_form_jumps_to_event_date() {
        let (_dir, mut app) = app();
        app.go_to(Page::Calendar);
        app.open_event_form();
        type_into(&mut app, "Finals");
        let state = app.form_mut().unwrap();
        state.next_field();
        let date = state.text(form::DATE).len();
        for _ in 0..date {
            state.backspace();
        }
        type_into(&mut app, "2031-06-01");
        app.submit_form();

        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2031, 6, 1).unwrap());
        assert_eq!(app.day_events()[0].title, "Finals");
    }

    #[test]
    fn finished_phase_is_logged_and_persisted() {
        let (dir, mut app) = app();
        app.update_settings(|s| s.work_duration = 1);
        app.toggle_timer();
        for _ in 0..60 {
            app.on_tick();
        }
        assert_eq!(app.sessions.len(), 1);
        assert_eq!(app.sessions.sessions()[0].duration, 1);
        assert!(app.status_message.as_deref().unwrap().contains("short break"));
        assert!(dir.path().join(format!("{SESSIONS_KEY}.json")).exists());

        let reloaded = App::new(Store::open(dir.path()).unwrap()).unwrap();
        assert_eq!(reloaded.timer.completed_work(), 1);
        assert_eq!(reloaded.timer.settings().work_duration, 1);
    }

    #[test]
    fn failed_save_message_is_not_overwritten() {
        let (dir, mut app) = app();
        app.update_settings(|s| s.work_duration = 1);
        std::fs::remove_dir_all(dir.path()).unwrap();

        app.go_to(Page::Tasks);
        let was_done = app.visible_tasks()[0].completed;
        app.toggle_selected_task();
        assert_ne!(app.visible_tasks()[0].completed, was_done);
        assert!(app.status_message.as_deref().unwrap().starts_with("Failed to save"));

        app.status_message = None;
        app.toggle_timer();
        for _ in 0..60 {
            app.on_tick();
        }
        assert_eq!(app.sessions.len(), 1);
        assert!(app.status_message.as_deref().unwrap().starts_with("Failed to save"));

        app.status_message = None;
        app.open_subject_form();
        type_into(&mut app, "Art");
        app.submit_form();
        assert!(app.form_state.is_none());
        assert_eq!(app.subjects.len(), 4);
        assert!(app.status_message.as_deref().unwrap().starts_with("Failed to save"));
    }

    #[test]
    fn page_cycle_wraps() {
        let (_dir, mut app) = app();
        app.prev_page();
        assert_eq!(app.page, Page::Timer);
        app.next_page();
        assert_eq!(app.page, Page::Home);
    }
}
