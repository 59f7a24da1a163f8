//! Pomodoro countdown and the completed-session log.
//!
//! The timer is a plain state machine with no thread of its own: the event
//! loop calls [`PomodoroTimer::tick`] once per elapsed second.
//!
//! ```text
//! Work(paused) <-> Work(running) --0s--> Break(paused) <-> Break(running) --0s--> Work(paused)
//! ```

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fresh_id;

/// The log keeps only the most recent sessions.
pub const SESSION_LOG_CAPACITY: usize = 50;

pub const WORK_CHOICES: [u32; 5] = [15, 25, 30, 45, 60];
pub const SHORT_BREAK_CHOICES: [u32; 3] = [5, 10, 15];
pub const LONG_BREAK_CHOICES: [u32; 3] = [15, 20, 30];
pub const LONG_BREAK_EVERY_CHOICES: [u32; 5] = [2, 3, 4, 5, 6];

/// Durations in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub work_duration: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub sessions_until_long_break: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break: 5,
            long_break: 15,
            sessions_until_long_break: 4,
        }
    }
}

impl TimerSettings {
    pub fn minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
        }
    }

    pub fn cycle_work(&mut self) {
        self.work_duration = next_choice(&WORK_CHOICES, self.work_duration);
    }

    pub fn cycle_short_break(&mut self) {
        self.short_break = next_choice(&SHORT_BREAK_CHOICES, self.short_break);
    }

    pub fn cycle_long_break(&mut self) {
        self.long_break = next_choice(&LONG_BREAK_CHOICES, self.long_break);
    }

    pub fn cycle_long_break_every(&mut self) {
        self.sessions_until_long_break =
            next_choice(&LONG_BREAK_EVERY_CHOICES, self.sessions_until_long_break);
    }
}

/// Value after `current` in `choices`, wrapping; first entry if `current`
/// is not one of them.
fn next_choice(choices: &[u32], current: u32) -> u32 {
    match choices.iter().position(|&c| c == current) {
        Some(i) => choices[(i + 1) % choices.len()],
        None => choices[0],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Work)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Focus Time",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn session_kind(self) -> SessionKind {
        if self.is_break() {
            SessionKind::Break
        } else {
            SessionKind::Work
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::Break => "Break",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    /// Minutes.
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub completed_at: DateTime<Utc>,
}

/// A phase that just ran down to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseCompleted {
    pub kind: SessionKind,
    pub minutes: u32,
    pub next: Phase,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodayStats {
    pub pomodoros: usize,
    pub study_minutes: u32,
}

impl TodayStats {
    pub fn study_time_display(&self) -> String {
        format!("{}h {}m", self.study_minutes / 60, self.study_minutes % 60)
    }
}

/// Completed sessions, newest first, capped at [`SESSION_LOG_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<StudySession>", into = "Vec<StudySession>")]
pub struct SessionLog {
    sessions: Vec<StudySession>,
}

impl From<Vec<StudySession>> for SessionLog {
    fn from(sessions: Vec<StudySession>) -> Self {
        Self::new(sessions)
    }
}

impl From<SessionLog> for Vec<StudySession> {
    fn from(log: SessionLog) -> Self {
        log.sessions
    }
}

impl SessionLog {
    pub fn new(mut sessions: Vec<StudySession>) -> Self {
        sessions.truncate(SESSION_LOG_CAPACITY);
        Self { sessions }
    }

    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn work_count(&self) -> usize {
        self.sessions.iter().filter(|s| s.kind == SessionKind::Work).count()
    }

    /// Record a finished phase, dropping the oldest entry past capacity.
    pub fn record(&mut self, completed: PhaseCompleted, now: DateTime<Utc>) -> &StudySession {
        let id = fresh_id(now, self.sessions.iter().map(|s| s.id.as_str()));
        self.sessions.insert(
            0,
            StudySession {
                id,
                duration: completed.minutes,
                kind: completed.kind,
                completed_at: now,
            },
        );
        self.sessions.truncate(SESSION_LOG_CAPACITY);
        &self.sessions[0]
    }

    /// Work sessions whose completion falls on `today` in `tz`.
    pub fn today_stats<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> TodayStats {
        self.sessions
            .iter()
            .filter(|s| s.kind == SessionKind::Work)
            .filter(|s| s.completed_at.with_timezone(tz).date_naive() == today)
            .fold(TodayStats::default(), |mut acc, s| {
                acc.pomodoros += 1;
                acc.study_minutes += s.duration;
                acc
            })
    }
}

#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    settings: TimerSettings,
    phase: Phase,
    running: bool,
    remaining_secs: u32,
    /// Work phases finished so far; decides short vs long break.
    completed_work: u32,
}

impl PomodoroTimer {
    /// A paused timer at the start of a work phase.
    pub fn new(settings: TimerSettings, completed_work: u32) -> Self {
        Self {
            settings,
            phase: Phase::Work,
            running: false,
            remaining_secs: settings.work_duration * 60,
            completed_work,
        }
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[cfg(test)]
    pub fn completed_work(&self) -> u32 {
        self.completed_work
    }

    pub fn phase_secs(&self) -> u32 {
        self.settings.minutes(self.phase) * 60
    }

    /// 0.0 .. 1.0 through the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - f64::from(self.remaining_secs) / f64::from(total)
    }

    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Back to a paused, full-length work phase.
    pub fn reset(&mut self) {
        self.running = false;
        self.phase = Phase::Work;
        self.remaining_secs = self.phase_secs();
    }

    /// Swap settings. A paused timer sitting at the full length of its phase
    /// picks up the new length immediately.
    pub fn apply_settings(&mut self, settings: TimerSettings) {
        let untouched = !self.running && self.remaining_secs == self.phase_secs();
        self.settings = settings;
        if untouched {
            self.remaining_secs = self.phase_secs();
        }
    }

    /// Advance one second. Returns the finished phase when the countdown
    /// reaches zero; the timer is then paused at the start of the next one.
    pub fn tick(&mut self) -> Option<PhaseCompleted> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        Some(self.complete_phase())
    }

    fn complete_phase(&mut self) -> PhaseCompleted {
        let finished = self.phase;
        let minutes = self.settings.minutes(finished);

        let next = match finished {
            Phase::Work => {
                self.completed_work += 1;
                let every = self.settings.sessions_until_long_break;
                if every > 0 && self.completed_work % every == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };

        debug!(
            finished = ?finished,
            next = ?next,
            completed_work = self.completed_work,
            "pomodoro phase finished"
        );

        self.phase = next;
        self.running = false;
        self.remaining_secs = self.phase_secs();

        PhaseCompleted {
            kind: finished.session_kind(),
            minutes,
            next,
        }
    }
}

/// `MM:SS`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_minute_work() -> TimerSettings {
        TimerSettings {
            work_duration: 1,
            short_break: 1,
            long_break: 2,
            sessions_until_long_break: 2,
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, h, m, 0).unwrap()
    }

    #[test]
    fn countdown_subtracts_elapsed_seconds() {
        let mut timer = PomodoroTimer::new(TimerSettings::default(), 0);
        timer.toggle();
        for _ in 0..90 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.remaining_secs(), 25 * 60 - 90);
        assert_eq!(timer.clock(), "23:30");
    }

    #[test]
    fn paused_timer_does_not_move() {
        let mut timer = PomodoroTimer::new(TimerSettings::default(), 0);
        for _ in 0..10 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.remaining_secs(), 25 * 60);
    }

    #[test]
    fn reaching_zero_flips_phase_exactly_once() {
        let mut timer = PomodoroTimer::new(one_minute_work(), 0);
        timer.toggle();

        let mut completions = Vec::new();
        for _ in 0..200 {
            if let Some(done) = timer.tick() {
                completions.push(done);
            }
        }

        assert_eq!(
            completions,
            vec![PhaseCompleted {
                kind: SessionKind::Work,
                minutes: 1,
                next: Phase::ShortBreak,
            }]
        );
        assert_eq!(timer.phase(), Phase::ShortBreak);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn long_break_after_configured_work_sessions() {
        let mut timer = PomodoroTimer::new(one_minute_work(), 0);
        let mut phases = Vec::new();
        for _ in 0..4 {
            timer.toggle();
            let done = (0..600).find_map(|_| timer.tick()).unwrap();
            phases.push(done.next);
        }
        assert_eq!(
            phases,
            vec![Phase::ShortBreak, Phase::Work, Phase::LongBreak, Phase::Work]
        );
        assert_eq!(timer.completed_work(), 2);
    }

    #[test]
    fn break_session_records_its_own_length() {
        let mut timer = PomodoroTimer::new(one_minute_work(), 1);
        timer.toggle();
        let work = (0..100).find_map(|_| timer.tick()).unwrap();
        assert_eq!(work.next, Phase::LongBreak);
        timer.toggle();
        let brk = (0..200).find_map(|_| timer.tick()).unwrap();
        assert_eq!(brk.kind, SessionKind::Break);
        assert_eq!(brk.minutes, 2);
    }

    #[test]
    fn reset_returns_to_full_work_phase() {
        let mut timer = PomodoroTimer::new(one_minute_work(), 0);
        timer.toggle();
        (0..100).find_map(|_| timer.tick());
        timer.toggle();
        timer.tick();
        timer.reset();
        assert_eq!(timer.phase(), Phase::Work);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 60);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn settings_apply_only_to_untouched_timer() {
        let mut timer = PomodoroTimer::new(TimerSettings::default(), 0);
        let mut settings = *timer.settings();
        settings.cycle_work();
        timer.apply_settings(settings);
        assert_eq!(timer.remaining_secs(), 30 * 60);

        timer.toggle();
        timer.tick();
        settings.cycle_work();
        timer.apply_settings(settings);
        assert_eq!(timer.settings().work_duration, 45);
        assert_eq!(timer.remaining_secs(), 30 * 60 - 1);
    }

    #[test]
    fn setting_choices_wrap() {
        let mut settings = TimerSettings::default();
        settings.cycle_short_break();
        settings.cycle_short_break();
        assert_eq!(settings.short_break, 15);
        settings.cycle_short_break();
        assert_eq!(settings.short_break, 5);
        settings.long_break = 17;
        settings.cycle_long_break();
        assert_eq!(settings.long_break, 15);
    }

    #[test]
    fn log_is_capped_and_drops_oldest() {
        let mut log = SessionLog::default();
        let done = PhaseCompleted {
            kind: SessionKind::Work,
            minutes: 25,
            next: Phase::ShortBreak,
        };
        let mut first_id = String::new();
        for i in 0..60 {
            let id = log.record(done, at(0, 0) + chrono::Duration::minutes(i)).id.clone();
            if i == 0 {
                first_id = id;
            }
            assert!(log.len() <= SESSION_LOG_CAPACITY);
        }
        assert_eq!(log.len(), SESSION_LOG_CAPACITY);
        assert!(log.sessions().iter().all(|s| s.id != first_id));
        assert_eq!(log.sessions()[0].completed_at, at(0, 59));
        assert_eq!(log.sessions()[49].completed_at, at(0, 10));
    }

    #[test]
    fn oversized_slot_loads_capped() {
        let stored: Vec<StudySession> = (0..70)
            .map(|i| StudySession {
                id: i.to_string(),
                duration: 25,
                kind: SessionKind::Work,
                completed_at: at(0, 0) - chrono::Duration::minutes(i),
            })
            .collect();
        let json = serde_json::to_string(&stored).unwrap();

        let log: SessionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(log.len(), SESSION_LOG_CAPACITY);
        assert_eq!(log.sessions()[0].id, "0");
        assert_eq!(log.sessions()[49].id, "49");
    }

    #[test]
    fn today_stats_count_work_only() {
        let mut log = SessionLog::default();
        let work = PhaseCompleted {
            kind: SessionKind::Work,
            minutes: 45,
            next: Phase::ShortBreak,
        };
        let brk = PhaseCompleted {
            kind: SessionKind::Break,
            minutes: 5,
            next: Phase::Work,
        };
        log.record(work, Utc.with_ymd_and_hms(2026, 10, 18, 23, 0, 0).unwrap());
        log.record(work, at(9, 0));
        log.record(brk, at(9, 45));
        log.record(work, at(10, 0));

        let stats = log.today_stats(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), &Utc);
        assert_eq!(stats.pomodoros, 2);
        assert_eq!(stats.study_minutes, 90);
        assert_eq!(stats.study_time_display(), "1h 30m");
        assert_eq!(log.work_count(), 3);
    }

    #[test]
    fn storage_shape_matches_slot_format() {
        let mut log = SessionLog::default();
        log.record(
            PhaseCompleted {
                kind: SessionKind::Break,
                minutes: 5,
                next: Phase::Work,
            },
            at(9, 0),
        );
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json[0]["type"], "break");
        assert_eq!(json[0]["duration"], 5);
        assert!(json[0].get("completedAt").is_some());

        let settings = serde_json::to_value(TimerSettings::default()).unwrap();
        assert_eq!(settings["workDuration"], 25);
        assert_eq!(settings["sessionsUntilLongBreak"], 4);
    }
}
