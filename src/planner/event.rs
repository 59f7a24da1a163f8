use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{fresh_id, ValidationError};

/// Maximum number of entries in the upcoming list.
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Exam,
    Assignment,
    Project,
    Class,
    #[default]
    Other,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Exam,
        EventKind::Assignment,
        EventKind::Project,
        EventKind::Class,
        EventKind::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Exam => "exam",
            EventKind::Assignment => "assignment",
            EventKind::Project => "project",
            EventKind::Class => "class",
            EventKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, with = "clock_time")]
    pub time: Option<NaiveTime>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub description: String,
}

/// `HH:MM` on disk, with `""` for an all-day event.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        let raw = raw.as_deref().map(str::trim).unwrap_or("");
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid time `{raw}`, expected HH:MM")))
    }
}

impl StudyEvent {
    pub fn time_display(&self) -> String {
        match self.time {
            Some(t) => t.format("%H:%M").to_string(),
            None => "All day".to_string(),
        }
    }
}

/// Raw form input for a new event.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub time: String,
    pub kind: EventKind,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventBook {
    events: Vec<StudyEvent>,
}

impl EventBook {
    pub fn new(events: Vec<StudyEvent>) -> Self {
        Self { events }
    }

    pub fn sample() -> Self {
        let event = |id: &str, title: &str, date: (i32, u32, u32), time: (u32, u32), kind, description: &str| {
            StudyEvent {
                id: id.to_string(),
                title: title.to_string(),
                date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap_or_default(),
                time: NaiveTime::from_hms_opt(time.0, time.1, 0),
                kind,
                description: description.to_string(),
            }
        };
        Self::new(vec![
            event("1", "Math Exam", (2024, 12, 15), (10, 0), EventKind::Exam, "Final exam for Algebra II"),
            event(
                "2",
                "Science Project Due",
                (2024, 12, 18),
                (23, 59),
                EventKind::Assignment,
                "Submit chemistry lab report",
            ),
            event(
                "3",
                "History Presentation",
                (2024, 12, 20),
                (14, 0),
                EventKind::Project,
                "World War II group presentation",
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn add(&mut self, draft: EventDraft, now: DateTime<Utc>) -> Result<&StudyEvent, ValidationError> {
        let title = draft.title.trim();
        let date_raw = draft.date.trim();
        if title.is_empty() || date_raw.is_empty() {
            return Err(ValidationError::MissingEventFields);
        }
        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date_raw.to_string()))?;
        let time_raw = draft.time.trim();
        let time = if time_raw.is_empty() {
            None
        } else {
            Some(
                NaiveTime::parse_from_str(time_raw, "%H:%M")
                    .map_err(|_| ValidationError::InvalidTime(time_raw.to_string()))?,
            )
        };

        let id = fresh_id(now, self.events.iter().map(|e| e.id.as_str()));
        self.events.push(StudyEvent {
            id,
            title: title.to_string(),
            date,
            time,
            kind: draft.kind,
            description: draft.description.trim().to_string(),
        });
        Ok(&self.events[self.events.len() - 1])
    }

    pub fn delete(&mut self, id: &str) -> Result<StudyEvent, ValidationError> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ValidationError::UnknownId {
                kind: "event",
                id: id.to_string(),
            })?;
        Ok(self.events.remove(idx))
    }

    /// Events on `date`, earliest time first (all-day entries lead).
    pub fn on_date(&self, date: NaiveDate) -> Vec<&StudyEvent> {
        let mut events: Vec<&StudyEvent> = self.events.iter().filter(|e| e.date == date).collect();
        events.sort_by_key(|e| e.time);
        events
    }

    pub fn days_with_events(&self, year: i32, month: u32) -> HashSet<u32> {
        self.events
            .iter()
            .filter(|e| e.date.year() == year && e.date.month() == month)
            .map(|e| e.date.day())
            .collect()
    }

    /// Events dated today or later, ascending, at most `limit`.
    pub fn upcoming(&self, today: NaiveDate, limit: usize) -> Vec<&StudyEvent> {
        let mut events: Vec<&StudyEvent> = self.events.iter().filter(|e| e.date >= today).collect();
        events.sort_by_key(|e| (e.date, e.time));
        events.truncate(limit);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(title: &str, date: &str, time: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            ..EventDraft::default()
        }
    }

    #[test]
    fn upcoming_is_sorted_filtered_and_capped() {
        let mut book = EventBook::sample();
        for (title, day) in [
            ("f", "2026-11-06"),
            ("b", "2026-10-20"),
            ("past", "2026-10-18"),
            ("d", "2026-11-01"),
            ("a", "2026-10-19"),
            ("e", "2026-11-05"),
            ("c", "2026-10-25"),
        ] {
            book.add(draft(title, day, ""), now()).unwrap();
        }

        let today = date(2026, 10, 19);
        let upcoming = book.upcoming(today, UPCOMING_LIMIT);
        let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c", "d", "e"]);
        assert!(upcoming.iter().all(|e| e.date >= today));
        assert!(upcoming.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn same_day_orders_by_time() {
        let mut book = EventBook::default();
        book.add(draft("late", "2026-10-21", "18:00"), now()).unwrap();
        book.add(draft("early", "2026-10-21", "08:30"), now()).unwrap();
        book.add(draft("allday", "2026-10-21", ""), now()).unwrap();

        let titles: Vec<&str> = book.on_date(date(2026, 10, 21)).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["allday", "early", "late"]);
    }

    #[test]
    fn rejects_missing_title_or_date() {
        let mut book = EventBook::default();
        assert_eq!(
            book.add(draft("", "2026-10-21", ""), now()).unwrap_err(),
            ValidationError::MissingEventFields
        );
        assert_eq!(
            book.add(draft("Exam", "", ""), now()).unwrap_err(),
            ValidationError::MissingEventFields
        );
        assert_eq!(
            book.add(draft("Exam", "21/10/2026", ""), now()).unwrap_err(),
            ValidationError::InvalidDate("21/10/2026".to_string())
        );
        assert_eq!(
            book.add(draft("Exam", "2026-10-21", "25:00"), now()).unwrap_err(),
            ValidationError::InvalidTime("25:00".to_string())
        );
        assert!(book.is_empty());
    }

    #[test]
    fn days_with_events_groups_by_month() {
        let book = EventBook::sample();
        let days = book.days_with_events(2024, 12);
        assert_eq!(days, HashSet::from([15, 18, 20]));
        assert!(book.days_with_events(2024, 11).is_empty());
    }

    #[test]
    fn delete_removes_event() {
        let mut book = EventBook::sample();
        book.delete("1").unwrap();
        assert_eq!(book.len(), 2);
        assert!(book.delete("1").is_err());
    }

    #[test]
    fn kind_is_stored_under_type() {
        let json = serde_json::to_value(EventBook::sample()).unwrap();
        assert_eq!(json[0]["type"], "exam");
        assert_eq!(json[0]["date"], "2024-12-15");
    }

    #[test]
    fn time_is_stored_as_hours_and_minutes() {
        let mut book = EventBook::sample();
        book.add(draft("Review", "2026-10-21", ""), now()).unwrap();
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json[0]["time"], "10:00");
        assert_eq!(json[3]["time"], "");

        let loaded: EventBook = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, book);
    }

    #[test]
    fn blank_or_missing_time_loads_as_all_day() {
        let raw = r#"[
            {"id":"1","title":"A","date":"2026-10-21","time":"","type":"class","description":""},
            {"id":"2","title":"B","date":"2026-10-21","time":null,"type":"exam"},
            {"id":"3","title":"C","date":"2026-10-21","type":"other"},
            {"id":"4","title":"D","date":"2026-10-21","time":"09:15","type":"project"}
        ]"#;
        let book: EventBook = serde_json::from_str(raw).unwrap();
        let times: Vec<Option<NaiveTime>> = book.on_date(date(2026, 10, 21)).iter().map(|e| e.time).collect();
        assert_eq!(times, vec![None, None, None, NaiveTime::from_hms_opt(9, 15, 0)]);

        let bad = r#"[{"id":"1","title":"A","date":"2026-10-21","time":"noon","type":"class"}]"#;
        assert!(serde_json::from_str::<EventBook>(bad).is_err());
    }
}
