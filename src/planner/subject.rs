use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{fresh_id, ValidationError};

/// Number of trailing grades listed under a subject card.
pub const RECENT_GRADES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectColor {
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
    Indigo,
    Pink,
    Teal,
}

impl SubjectColor {
    pub const PALETTE: [SubjectColor; 8] = [
        SubjectColor::Blue,
        SubjectColor::Green,
        SubjectColor::Purple,
        SubjectColor::Red,
        SubjectColor::Yellow,
        SubjectColor::Indigo,
        SubjectColor::Pink,
        SubjectColor::Teal,
    ];

    /// Palette entry for the n-th subject, cycling.
    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

/// Qualitative band for an average grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl GradeBand {
    pub fn from_average(average: f64) -> Self {
        if average >= 90.0 {
            GradeBand::Excellent
        } else if average >= 80.0 {
            GradeBand::Good
        } else if average >= 70.0 {
            GradeBand::Average
        } else {
            GradeBand::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradeBand::Excellent => "Excellent",
            GradeBand::Good => "Good",
            GradeBand::Average => "Average",
            GradeBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub grades: Vec<f64>,
    pub color: SubjectColor,
}

impl Subject {
    /// Arithmetic mean of the grades, `None` when there are none.
    pub fn average(&self) -> Option<f64> {
        if self.grades.is_empty() {
            return None;
        }
        Some(self.grades.iter().sum::<f64>() / self.grades.len() as f64)
    }

    pub fn band(&self) -> Option<GradeBand> {
        self.average().map(GradeBand::from_average)
    }

    pub fn recent_grades(&self) -> &[f64] {
        let skip = self.grades.len().saturating_sub(RECENT_GRADES);
        &self.grades[skip..]
    }
}

/// Parse a grade typed by the user. Accepts any number in `0..=100`.
pub fn parse_grade(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let grade: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidGrade(trimmed.to_string()))?;
    if !grade.is_finite() || !(0.0..=100.0).contains(&grade) {
        return Err(ValidationError::InvalidGrade(trimmed.to_string()));
    }
    Ok(grade)
}

/// The subjects slot: an ordered list of subjects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectBook {
    subjects: Vec<Subject>,
}

impl SubjectBook {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    /// Seed data written when the slot is empty.
    pub fn sample() -> Self {
        let subject = |id: &str, name: &str, grades: &[f64], color| Subject {
            id: id.to_string(),
            name: name.to_string(),
            grades: grades.to_vec(),
            color,
        };
        Self::new(vec![
            subject("1", "Mathematics", &[85.0, 92.0, 78.0, 88.0], SubjectColor::Blue),
            subject("2", "Science", &[90.0, 87.0, 95.0], SubjectColor::Green),
            subject("3", "History", &[82.0, 79.0, 85.0, 91.0], SubjectColor::Purple),
        ])
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn add_subject(&mut self, name: &str, now: DateTime<Utc>) -> Result<&Subject, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let id = fresh_id(now, self.subjects.iter().map(|s| s.id.as_str()));
        let color = SubjectColor::for_index(self.subjects.len());
        self.subjects.push(Subject {
            id,
            name: name.to_string(),
            grades: Vec::new(),
            color,
        });
        Ok(&self.subjects[self.subjects.len() - 1])
    }

    /// Append a grade to the subject, returning the parsed value.
    pub fn add_grade(&mut self, id: &str, raw: &str) -> Result<f64, ValidationError> {
        let grade = parse_grade(raw)?;
        let subject = self
            .subjects
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| unknown(id))?;
        subject.grades.push(grade);
        Ok(grade)
    }

    pub fn remove_subject(&mut self, id: &str) -> Result<Subject, ValidationError> {
        let idx = self
            .subjects
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| unknown(id))?;
        Ok(self.subjects.remove(idx))
    }
}

fn unknown(id: &str) -> ValidationError {
    ValidationError::UnknownId {
        kind: "subject",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn average_is_none_until_first_grade() {
        let mut book = SubjectBook::default();
        let id = book.add_subject("Chemistry", now()).unwrap().id.clone();
        assert_eq!(book.get(&id).unwrap().average(), None);
        assert_eq!(book.get(&id).unwrap().band(), None);

        book.add_grade(&id, "72").unwrap();
        let subject = book.get(&id).unwrap();
        assert_eq!(subject.grades.len(), 1);
        assert_eq!(subject.average(), Some(72.0));
        assert_eq!(subject.band(), Some(GradeBand::Average));
    }

    #[test]
    fn adding_grade_extends_list_and_recomputes_mean() {
        let mut book = SubjectBook::sample();
        let before = book.get("1").unwrap().grades.len();
        book.add_grade("1", "100").unwrap();
        let subject = book.get("1").unwrap();
        assert_eq!(subject.grades.len(), before + 1);
        // (85 + 92 + 78 + 88 + 100) / 5
        assert!((subject.average().unwrap() - 88.6).abs() < 1e-9);
    }

    #[test]
    fn grades_outside_range_are_rejected() {
        let mut book = SubjectBook::sample();
        for raw in ["-1", "100.5", "abc", "", "NaN", "inf"] {
            assert!(
                matches!(book.add_grade("1", raw), Err(ValidationError::InvalidGrade(_))),
                "accepted {raw:?}"
            );
        }
        assert_eq!(book.get("1").unwrap().grades.len(), 4);
        assert_eq!(book.add_grade("1", " 0 "), Ok(0.0));
        assert_eq!(book.add_grade("1", "100"), Ok(100.0));
    }

    #[test]
    fn grade_for_unknown_subject_is_rejected() {
        let mut book = SubjectBook::sample();
        assert!(matches!(
            book.add_grade("missing", "90"),
            Err(ValidationError::UnknownId { kind: "subject", .. })
        ));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut book = SubjectBook::default();
        assert_eq!(book.add_subject("   ", now()).unwrap_err(), ValidationError::MissingName);
        assert!(book.is_empty());
    }

    #[test]
    fn colors_cycle_through_palette() {
        let mut book = SubjectBook::sample();
        let id = book.add_subject("Art", now()).unwrap().id.clone();
        assert_eq!(book.get(&id).unwrap().color, SubjectColor::Red);
        assert_eq!(SubjectColor::for_index(8), SubjectColor::Blue);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(GradeBand::from_average(90.0), GradeBand::Excellent);
        assert_eq!(GradeBand::from_average(89.99), GradeBand::Good);
        assert_eq!(GradeBand::from_average(80.0), GradeBand::Good);
        assert_eq!(GradeBand::from_average(70.0), GradeBand::Average);
        assert_eq!(GradeBand::from_average(69.9), GradeBand::NeedsImprovement);
    }

    #[test]
    fn recent_grades_keeps_last_five() {
        let mut book = SubjectBook::sample();
        for g in ["60", "61", "62"] {
            book.add_grade("3", g).unwrap();
        }
        assert_eq!(book.get("3").unwrap().recent_grades(), &[85.0, 91.0, 60.0, 61.0, 62.0]);
    }

    #[test]
    fn remove_subject_drops_it() {
        let mut book = SubjectBook::sample();
        let removed = book.remove_subject("2").unwrap();
        assert_eq!(removed.name, "Science");
        assert_eq!(book.len(), 2);
        assert!(book.get("2").is_none());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_string(&SubjectBook::sample()).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"color\":\"blue\""));
        let back: SubjectBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SubjectBook::sample());
    }
}
