use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::phase::PhaseStore;
use crate::error::Result;

/// Phases every fresh session starts with.
pub const TEMPLATE_PHASES: &[(&str, u32)] = &[
    ("Requirements & Planning", 2),
    ("Design", 3),
    ("Development Sprint 1", 2),
    ("Testing & QA", 3),
    ("Deployment & Launch", 1),
];

pub const DEMO_PROJECT_NAME: &str = "Demo Project";

/// A project: the unit of save and load.
///
/// Serializes to the saved document format:
///
/// ```json
/// {
///   "project_name": "Website",
///   "start_date": "2024-01-01",
///   "phases": [{ "Phase": "Design", "Duration (weeks)": 2 }],
///   "notes": ""
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "project_name")]
    pub name: String,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    pub phases: PhaseStore,
    #[serde(default)]
    pub notes: String,
}

impl Project {
    /// An empty project starting on `start_date`.
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            phases: PhaseStore::new(),
            notes: String::new(),
        }
    }

    /// The project a session opens with.
    pub fn demo(start_date: NaiveDate) -> Self {
        let mut project = Self::blank(start_date);
        project.name = DEMO_PROJECT_NAME.to_string();
        project
    }

    /// What "new project" resets to: no name, no notes, template phases.
    pub fn blank(start_date: NaiveDate) -> Self {
        let phases = TEMPLATE_PHASES
            .iter()
            .map(|(name, weeks)| super::Phase::new(name, *weeks))
            .collect::<Result<PhaseStore>>()
            .unwrap_or_default();
        Self {
            phases,
            ..Self::new("", start_date)
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }
}

/// Dates in documents are exactly `YYYY-MM-DD`.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(s: &str) -> Option<NaiveDate> {
        // chrono accepts unpadded fields; the document format does not
        if s.len() != 10 {
            return None;
        }
        NaiveDate::parse_from_str(s, FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| {
            de::Error::custom(format!("invalid start_date '{}', expected YYYY-MM-DD", s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_demo_project_has_template_phases() {
        let project = Project::demo(date(2024, 1, 1));
        assert_eq!(project.name, "Demo Project");
        assert_eq!(project.phases.len(), TEMPLATE_PHASES.len());
        assert_eq!(project.phases.get(0).unwrap().name, "Requirements & Planning");
        assert_eq!(project.phases.total_weeks(), 11);
    }

    #[test]
    fn test_blank_project_clears_name_and_notes() {
        let project = Project::blank(date(2024, 3, 4));
        assert!(project.name.is_empty());
        assert!(project.notes.is_empty());
        assert_eq!(project.start_date, date(2024, 3, 4));
    }

    #[test]
    fn test_serializes_to_document_format() {
        let mut project = Project::new("Website", date(2024, 1, 1));
        project.phases.append("Design", 2).unwrap();
        project.set_notes("kickoff monday");

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "project_name": "Website",
                "start_date": "2024-01-01",
                "phases": [{ "Phase": "Design", "Duration (weeks)": 2 }],
                "notes": "kickoff monday"
            })
        );
    }

    #[test]
    fn test_iso_date_is_strict() {
        assert_eq!(iso_date::parse("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(iso_date::parse("2024-1-5"), None);
        assert_eq!(iso_date::parse("05/01/2024"), None);
        assert_eq!(iso_date::parse("2024-02-30"), None);
    }
}
