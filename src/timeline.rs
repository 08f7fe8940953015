//! Sequential scheduling of project phases.
//!
//! Each phase starts exactly when the previous one ends; the first starts at
//! midnight on the project's start date.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{Result, TimelineError};
use crate::models::{Phase, Project};

/// One scheduled phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub phase_name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_weeks: u32,
}

/// Schedule `phases` back to back from `start_date`.
///
/// An empty phase list yields an empty schedule.
pub fn compute(start_date: NaiveDate, phases: &[Phase]) -> Vec<TimelineEntry> {
    let mut cursor = start_date.and_time(NaiveTime::MIN);
    phases
        .iter()
        .map(|phase| {
            let start = cursor;
            let end = start + Duration::weeks(i64::from(phase.duration_weeks));
            cursor = end;
            TimelineEntry {
                phase_name: phase.name.clone(),
                start,
                end,
                duration_weeks: phase.duration_weeks,
            }
        })
        .collect()
}

/// A computed timeline together with its aggregate figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub project_name: String,
    pub entries: Vec<TimelineEntry>,
    pub total_weeks: u32,
}

impl Timeline {
    /// Compute the timeline of `project`.
    ///
    /// Fails with [`TimelineError::EmptyTimeline`] when there is nothing to
    /// schedule, so callers can skip table, chart and export output.
    pub fn generate(project: &Project) -> Result<Self> {
        if project.phases.is_empty() {
            return Err(TimelineError::EmptyTimeline);
        }
        let entries = compute(project.start_date, project.phases.as_slice());
        tracing::debug!(
            project = %project.name,
            phases = entries.len(),
            "Generated timeline"
        );
        Ok(Self {
            project_name: project.name.clone(),
            entries,
            total_weeks: project.phases.total_weeks(),
        })
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.entries.first().map(|e| e.start)
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.entries.last().map(|e| e.end)
    }

    pub fn progress(&self, completed_weeks: Option<u32>) -> Progress {
        Progress::new(completed_weeks.unwrap_or(0), self.total_weeks)
    }
}

/// Completed share of a timeline.
///
/// Completion is not tracked by the project; it is whatever the caller
/// supplies, 0 by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed_weeks: u32,
    pub total_weeks: u32,
}

impl Progress {
    pub fn new(completed_weeks: u32, total_weeks: u32) -> Self {
        Self {
            completed_weeks: completed_weeks.min(total_weeks),
            total_weeks,
        }
    }

    /// Completed fraction in `[0, 1]`; 0 when there is no work at all.
    pub fn ratio(&self) -> f64 {
        if self.total_weeks == 0 {
            return 0.0;
        }
        f64::from(self.completed_weeks) / f64::from(self.total_weeks)
    }
}
