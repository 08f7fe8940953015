use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Shortest phase a project may schedule, in weeks.
pub const MIN_DURATION_WEEKS: u32 = 1;
/// Longest phase a project may schedule, in weeks.
pub const MAX_DURATION_WEEKS: u32 = 52;

/// A named, fixed-duration segment of a project.
///
/// A phase has no identity beyond its position in the owning [`PhaseStore`].
/// The serialized field names match the saved document format
/// (`"Phase"`, `"Duration (weeks)"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPhase")]
pub struct Phase {
    #[serde(rename = "Phase")]
    pub name: String,
    #[serde(rename = "Duration (weeks)")]
    pub duration_weeks: u32,
}

impl Phase {
    /// Build a validated phase. The name is stored trimmed.
    pub fn new(name: &str, duration_weeks: u32) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TimelineError::Validation(
                "Phase name cannot be empty".to_string(),
            ));
        }
        if !(MIN_DURATION_WEEKS..=MAX_DURATION_WEEKS).contains(&duration_weeks) {
            return Err(TimelineError::Validation(format!(
                "Duration must be between {} and {} weeks, got {}",
                MIN_DURATION_WEEKS, MAX_DURATION_WEEKS, duration_weeks
            )));
        }
        Ok(Self {
            name: name.to_string(),
            duration_weeks,
        })
    }
}

/// Unvalidated phase as it appears in a document.
#[derive(Deserialize)]
struct RawPhase {
    #[serde(rename = "Phase")]
    name: String,
    #[serde(rename = "Duration (weeks)")]
    duration_weeks: u32,
}

impl TryFrom<RawPhase> for Phase {
    type Error = TimelineError;

    fn try_from(raw: RawPhase) -> Result<Self> {
        Phase::new(&raw.name, raw.duration_weeks)
    }
}

/// Ordered phases of a project. Insertion order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseStore {
    phases: Vec<Phase>,
}

impl PhaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a phase; it executes after every existing phase.
    ///
    /// On a validation failure the store is left unchanged.
    pub fn append(&mut self, name: &str, duration_weeks: u32) -> Result<()> {
        let phase = Phase::new(name, duration_weeks)?;
        self.phases.push(phase);
        Ok(())
    }

    /// Replace the phase at `position`. Returns `false` when the new values
    /// equal the old ones and nothing changed.
    pub fn update(&mut self, position: usize, name: &str, duration_weeks: u32) -> Result<bool> {
        let len = self.phases.len();
        let phase = Phase::new(name, duration_weeks)?;
        let slot = self
            .phases
            .get_mut(position)
            .ok_or(TimelineError::Index { position, len })?;

        if *slot == phase {
            return Ok(false);
        }
        *slot = phase;
        Ok(true)
    }

    /// Remove and return the phase at `position`.
    pub fn remove(&mut self, position: usize) -> Result<Phase> {
        if position >= self.phases.len() {
            return Err(TimelineError::Index {
                position,
                len: self.phases.len(),
            });
        }
        Ok(self.phases.remove(position))
    }

    pub fn get(&self, position: usize) -> Option<&Phase> {
        self.phases.get(position)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Phase> {
        self.phases.iter()
    }

    pub fn as_slice(&self) -> &[Phase] {
        &self.phases
    }

    /// Sum of all phase durations.
    pub fn total_weeks(&self) -> u32 {
        self.phases.iter().map(|p| p.duration_weeks).sum()
    }
}

impl FromIterator<Phase> for PhaseStore {
    fn from_iter<I: IntoIterator<Item = Phase>>(iter: I) -> Self {
        Self {
            phases: iter.into_iter().collect(),
        }
    }
}
