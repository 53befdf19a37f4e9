//! The workout currently being logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{ExerciseMap, SetDetail, SetEntry, WorkoutRecord, timestamp};
use crate::settings::Settings;

pub const DEFAULT_REPS: u32 = 8;
pub const DEFAULT_WEIGHT: f64 = 0.0;
pub const MIN_REPS: u32 = 1;
pub const MAX_REPS: u32 = 50;
/// Number of most recent records searched for a previous set.
pub const HISTORY_LOOKBACK: usize = 5;

/// A set awaiting confirmation of its reps and weight.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSet {
    pub exercise: String,
    pub reps: u32,
    pub weight: f64,
}

impl PendingSet {
    pub fn increase_reps(&mut self) {
        self.reps = (self.reps + 1).min(MAX_REPS);
    }

    pub fn decrease_reps(&mut self) {
        self.reps = self.reps.saturating_sub(1).max(MIN_REPS);
    }

    pub fn increase_weight(&mut self, step: f64) {
        self.weight += step;
    }

    pub fn decrease_weight(&mut self, step: f64) {
        self.weight = (self.weight - step).max(0.0);
    }
}

/// Result of tapping the increment button.
#[derive(Debug, Clone, PartialEq)]
pub enum Increment {
    /// Count recorded directly; holds the new set count.
    Counted(u32),
    /// Details must be confirmed through [`Session::save_set`].
    Pending(PendingSet),
}

/// In-progress workout, stored flat as `{ startTime, <exercise>: entry }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(
        rename = "startTime",
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub exercises: ExerciseMap,
}

impl Session {
    /// Stamp the start time if this is the first interaction.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn has_active_sets(&self) -> bool {
        self.exercises.values().any(|entry| !entry.is_empty())
    }

    pub fn set_count(&self, exercise: &str) -> u32 {
        self.exercises.get(exercise).map_or(0, SetEntry::set_count)
    }

    pub fn increment_set(
        &mut self,
        exercise: &str,
        settings: &Settings,
        history: &[WorkoutRecord],
        now: DateTime<Utc>,
    ) -> Increment {
        self.start(now);
        if settings.tracks_details() {
            let (reps, weight) = self.last_known_reps_and_weight(exercise, history);
            return Increment::Pending(PendingSet {
                exercise: exercise.to_string(),
                reps,
                weight,
            });
        }
        let entry = self
            .exercises
            .entry(exercise.to_string())
            .or_insert(SetEntry::Count(0));
        match entry {
            SetEntry::Count(n) => *n += 1,
            // tracking was switched off mid-session
            SetEntry::Sets(sets) => {
                let set_index = sets.len() as u32 + 1;
                sets.push(SetDetail {
                    set_index,
                    reps: None,
                    weight: None,
                });
            }
        }
        Increment::Counted(entry.set_count())
    }

    /// Commit a pending set and return the new set count.
    ///
    /// A bare count already logged for the exercise is first expanded into
    /// detailed sets filled with the last known reps and weight.
    pub fn save_set(
        &mut self,
        pending: PendingSet,
        settings: &Settings,
        history: &[WorkoutRecord],
    ) -> u32 {
        let (filler_reps, filler_weight) = self.last_known_reps_and_weight(&pending.exercise, history);
        let reps = |value: u32| settings.reps_tracking.then_some(value);
        let weight = |value: f64| settings.weight_tracking.then_some(value);

        let entry = self
            .exercises
            .entry(pending.exercise)
            .or_insert_with(|| SetEntry::Sets(Vec::new()));
        if let SetEntry::Count(count) = *entry {
            *entry = SetEntry::Sets(
                (1..=count)
                    .map(|set_index| SetDetail {
                        set_index,
                        reps: reps(filler_reps),
                        weight: weight(filler_weight),
                    })
                    .collect(),
            );
        }
        if let SetEntry::Sets(sets) = entry {
            let set_index = sets.len() as u32 + 1;
            sets.push(SetDetail {
                set_index,
                reps: reps(pending.reps),
                weight: weight(pending.weight),
            });
        }
        entry.set_count()
    }

    /// Drop the most recent set; the key disappears once nothing is left.
    pub fn decrement_set(&mut self, exercise: &str) -> u32 {
        let Some(entry) = self.exercises.get_mut(exercise) else {
            return 0;
        };
        match entry {
            SetEntry::Count(n) => *n = n.saturating_sub(1),
            SetEntry::Sets(sets) => {
                sets.pop();
            }
        }
        let remaining = entry.set_count();
        if remaining == 0 {
            self.exercises.remove(exercise);
        }
        remaining
    }

    /// Suggested reps and weight for the next set of `exercise`.
    pub fn last_known_reps_and_weight(
        &self,
        exercise: &str,
        history: &[WorkoutRecord],
    ) -> (u32, f64) {
        let from_session = self.exercises.get(exercise).and_then(SetEntry::last_detail);
        let detail = from_session.or_else(|| {
            history
                .iter()
                .rev()
                .take(HISTORY_LOOKBACK)
                .find_map(|record| record.exercises.get(exercise).and_then(SetEntry::last_detail))
        });
        detail.map_or((DEFAULT_REPS, DEFAULT_WEIGHT), |d| {
            (
                d.reps.unwrap_or(DEFAULT_REPS),
                d.weight.unwrap_or(DEFAULT_WEIGHT),
            )
        })
    }

    /// Turn the session into a record dated on `now`'s day and reset it.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<WorkoutRecord, SessionError> {
        if self.exercises.is_empty() {
            return Err(SessionError::NothingLogged);
        }
        let record = WorkoutRecord {
            date: now.date_naive(),
            start_time: self.start_time,
            exercises: self.exercises.clone(),
        };
        self.clear();
        Ok(record)
    }

    pub fn clear(&mut self) {
        self.start_time = None;
        self.exercises.clear();
    }
}
