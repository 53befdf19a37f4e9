//! Application controller tying the store, settings and session together.
//!
//! Every mutation is followed by a save. Save failures are logged and the
//! in-memory state stays authoritative.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::Write;

use crate::analysis::{self, HistoryEntry};
use crate::catalog::Direction;
use crate::confirm::{DestructiveAction, PendingConfirmation, Step};
use crate::error::{CatalogError, StorageError, TrackerError};
use crate::export;
use crate::model::WorkoutRecord;
use crate::muscle_groups::{MuscleGroup, is_general};
use crate::session::{Increment, PendingSet, Session};
use crate::settings::Settings;
use crate::store::{self, AppData, KeyValueStore};

/// Answer to [`Tracker::request`].
#[derive(Debug, PartialEq)]
pub enum Request {
    /// The caller must ask the user, then confirm or cancel.
    Pending(PendingConfirmation),
    /// Nothing would be lost, the action already ran.
    Done,
}

/// Answer to [`Tracker::confirm`].
#[derive(Debug, PartialEq)]
pub enum Confirmed {
    Done,
    /// Another confirmation is required before the action runs.
    NextStage(PendingConfirmation),
}

pub struct Tracker<S: KeyValueStore> {
    store: S,
    data: AppData,
    session: Session,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load saved data and any unfinished workout from `store`.
    pub fn open(store: S) -> Self {
        let data = store::load(&store);
        let session = store::load_session(&store).unwrap_or_default();
        if !session.is_empty() {
            log::info!("Restored unfinished workout with {} exercises", session.exercises.len());
        }
        Self {
            store,
            data,
            session,
        }
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn workouts(&self) -> &[WorkoutRecord] {
        &self.data.workouts
    }

    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Write the root object, returning any storage error.
    pub fn save(&mut self) -> Result<(), StorageError> {
        store::save(&mut self.store, &self.data)
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            log::error!("Error saving data: {e}");
        }
    }

    fn persist_session(&mut self) {
        if let Err(e) = store::save_session(&mut self.store, &self.session) {
            log::error!("Error saving current workout: {e}");
        }
    }

    // Settings

    pub fn set_reps_tracking(&mut self, enabled: bool) {
        self.data.settings.reps_tracking = enabled;
        self.persist();
    }

    pub fn set_weight_tracking(&mut self, enabled: bool) {
        self.data.settings.weight_tracking = enabled;
        self.persist();
    }

    pub fn set_weight_increment(&mut self, step: f64) -> Result<(), TrackerError> {
        if !self.data.settings.set_weight_increment(step) {
            return Err(TrackerError::InvalidIncrement(step));
        }
        self.persist();
        Ok(())
    }

    // Catalog

    pub fn visible_exercises(&self, group: MuscleGroup) -> Vec<String> {
        self.data.settings.exercises.visible_exercises(group)
    }

    pub fn add_custom_exercise(
        &mut self,
        group: MuscleGroup,
        name: &str,
    ) -> Result<String, TrackerError> {
        let stored = self.data.settings.exercises.add_custom_exercise(group, name)?;
        self.persist();
        Ok(stored)
    }

    pub fn restore_default_exercise(&mut self, group: MuscleGroup, name: &str) -> bool {
        let restored = self
            .data
            .settings
            .exercises
            .restore_default_exercise(group, name);
        if restored {
            self.persist();
        }
        restored
    }

    pub fn move_exercise(&mut self, group: MuscleGroup, name: &str, direction: Direction) -> bool {
        let moved = self
            .data
            .settings
            .exercises
            .move_exercise(group, name, direction);
        if moved {
            self.persist();
        }
        moved
    }

    pub fn exercise_has_history(&self, name: &str) -> bool {
        self.data.workouts.iter().any(|r| r.has_exercise(name))
    }

    // Session

    pub fn start_workout(&mut self, now: DateTime<Utc>) {
        self.session.start(now);
    }

    pub fn increment_set(&mut self, exercise: &str, now: DateTime<Utc>) -> Increment {
        let increment =
            self.session
                .increment_set(exercise, &self.data.settings, &self.data.workouts, now);
        if matches!(increment, Increment::Counted(_)) {
            self.persist_session();
        }
        increment
    }

    pub fn save_set(&mut self, pending: PendingSet) -> u32 {
        let count = self
            .session
            .save_set(pending, &self.data.settings, &self.data.workouts);
        self.persist_session();
        count
    }

    pub fn decrement_set(&mut self, exercise: &str) -> u32 {
        let remaining = self.session.decrement_set(exercise);
        self.persist_session();
        remaining
    }

    pub fn last_known_reps_and_weight(&self, exercise: &str) -> (u32, f64) {
        self.session
            .last_known_reps_and_weight(exercise, &self.data.workouts)
    }

    pub fn has_active_sets(&self) -> bool {
        self.session.has_active_sets()
    }

    /// Sets logged for `group` in the current session.
    pub fn session_total(&self, group: MuscleGroup) -> u32 {
        analysis::muscle_group_total(group, &self.session.exercises, &self.data.settings.exercises)
    }

    /// Store the session as a new record and return its index.
    pub fn finish_workout(&mut self, now: DateTime<Utc>) -> Result<usize, TrackerError> {
        let record = self.session.finish(now)?;
        log::info!(
            "Finished workout on {} with {} exercises",
            record.date,
            record.exercises.len()
        );
        self.data.workouts.push(record);
        self.persist();
        self.persist_session();
        Ok(self.data.workouts.len() - 1)
    }

    // Aggregation

    pub fn recent_workouts(&self, now: DateTime<Utc>) -> Vec<HistoryEntry<'_>> {
        analysis::recent_workouts(&self.data.workouts, now)
    }

    pub fn weekly_totals(&self, now: DateTime<Utc>) -> BTreeMap<MuscleGroup, u32> {
        analysis::weekly_totals(&self.data.workouts, now, &self.data.settings.exercises)
    }

    pub fn workout_summary(&self, record: &WorkoutRecord) -> String {
        analysis::workout_summary(record, &self.data.settings.exercises)
    }

    pub fn export_csv(&self, writer: impl Write) -> csv::Result<()> {
        export::write_workouts_csv(writer, &self.data.workouts)
    }

    // Destructive actions

    /// Begin a destructive action.
    ///
    /// Abandoning a workout with no logged sets runs immediately; everything
    /// else returns a confirmation the caller must hold.
    pub fn request(&mut self, action: DestructiveAction) -> Result<Request, TrackerError> {
        let pending = match action {
            DestructiveAction::AbandonWorkout => {
                if !self.session.has_active_sets() {
                    self.session.clear();
                    self.persist_session();
                    return Ok(Request::Done);
                }
                PendingConfirmation::new(DestructiveAction::AbandonWorkout)
            }
            DestructiveAction::DeleteWorkout { index } => {
                let record = self
                    .data
                    .workouts
                    .get(index)
                    .ok_or(TrackerError::WorkoutOutOfRange(index))?;
                let target = record.clone();
                PendingConfirmation::new(DestructiveAction::DeleteWorkout { index }).with_target(target)
            }
            DestructiveAction::RemoveExercise { group, name } => {
                if is_general(&name) {
                    return Err(CatalogError::Protected(name).into());
                }
                let known = group.is_default(&name)
                    || self
                        .data
                        .settings
                        .exercises
                        .custom_exercises(group)
                        .contains(&name);
                if !known {
                    return Err(CatalogError::Unknown { group, name }.into());
                }
                let has_history = self.exercise_has_history(&name);
                PendingConfirmation::new(DestructiveAction::RemoveExercise { group, name })
                    .with_history(has_history)
            }
            DestructiveAction::FactoryReset => {
                PendingConfirmation::new(DestructiveAction::FactoryReset)
            }
        };
        Ok(Request::Pending(pending))
    }

    pub fn confirm(&mut self, pending: PendingConfirmation) -> Result<Confirmed, TrackerError> {
        let (action, target) = match pending.step() {
            Step::Again(next) => return Ok(Confirmed::NextStage(next)),
            Step::Run { action, target } => (action, target),
        };
        match action {
            DestructiveAction::AbandonWorkout => {
                self.session.clear();
                self.persist_session();
                log::info!("Abandoned current workout");
            }
            DestructiveAction::DeleteWorkout { index } => {
                let record = self
                    .data
                    .workouts
                    .get(index)
                    .ok_or(TrackerError::WorkoutOutOfRange(index))?;
                if target.as_ref() != Some(record) {
                    return Err(TrackerError::StaleWorkout(index));
                }
                let removed = self.data.workouts.remove(index);
                self.persist();
                log::info!("Deleted workout from {}", removed.date);
            }
            DestructiveAction::RemoveExercise { group, name } => {
                let AppData { workouts, settings } = &mut self.data;
                settings.exercises.remove_exercise(group, &name, workouts)?;
                self.persist();
            }
            DestructiveAction::FactoryReset => {
                self.data = AppData::default();
                self.session.clear();
                self.persist();
                self.persist_session();
                log::info!("Factory reset complete");
            }
        }
        Ok(Confirmed::Done)
    }

    pub fn cancel(&self, pending: PendingConfirmation) {
        log::debug!("Cancelled {:?}", pending.action());
    }
}
