//! Two-step commands for actions that discard data.
//!
//! A [`PendingConfirmation`] can only be created by the tracker and is
//! consumed by either confirming or cancelling it.

use crate::model::WorkoutRecord;
use crate::muscle_groups::MuscleGroup;

#[derive(Debug, Clone, PartialEq)]
pub enum DestructiveAction {
    AbandonWorkout,
    DeleteWorkout { index: usize },
    RemoveExercise { group: MuscleGroup, name: String },
    FactoryReset,
}

impl DestructiveAction {
    /// Number of confirmations required before the action runs.
    pub fn stages(&self) -> u8 {
        match self {
            DestructiveAction::FactoryReset => 2,
            _ => 1,
        }
    }
}

/// An action waiting for the user's answer.
#[derive(Debug, PartialEq)]
#[must_use = "a pending confirmation does nothing until confirmed or cancelled"]
pub struct PendingConfirmation {
    action: DestructiveAction,
    confirmed: u8,
    /// Copy of the record a delete was requested for.
    target: Option<WorkoutRecord>,
    has_history: bool,
}

/// What confirming one stage leads to.
pub(crate) enum Step {
    Again(PendingConfirmation),
    Run {
        action: DestructiveAction,
        target: Option<WorkoutRecord>,
    },
}

impl PendingConfirmation {
    pub(crate) fn new(action: DestructiveAction) -> Self {
        Self {
            action,
            confirmed: 0,
            target: None,
            has_history: false,
        }
    }

    pub(crate) fn with_target(mut self, record: WorkoutRecord) -> Self {
        self.target = Some(record);
        self
    }

    pub(crate) fn with_history(mut self, has_history: bool) -> Self {
        self.has_history = has_history;
        self
    }

    pub fn action(&self) -> &DestructiveAction {
        &self.action
    }

    /// 1-based confirmation stage currently being asked.
    pub fn stage(&self) -> u8 {
        self.confirmed + 1
    }

    /// Whether confirming now runs the action.
    pub fn is_final(&self) -> bool {
        self.stage() >= self.action.stages()
    }

    /// For exercise removal: whether past workouts logged the exercise.
    pub fn has_history(&self) -> bool {
        self.has_history
    }

    pub(crate) fn step(mut self) -> Step {
        if self.is_final() {
            Step::Run {
                action: self.action,
                target: self.target,
            }
        } else {
            self.confirmed += 1;
            Step::Again(self)
        }
    }
}
