//! User customisation of the built-in exercise catalog.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::CatalogError;
use crate::model::WorkoutRecord;
use crate::muscle_groups::{ALL_MUSCLE_GROUPS, MuscleGroup, default_group_for, is_general};

/// Direction for [`ExerciseCustomizations::move_exercise`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Per-group overrides layered over the static defaults at read time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExerciseCustomizations {
    pub custom_exercises: BTreeMap<MuscleGroup, Vec<String>>,
    pub hidden_exercises: BTreeMap<MuscleGroup, BTreeSet<String>>,
    pub exercise_order: BTreeMap<MuscleGroup, Vec<String>>,
}

impl ExerciseCustomizations {
    pub fn custom_exercises(&self, group: MuscleGroup) -> &[String] {
        self.custom_exercises
            .get(&group)
            .map_or(&[][..], |names| names.as_slice())
    }

    fn is_hidden(&self, group: MuscleGroup, exercise: &str) -> bool {
        !is_general(exercise)
            && self
                .hidden_exercises
                .get(&group)
                .is_some_and(|hidden| hidden.contains(exercise))
    }

    /// Built-in exercises currently hidden from `group`.
    pub fn hidden_defaults(&self, group: MuscleGroup) -> Vec<&'static str> {
        group
            .default_exercises()
            .iter()
            .copied()
            .filter(|name| self.is_hidden(group, name))
            .collect()
    }

    /// Visible defaults followed by customs, before any explicit reorder.
    fn natural_order(&self, group: MuscleGroup) -> Vec<String> {
        let mut names: Vec<String> = group
            .default_exercises()
            .iter()
            .filter(|name| !self.is_hidden(group, name))
            .map(|name| name.to_string())
            .collect();
        for custom in self.custom_exercises(group) {
            if !names.contains(custom) {
                names.push(custom.clone());
            }
        }
        names
    }

    /// Exercises shown for `group`: explicitly ordered names first, the rest
    /// in natural order.
    pub fn visible_exercises(&self, group: MuscleGroup) -> Vec<String> {
        let natural = self.natural_order(group);
        let Some(order) = self.exercise_order.get(&group) else {
            return natural;
        };
        let mut visible: Vec<String> = Vec::with_capacity(natural.len());
        for name in order {
            if natural.contains(name) && !visible.contains(name) {
                visible.push(name.clone());
            }
        }
        for name in natural {
            if !visible.contains(&name) {
                visible.push(name);
            }
        }
        visible
    }

    /// Every exercise belonging to `group`, hidden defaults included, in
    /// catalog order followed by customs.
    pub fn all_exercises(&self, group: MuscleGroup) -> Vec<String> {
        let mut names: Vec<String> = group
            .default_exercises()
            .iter()
            .map(|name| name.to_string())
            .collect();
        for custom in self.custom_exercises(group) {
            if !names.contains(custom) {
                names.push(custom.clone());
            }
        }
        names
    }

    /// Resolve the group of an exercise: built-in membership first, then
    /// custom lists.
    pub fn group_for(&self, exercise: &str) -> Option<MuscleGroup> {
        default_group_for(exercise).or_else(|| {
            ALL_MUSCLE_GROUPS
                .into_iter()
                .find(|group| self.custom_exercises(*group).iter().any(|c| c == exercise))
        })
    }

    /// Add a custom exercise, returning the stored (trimmed) name.
    pub fn add_custom_exercise(
        &mut self,
        group: MuscleGroup,
        name: &str,
    ) -> Result<String, CatalogError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.visible_exercises(group).iter().any(|n| n == trimmed) {
            return Err(CatalogError::Duplicate {
                group,
                name: trimmed.to_string(),
            });
        }
        self.custom_exercises
            .entry(group)
            .or_default()
            .push(trimmed.to_string());
        log::info!("Added custom exercise {trimmed} to {group}");
        Ok(trimmed.to_string())
    }

    /// Remove an exercise from the visible list of `group`.
    ///
    /// Built-in exercises are hidden, custom ones deleted. Returns whether
    /// any record in `history` logged the exercise.
    pub fn remove_exercise(
        &mut self,
        group: MuscleGroup,
        name: &str,
        history: &[WorkoutRecord],
    ) -> Result<bool, CatalogError> {
        if is_general(name) {
            return Err(CatalogError::Protected(name.to_string()));
        }
        let is_custom = self.custom_exercises(group).iter().any(|c| c == name);
        let is_default = group.is_default(name);
        if !is_custom && !is_default {
            return Err(CatalogError::Unknown {
                group,
                name: name.to_string(),
            });
        }
        if is_custom {
            if let Some(customs) = self.custom_exercises.get_mut(&group) {
                customs.retain(|c| c != name);
                if customs.is_empty() {
                    self.custom_exercises.remove(&group);
                }
            }
        }
        if is_default {
            self.hidden_exercises
                .entry(group)
                .or_default()
                .insert(name.to_string());
        }
        let has_history = history.iter().any(|record| record.has_exercise(name));
        log::info!("Removed exercise {name} from {group} (history: {has_history})");
        Ok(has_history)
    }

    /// Un-hide a built-in exercise. Returns whether it was hidden.
    pub fn restore_default_exercise(&mut self, group: MuscleGroup, name: &str) -> bool {
        let Some(hidden) = self.hidden_exercises.get_mut(&group) else {
            return false;
        };
        let restored = hidden.remove(name);
        if hidden.is_empty() {
            self.hidden_exercises.remove(&group);
        }
        restored
    }

    /// Swap `name` with its neighbour in the visible order and persist the
    /// resulting order. Returns `false` at either end or for unknown names.
    pub fn move_exercise(&mut self, group: MuscleGroup, name: &str, direction: Direction) -> bool {
        let mut order = self.visible_exercises(group);
        let Some(pos) = order.iter().position(|n| n == name) else {
            return false;
        };
        let target = match direction {
            Direction::Up if pos > 0 => pos - 1,
            Direction::Down if pos + 1 < order.len() => pos + 1,
            _ => return false,
        };
        order.swap(pos, target);
        self.exercise_order.insert(group, order);
        true
    }
}
