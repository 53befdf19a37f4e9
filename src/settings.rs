use serde::{Deserialize, Serialize};

use crate::catalog::ExerciseCustomizations;

/// Weight steps offered for the pending-set weight buttons.
pub const WEIGHT_INCREMENTS: [f64; 3] = [1.0, 2.5, 5.0];

fn default_weight_increment() -> f64 {
    2.5
}

/// Persisted user preferences.
///
/// Every field falls back to its default when absent so partial or older
/// blobs still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub reps_tracking: bool,
    #[serde(default)]
    pub weight_tracking: bool,
    #[serde(default = "default_weight_increment")]
    pub weight_increment: f64,
    #[serde(flatten)]
    pub exercises: ExerciseCustomizations,
}

impl Settings {
    /// Whether an increment records reps or weight rather than a bare count.
    pub fn tracks_details(&self) -> bool {
        self.reps_tracking || self.weight_tracking
    }

    /// Change the weight step. Only [`WEIGHT_INCREMENTS`] are accepted.
    pub fn set_weight_increment(&mut self, step: f64) -> bool {
        if WEIGHT_INCREMENTS.contains(&step) {
            self.weight_increment = step;
            true
        } else {
            false
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reps_tracking: false,
            weight_tracking: false,
            weight_increment: default_weight_increment(),
            exercises: ExerciseCustomizations::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::muscle_groups::MuscleGroup;

    #[test]
    fn settings_roundtrip() {
        let mut s = Settings::default();
        s.reps_tracking = true;
        s.weight_increment = 5.0;
        s.exercises
            .add_custom_exercise(MuscleGroup::Core, "Plank")
            .unwrap();
        s.exercises
            .remove_exercise(MuscleGroup::Chest, "Flys", &[])
            .unwrap();

        let json = serde_json::to_string(&s).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, loaded);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"weightTracking": true}"#).unwrap();
        assert!(loaded.weight_tracking);
        assert!(!loaded.reps_tracking);
        assert_eq!(loaded.weight_increment, 2.5);
        assert!(loaded.exercises.custom_exercises.is_empty());

        let empty: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Settings::default());
    }

    #[test]
    fn uses_camel_case_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        for key in [
            "repsTracking",
            "weightTracking",
            "weightIncrement",
            "customExercises",
            "hiddenExercises",
            "exerciseOrder",
        ] {
            assert!(value.get(key).is_some(), "{key}");
        }
    }

    #[test]
    fn only_offered_increments_are_accepted() {
        let mut s = Settings::default();
        assert!(s.set_weight_increment(1.0));
        assert_eq!(s.weight_increment, 1.0);
        assert!(!s.set_weight_increment(3.0));
        assert_eq!(s.weight_increment, 1.0);
    }
}
