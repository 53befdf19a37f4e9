use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body region used to bucket exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Legs,
    Core,
}

/// Every muscle group in catalog order.
pub const ALL_MUSCLE_GROUPS: [MuscleGroup; 7] = [
    MuscleGroup::Chest,
    MuscleGroup::Back,
    MuscleGroup::Shoulders,
    MuscleGroup::Biceps,
    MuscleGroup::Triceps,
    MuscleGroup::Legs,
    MuscleGroup::Core,
];

/// Suffix carried by the catch-all exercise of each group.
pub const GENERAL_SUFFIX: &str = "General";

impl MuscleGroup {
    /// Built-in exercises for this group, ending with its "General" entry.
    pub const fn default_exercises(self) -> &'static [&'static str] {
        match self {
            MuscleGroup::Chest => &["Incline Bench", "Coffin Press", "Dips", "Flys", "Chest General"],
            MuscleGroup::Back => &[
                "Pull-Ups",
                "Bent Over Row",
                "Overhead Pull-Down",
                "Shrugs",
                "Back General",
            ],
            MuscleGroup::Shoulders => &[
                "Overhead Press",
                "Machine Side Raises",
                "Dumbbell Side Raises",
                "Face Pulls",
                "Side Lifts",
                "Shoulders General",
            ],
            MuscleGroup::Biceps => &[
                "Curl-Ups",
                "Incline Curls",
                "Standing Curls",
                "Hammer Curls",
                "Biceps General",
            ],
            MuscleGroup::Triceps => &["Skull Crushers", "Overhead Lift", "Bench Dips", "Triceps General"],
            MuscleGroup::Legs => &["Squats", "Deadlifts", "Legs General"],
            MuscleGroup::Core => &["Leg Raises", "Sit-Ups", "Ab Wheel", "Russian Twists", "Core General"],
        }
    }

    /// First built-in exercise, the target of legacy per-muscle totals.
    pub fn first_exercise(self) -> &'static str {
        self.default_exercises()[0]
    }

    pub fn is_default(self, exercise: &str) -> bool {
        self.default_exercises().contains(&exercise)
    }

    /// Capitalised display name, e.g. `"Chest"`.
    pub fn label(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Core => "Core",
        }
    }

    /// Parse the lowercase storage key used by legacy records.
    pub fn from_key(key: &str) -> Option<Self> {
        ALL_MUSCLE_GROUPS
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

static DEFAULT_GROUPS: phf::Map<&'static str, MuscleGroup> = phf_map! {
    "Incline Bench" => MuscleGroup::Chest,
    "Coffin Press" => MuscleGroup::Chest,
    "Dips" => MuscleGroup::Chest,
    "Flys" => MuscleGroup::Chest,
    "Chest General" => MuscleGroup::Chest,
    "Pull-Ups" => MuscleGroup::Back,
    "Bent Over Row" => MuscleGroup::Back,
    "Overhead Pull-Down" => MuscleGroup::Back,
    "Shrugs" => MuscleGroup::Back,
    "Back General" => MuscleGroup::Back,
    "Overhead Press" => MuscleGroup::Shoulders,
    "Machine Side Raises" => MuscleGroup::Shoulders,
    "Dumbbell Side Raises" => MuscleGroup::Shoulders,
    "Face Pulls" => MuscleGroup::Shoulders,
    "Side Lifts" => MuscleGroup::Shoulders,
    "Shoulders General" => MuscleGroup::Shoulders,
    "Curl-Ups" => MuscleGroup::Biceps,
    "Incline Curls" => MuscleGroup::Biceps,
    "Standing Curls" => MuscleGroup::Biceps,
    "Hammer Curls" => MuscleGroup::Biceps,
    "Biceps General" => MuscleGroup::Biceps,
    "Skull Crushers" => MuscleGroup::Triceps,
    "Overhead Lift" => MuscleGroup::Triceps,
    "Bench Dips" => MuscleGroup::Triceps,
    "Triceps General" => MuscleGroup::Triceps,
    "Squats" => MuscleGroup::Legs,
    "Deadlifts" => MuscleGroup::Legs,
    "Legs General" => MuscleGroup::Legs,
    "Leg Raises" => MuscleGroup::Core,
    "Sit-Ups" => MuscleGroup::Core,
    "Ab Wheel" => MuscleGroup::Core,
    "Russian Twists" => MuscleGroup::Core,
    "Core General" => MuscleGroup::Core,
};

/// Muscle group owning a built-in exercise.
pub fn default_group_for(exercise: &str) -> Option<MuscleGroup> {
    DEFAULT_GROUPS.get(exercise).copied()
}

/// Whether `exercise` is a protected catch-all entry.
pub fn is_general(exercise: &str) -> bool {
    exercise.ends_with(GENERAL_SUFFIX)
}
