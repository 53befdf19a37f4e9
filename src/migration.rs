//! Upgrade of stored records to the current `exercises` shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::{ExerciseMap, SetDetail, SetEntry, WorkoutRecord, timestamp};
use crate::muscle_groups::MuscleGroup;

/// Key of the session start marker, which older records copied into
/// their exercise map.
pub const START_TIME_KEY: &str = "startTime";

/// A record as found in storage, in any historical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    /// Entries are kept raw so one malformed value cannot fail the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<BTreeMap<String, Value>>,
    /// Oldest format: one total per muscle group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_groups: Option<BTreeMap<String, Value>>,
}

impl From<WorkoutRecord> for StoredRecord {
    fn from(record: WorkoutRecord) -> Self {
        Self {
            date: record.date,
            start_time: record.start_time,
            exercises: Some(
                record
                    .exercises
                    .iter()
                    .map(|(name, entry)| {
                        (name.clone(), serde_json::to_value(entry).unwrap_or_default())
                    })
                    .collect(),
            ),
            muscle_groups: None,
        }
    }
}

/// Whole non-negative number, accepting integral floats such as `3.0`.
fn whole_number(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        })
        .and_then(|n| u32::try_from(n).ok())
}

/// Interpret one stored exercise value. Anything unrecognised counts as no
/// sets and yields `None`.
fn entry_from_value(value: Value) -> Option<SetEntry> {
    match value {
        Value::Array(_) => serde_json::from_value::<Vec<SetDetail>>(value)
            .ok()
            .map(SetEntry::Sets),
        other => whole_number(&other).map(SetEntry::Count),
    }
}

/// Convert one stored record, reporting whether anything changed.
pub fn migrate_record(stored: StoredRecord) -> (WorkoutRecord, bool) {
    let StoredRecord {
        date,
        start_time,
        exercises,
        muscle_groups,
    } = stored;
    let mut changed = muscle_groups.is_some();

    let exercises = match (exercises, muscle_groups) {
        (Some(raw), _) => {
            let mut exercises = ExerciseMap::new();
            for (name, value) in raw {
                if name == START_TIME_KEY {
                    changed = true;
                    continue;
                }
                match entry_from_value(value) {
                    Some(SetEntry::Count(0)) => changed = true,
                    Some(entry) => {
                        exercises.insert(name, entry);
                    }
                    None => {
                        log::warn!("Dropping unreadable sets for {name} on {date}");
                        changed = true;
                    }
                }
            }
            exercises
        }
        (None, Some(totals)) => {
            let mut exercises = ExerciseMap::new();
            for (muscle, value) in totals {
                let total = whole_number(&value).unwrap_or(0);
                if total == 0 {
                    continue;
                }
                match MuscleGroup::from_key(&muscle) {
                    // all sets land on the group's first exercise
                    Some(group) => {
                        exercises.insert(group.first_exercise().to_string(), SetEntry::Count(total));
                    }
                    None => log::warn!("Dropping {total} sets for unknown muscle group {muscle} on {date}"),
                }
            }
            exercises
        }
        (None, None) => {
            changed = true;
            ExerciseMap::new()
        }
    };

    (
        WorkoutRecord {
            date,
            start_time,
            exercises,
        },
        changed,
    )
}

/// Migrate every stored record to [`WorkoutRecord`]. Idempotent.
pub fn migrate(records: Vec<StoredRecord>) -> Vec<WorkoutRecord> {
    let mut migrated = 0;
    let out: Vec<WorkoutRecord> = records
        .into_iter()
        .map(|stored| {
            let (record, changed) = migrate_record(stored);
            if changed {
                migrated += 1;
            }
            record
        })
        .collect();
    if migrated > 0 {
        log::info!("Migrated {migrated} of {} workout records", out.len());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SetDetail;
    use serde_json::json;

    fn stored(value: serde_json::Value) -> StoredRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn muscle_totals_move_to_first_exercise() {
        let (record, changed) =
            migrate_record(stored(json!({"date": "2024-01-01", "muscleGroups": {"chest": 4}})));
        assert!(changed);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"date": "2024-01-01", "exercises": {"Incline Bench": 4}})
        );
    }

    #[test]
    fn zero_and_unknown_muscles_are_dropped() {
        let (record, _) = migrate_record(stored(json!({
            "date": "2024-01-02",
            "muscleGroups": {"legs": 0, "back": 2, "calves": 3}
        })));
        assert_eq!(record.exercises.len(), 1);
        assert_eq!(record.exercises["Pull-Ups"], SetEntry::Count(2));
    }

    #[test]
    fn legacy_counts_keep_positive_values() {
        let (record, changed) = migrate_record(stored(json!({
            "date": "2024-01-03",
            "exercises": {"Squats": 3, "Deadlifts": 0}
        })));
        assert!(changed);
        assert_eq!(record.exercises.len(), 1);
        assert_eq!(record.exercises["Squats"], SetEntry::Count(3));
    }

    #[test]
    fn current_shape_passes_through() {
        let input = stored(json!({
            "date": "2024-01-04",
            "startTime": "2024-01-04T07:15:00Z",
            "exercises": {"Dips": [{"setIndex": 1, "reps": 10, "weight": 20.0}], "Flys": 2}
        }));
        let (record, changed) = migrate_record(input.clone());
        assert!(!changed);
        assert_eq!(StoredRecord::from(record.clone()), input);
        assert_eq!(
            record.exercises["Dips"],
            SetEntry::Sets(vec![SetDetail {
                set_index: 1,
                reps: Some(10),
                weight: Some(20.0)
            }])
        );
    }

    #[test]
    fn migrate_is_idempotent() {
        let records = vec![
            stored(json!({"date": "2024-01-01", "muscleGroups": {"chest": 4, "core": 1}})),
            stored(json!({"date": "2024-01-02", "exercises": {"Squats": 3, "Dips": 0}})),
            stored(json!({"date": "2024-01-03"})),
            stored(json!({"date": "2024-01-04", "exercises": {"Dips": [{"setIndex": 1}]}})),
        ];
        let once = migrate(records);
        let twice = migrate(once.iter().cloned().map(StoredRecord::from).collect());
        assert_eq!(once, twice);
    }

    #[test]
    fn start_marker_in_exercises_is_dropped() {
        let (record, changed) = migrate_record(stored(json!({
            "date": "2024-01-02",
            "exercises": {"startTime": 1714560000000_u64, "Dips": 2}
        })));
        assert!(changed);
        assert_eq!(record.exercises.len(), 1);
        assert_eq!(record.exercises["Dips"], SetEntry::Count(2));
    }

    #[test]
    fn unreadable_entries_count_as_nothing() {
        let (record, changed) = migrate_record(stored(json!({
            "date": "2024-01-06",
            "exercises": {
                "Squats": null,
                "Dips": 2.0,
                "Flys": 1.5,
                "Shrugs": "three",
                "Curl-Ups": [{"reps": 5}],
                "Leg Raises": -1,
                "Sit-Ups": 4
            },
            "muscleGroups": null
        })));
        assert!(changed);
        assert_eq!(
            record.exercises.into_iter().collect::<Vec<_>>(),
            vec![
                ("Dips".to_string(), SetEntry::Count(2)),
                ("Sit-Ups".to_string(), SetEntry::Count(4)),
            ]
        );
    }

    #[test]
    fn malformed_muscle_totals_are_skipped() {
        let (record, _) = migrate_record(stored(json!({
            "date": "2024-01-07",
            "muscleGroups": {"chest": null, "legs": 2.0, "back": "x"}
        })));
        assert_eq!(record.exercises.len(), 1);
        assert_eq!(record.exercises["Squats"], SetEntry::Count(2));
    }

    #[test]
    fn exercises_win_over_muscle_totals() {
        let (record, _) = migrate_record(stored(json!({
            "date": "2024-01-05",
            "exercises": {"Squats": 2},
            "muscleGroups": {"chest": 4}
        })));
        assert_eq!(record.exercises.len(), 1);
        assert!(record.has_exercise("Squats"));
    }
}
