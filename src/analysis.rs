// Module for deriving totals from logged workouts
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::ExerciseCustomizations;
use crate::model::{ExerciseMap, SetEntry, WorkoutRecord};
use crate::muscle_groups::{ALL_MUSCLE_GROUPS, MuscleGroup};

/// Length of the rolling window in calendar days.
pub const RECENT_DAYS: i64 = 7;
/// Maximum number of workouts listed in the rolling window.
pub const RECENT_LIMIT: usize = 7;

/// A record together with its position in the store.
///
/// The index is only meaningful until the store changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry<'a> {
    pub index: usize,
    pub record: &'a WorkoutRecord,
}

/// Sets logged for one exercise of a muscle group breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseSets {
    pub name: String,
    pub sets: u32,
}

pub fn exercise_set_count(entry: Option<&SetEntry>) -> u32 {
    entry.map_or(0, SetEntry::set_count)
}

/// Sets logged for the visible exercises of `group`.
pub fn muscle_group_total(
    group: MuscleGroup,
    exercises: &ExerciseMap,
    catalog: &ExerciseCustomizations,
) -> u32 {
    catalog
        .visible_exercises(group)
        .iter()
        .map(|name| exercise_set_count(exercises.get(name)))
        .sum()
}

fn empty_totals() -> BTreeMap<MuscleGroup, u32> {
    ALL_MUSCLE_GROUPS.into_iter().map(|g| (g, 0)).collect()
}

fn add_record_totals(
    totals: &mut BTreeMap<MuscleGroup, u32>,
    record: &WorkoutRecord,
    catalog: &ExerciseCustomizations,
) {
    for (name, entry) in &record.exercises {
        if let Some(group) = catalog.group_for(name) {
            *totals.entry(group).or_insert(0) += entry.set_count();
        }
    }
}

/// Per-group totals of one record. Every group is present.
pub fn record_totals(
    record: &WorkoutRecord,
    catalog: &ExerciseCustomizations,
) -> BTreeMap<MuscleGroup, u32> {
    let mut totals = empty_totals();
    add_record_totals(&mut totals, record, catalog);
    totals
}

/// Workouts from the last [`RECENT_DAYS`] calendar days, today included,
/// newest first.
pub fn recent_workouts(records: &[WorkoutRecord], now: DateTime<Utc>) -> Vec<HistoryEntry<'_>> {
    let today = now.date_naive();
    let start = today - Duration::days(RECENT_DAYS - 1);
    let mut recent: Vec<HistoryEntry<'_>> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            let day = r.effective_date();
            day >= start && day <= today
        })
        .map(|(index, record)| HistoryEntry { index, record })
        .collect();
    recent.sort_by(|a, b| b.record.sort_key().cmp(&a.record.sort_key()));
    recent.truncate(RECENT_LIMIT);
    recent
}

/// Per-group totals across [`recent_workouts`].
pub fn weekly_totals(
    records: &[WorkoutRecord],
    now: DateTime<Utc>,
    catalog: &ExerciseCustomizations,
) -> BTreeMap<MuscleGroup, u32> {
    let mut totals = empty_totals();
    for entry in recent_workouts(records, now) {
        add_record_totals(&mut totals, entry.record, catalog);
    }
    totals
}

/// Up to three busiest groups, e.g. `"Chest (4), Legs (3)"`.
pub fn workout_summary(record: &WorkoutRecord, catalog: &ExerciseCustomizations) -> String {
    let mut active: Vec<(MuscleGroup, u32)> = record_totals(record, catalog)
        .into_iter()
        .filter(|(_, sets)| *sets > 0)
        .collect();
    if active.is_empty() {
        return "No sets logged".to_string();
    }
    // stable: ties keep catalog order
    active.sort_by(|a, b| b.1.cmp(&a.1));
    active
        .iter()
        .take(3)
        .map(|(group, sets)| format!("{} ({})", group.label(), sets))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Exercises of `group` with at least one set in `record`.
pub fn exercise_breakdown(
    record: &WorkoutRecord,
    group: MuscleGroup,
    catalog: &ExerciseCustomizations,
) -> Vec<ExerciseSets> {
    catalog
        .all_exercises(group)
        .into_iter()
        .filter_map(|name| {
            let sets = exercise_set_count(record.exercises.get(&name));
            (sets > 0).then_some(ExerciseSets { name, sets })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SetDetail;
    use chrono::{Datelike, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 20, 0, 0).unwrap()
    }

    fn record(date: (i32, u32, u32), entries: &[(&str, u32)]) -> WorkoutRecord {
        WorkoutRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            start_time: None,
            exercises: entries
                .iter()
                .map(|(name, n)| (name.to_string(), SetEntry::Count(*n)))
                .collect(),
        }
    }

    #[test]
    fn set_count_by_shape() {
        let sets = SetEntry::Sets(vec![
            SetDetail {
                set_index: 1,
                reps: Some(5),
                weight: None,
            };
            2
        ]);
        assert_eq!(exercise_set_count(Some(&SetEntry::Count(4))), 4);
        assert_eq!(exercise_set_count(Some(&sets)), 2);
        assert_eq!(exercise_set_count(None), 0);
    }

    #[test]
    fn group_total_counts_visible_exercises() {
        let mut catalog = ExerciseCustomizations::default();
        let r = record((2024, 6, 10), &[("Squats", 3), ("Deadlifts", 2), ("Dips", 1)]);
        assert_eq!(muscle_group_total(MuscleGroup::Legs, &r.exercises, &catalog), 5);

        catalog
            .remove_exercise(MuscleGroup::Legs, "Deadlifts", &[])
            .unwrap();
        assert_eq!(muscle_group_total(MuscleGroup::Legs, &r.exercises, &catalog), 3);
    }

    #[test]
    fn recent_window_sorts_and_caps() {
        let mut records = vec![
            record((2024, 6, 2), &[("Squats", 1)]),
            record((2024, 6, 3), &[("Squats", 1)]),
            record((2024, 5, 20), &[("Squats", 9)]),
        ];
        for day in 4..=10 {
            records.push(record((2024, 6, day), &[("Dips", 1)]));
        }
        let recent = recent_workouts(&records, now());
        assert_eq!(recent.len(), RECENT_LIMIT);
        assert_eq!(recent[0].record.date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(recent[0].index, records.len() - 1);
        assert!(recent.iter().all(|e| e.record.date.day() >= 4));
    }

    #[test]
    fn window_covers_today_and_previous_six_days() {
        let records = vec![
            record((2024, 6, 3), &[("Squats", 1)]),
            record((2024, 6, 4), &[("Squats", 2)]),
            record((2024, 6, 10), &[("Squats", 3)]),
            record((2024, 6, 11), &[("Squats", 4)]),
        ];
        let indexes: Vec<usize> = recent_workouts(&records, now()).iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![2, 1]);

        let catalog = ExerciseCustomizations::default();
        assert_eq!(weekly_totals(&records, now(), &catalog)[&MuscleGroup::Legs], 5);
    }

    #[test]
    fn window_uses_start_time_day() {
        let mut late = record((2024, 6, 4), &[("Dips", 1)]);
        late.start_time = Some(Utc.with_ymd_and_hms(2024, 6, 3, 23, 30, 0).unwrap());
        assert!(recent_workouts(&[late], now()).is_empty());
    }

    #[test]
    fn start_time_orders_same_day_workouts() {
        let mut morning = record((2024, 6, 9), &[("Squats", 1)]);
        morning.start_time = Some(Utc.with_ymd_and_hms(2024, 6, 9, 7, 0, 0).unwrap());
        let mut evening = record((2024, 6, 9), &[("Dips", 1)]);
        evening.start_time = Some(Utc.with_ymd_and_hms(2024, 6, 9, 19, 0, 0).unwrap());
        let undated = record((2024, 6, 9), &[("Flys", 1)]);
        let records = vec![morning, undated, evening];

        let order: Vec<usize> = recent_workouts(&records, now()).iter().map(|e| e.index).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn weekly_totals_resolve_custom_exercises() {
        let mut catalog = ExerciseCustomizations::default();
        catalog
            .add_custom_exercise(MuscleGroup::Core, "Plank")
            .unwrap();
        let records = vec![
            record((2024, 6, 8), &[("Squats", 3), ("Plank", 2), ("Mystery", 5)]),
            record((2024, 6, 9), &[("Incline Bench", 4), ("Squats", 1)]),
            record((2024, 5, 1), &[("Squats", 10)]),
        ];
        let totals = weekly_totals(&records, now(), &catalog);
        assert_eq!(totals.len(), ALL_MUSCLE_GROUPS.len());
        assert_eq!(totals[&MuscleGroup::Legs], 4);
        assert_eq!(totals[&MuscleGroup::Core], 2);
        assert_eq!(totals[&MuscleGroup::Chest], 4);
        assert_eq!(totals[&MuscleGroup::Back], 0);
    }

    #[test]
    fn summary_lists_top_three() {
        let catalog = ExerciseCustomizations::default();
        let r = record(
            (2024, 6, 9),
            &[
                ("Squats", 2),
                ("Pull-Ups", 2),
                ("Dips", 5),
                ("Sit-Ups", 1),
                ("Hammer Curls", 2),
            ],
        );
        assert_eq!(
            workout_summary(&r, &catalog),
            "Chest (5), Back (2), Biceps (2)"
        );
        assert_eq!(
            workout_summary(&record((2024, 6, 9), &[]), &catalog),
            "No sets logged"
        );
    }

    #[test]
    fn breakdown_follows_catalog_then_customs() {
        let mut catalog = ExerciseCustomizations::default();
        catalog
            .add_custom_exercise(MuscleGroup::Legs, "Lunges")
            .unwrap();
        catalog.move_exercise(MuscleGroup::Legs, "Squats", crate::catalog::Direction::Down);
        let r = record((2024, 6, 9), &[("Lunges", 2), ("Squats", 3), ("Legs General", 1)]);
        assert_eq!(
            exercise_breakdown(&r, MuscleGroup::Legs, &catalog),
            vec![
                ExerciseSets {
                    name: "Squats".into(),
                    sets: 3
                },
                ExerciseSets {
                    name: "Legs General".into(),
                    sets: 1
                },
                ExerciseSets {
                    name: "Lunges".into(),
                    sets: 2
                },
            ]
        );
    }
}
