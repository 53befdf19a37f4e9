use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::model::{SetEntry, WorkoutRecord};

#[derive(Debug, Serialize, PartialEq)]
pub struct SetRow<'a> {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Exercise")]
    pub exercise: &'a str,
    #[serde(rename = "Set")]
    pub set: u32,
    #[serde(rename = "Reps")]
    pub reps: Option<u32>,
    #[serde(rename = "Weight")]
    pub weight: Option<f64>,
}

/// One row per logged set across `records`. Bare counts expand into one
/// row per set with empty reps and weight.
pub fn set_rows(records: &[WorkoutRecord]) -> Vec<SetRow<'_>> {
    let mut rows = Vec::new();
    for record in records {
        for (exercise, entry) in &record.exercises {
            match entry {
                SetEntry::Count(n) => rows.extend((1..=*n).map(|set| SetRow {
                    date: record.date,
                    exercise,
                    set,
                    reps: None,
                    weight: None,
                })),
                SetEntry::Sets(sets) => rows.extend(sets.iter().map(|d| SetRow {
                    date: record.date,
                    exercise,
                    set: d.set_index,
                    reps: d.reps,
                    weight: d.weight,
                })),
            }
        }
    }
    rows
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

pub fn write_workouts_csv(writer: impl Write, records: &[WorkoutRecord]) -> csv::Result<()> {
    write_csv(writer, &set_rows(records))
}

pub fn save_workouts_csv<P: AsRef<Path>>(path: P, records: &[WorkoutRecord]) -> csv::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_workouts_csv(std::fs::File::create(path)?, records)
}

/// Suggested file name for an export made on `today`.
pub fn default_file_name(today: NaiveDate) -> String {
    format!("strength-tracker-{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExerciseMap, SetDetail};

    fn records() -> Vec<WorkoutRecord> {
        let mut exercises = ExerciseMap::new();
        exercises.insert("Squats".into(), SetEntry::Count(2));
        exercises.insert(
            "Dips".into(),
            SetEntry::Sets(vec![SetDetail {
                set_index: 1,
                reps: Some(10),
                weight: Some(2.5),
            }]),
        );
        vec![WorkoutRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            start_time: None,
            exercises,
        }]
    }

    #[test]
    fn writes_one_row_per_set() {
        let mut out = Vec::new();
        write_workouts_csv(&mut out, &records()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Date,Exercise,Set,Reps,Weight\n\
             2024-03-01,Dips,1,10,2.5\n\
             2024-03-01,Squats,1,,\n\
             2024-03-01,Squats,2,,\n"
        );
    }

    #[test]
    fn empty_history_writes_nothing() {
        let mut out = Vec::new();
        write_workouts_csv(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn saves_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("export.csv");
        save_workouts_csv(&path, &records()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn file_name_uses_iso_date() {
        let day = NaiveDate::from_ymd_opt(2024, 9, 7).unwrap();
        assert_eq!(default_file_name(day), "strength-tracker-2024-09-07.csv");
    }
}
