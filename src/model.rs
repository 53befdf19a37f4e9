//! Persisted workout data shapes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One logged set with optional rep count and weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDetail {
    /// 1-based position within the exercise at the time it was written.
    pub set_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Sets logged for one exercise.
///
/// Serialised untagged: a bare number for [`SetEntry::Count`] and an array
/// for [`SetEntry::Sets`], which is the format older data already uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetEntry {
    Count(u32),
    Sets(Vec<SetDetail>),
}

impl SetEntry {
    /// Number of sets this entry represents.
    pub fn set_count(&self) -> u32 {
        match self {
            SetEntry::Count(n) => *n,
            SetEntry::Sets(sets) => sets.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.set_count() == 0
    }

    /// Last detailed set, if this entry carries details.
    pub fn last_detail(&self) -> Option<&SetDetail> {
        match self {
            SetEntry::Count(_) => None,
            SetEntry::Sets(sets) => sets.last(),
        }
    }
}

/// Exercise name to logged sets.
pub type ExerciseMap = BTreeMap<String, SetEntry>;

/// A finished workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exercises: ExerciseMap,
}

impl WorkoutRecord {
    /// Time used to order records: the start time, or noon on `date`.
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.start_time.unwrap_or_else(|| {
            self.date
                .and_hms_opt(12, 0, 0)
                .map_or(DateTime::<Utc>::MIN_UTC, |noon| noon.and_utc())
        })
    }

    /// Calendar day the workout belongs to for windowing.
    pub fn effective_date(&self) -> NaiveDate {
        self.start_time.map_or(self.date, |t| t.date_naive())
    }

    pub fn has_exercise(&self, exercise: &str) -> bool {
        self.exercises.contains_key(exercise)
    }
}

/// Lenient start-time parsing: RFC 3339 text or epoch milliseconds.
pub(crate) mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Text(String),
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawTimestamp::Millis(ms)) => DateTime::from_timestamp_millis(ms)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {ms}"))),
            Some(RawTimestamp::Text(text)) => DateTime::parse_from_rfc3339(&text)
                .map(|t| Some(t.with_timezone(&Utc)))
                .map_err(de::Error::custom),
        }
    }
}
