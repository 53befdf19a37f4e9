//! Prints the rolling 7-day report for the locally saved workouts.

use chrono::Utc;
use log::info;

use strength_tracker::{ALL_MUSCLE_GROUPS, FileStore, Tracker};

fn main() -> Result<(), strength_tracker::StorageError> {
    env_logger::init();
    let store = FileStore::open_default()?;
    info!("Reading workouts from {}", store.dir().display());
    let tracker = Tracker::open(store);
    let now = Utc::now();

    let recent = tracker.recent_workouts(now);
    if recent.is_empty() {
        println!("No workouts in the last 7 days.");
        return Ok(());
    }

    println!("LAST 7 DAYS");
    let totals = tracker.weekly_totals(now);
    for group in ALL_MUSCLE_GROUPS {
        println!("  {:<10} {}", format!("{group}:"), totals.get(&group).copied().unwrap_or(0));
    }
    println!();
    for entry in recent {
        println!(
            "{}  {}",
            entry.record.date.format("%a, %b %-d"),
            tracker.workout_summary(entry.record)
        );
    }
    if tracker.has_active_sets() {
        println!();
        println!("A workout is in progress.");
    }
    Ok(())
}
