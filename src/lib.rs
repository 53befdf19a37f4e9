//! Workout logging: exercise catalog, in-progress sessions, persisted
//! records and the totals derived from them.

pub mod analysis;
pub mod catalog;
pub mod confirm;
pub mod error;
pub mod export;
pub mod migration;
pub mod model;
pub mod muscle_groups;
pub mod session;
pub mod settings;
pub mod store;
pub mod tracker;

pub use catalog::{Direction, ExerciseCustomizations};
pub use confirm::{DestructiveAction, PendingConfirmation};
pub use error::{CatalogError, SessionError, StorageError, TrackerError};
pub use model::{ExerciseMap, SetDetail, SetEntry, WorkoutRecord};
pub use muscle_groups::{ALL_MUSCLE_GROUPS, MuscleGroup};
pub use session::{Increment, PendingSet, Session};
pub use settings::Settings;
pub use store::{AppData, FileStore, KeyValueStore, MemoryStore};
pub use tracker::{Confirmed, Request, Tracker};
