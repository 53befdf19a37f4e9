use crate::muscle_groups::MuscleGroup;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,
    #[error("I/O error accessing `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage rejected write of `{0}`")]
    WriteRejected(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("exercise name is empty")]
    EmptyName,
    #[error("exercise `{name}` already exists in {group}")]
    Duplicate { group: MuscleGroup, name: String },
    #[error("`{0}` is a protected exercise")]
    Protected(String),
    #[error("`{name}` is not an exercise of {group}")]
    Unknown { group: MuscleGroup, name: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("nothing logged")]
    NothingLogged,
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("no workout at position {0}")]
    WorkoutOutOfRange(usize),
    #[error("workout at position {0} changed since it was selected")]
    StaleWorkout(usize),
    #[error("weight increment {0} is not one of the offered steps")]
    InvalidIncrement(f64),
}
