//! Workout types and errors.
//!
//! These structs are the persisted shape of the workout record. Field names
//! serialize in camelCase and every collection defaults to empty, so a
//! partial record loads with the missing parts filled in.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::config::DEFAULT_REST_SECONDS;
use crate::storage::medium::MediumError;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> Millis {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh identifier for workouts, exercises, sets and templates.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Root record persisted under the store's key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkoutStorage {
    /// The in-progress session, if any
    pub active_workout: Option<Workout>,
    /// Completed sessions, newest first
    pub workout_history: Vec<Workout>,
    /// Saved templates, unique by id
    pub workout_templates: Vec<WorkoutTemplate>,
    /// Singleton rest timer
    pub rest_timer: RestTimerState,
}

impl WorkoutStorage {
    /// Describe the first weight that JSON cannot hold (NaN or infinite).
    ///
    /// Such values serialize as `null` and then fail to load, which would
    /// turn the whole record into defaults.
    pub fn find_non_finite_weight(&self) -> Option<String> {
        self.active_workout
            .iter()
            .chain(self.workout_history.iter())
            .find_map(Workout::find_non_finite_weight)
    }
}

/// A workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Unique identifier
    pub id: String,
    /// Session start (epoch ms)
    pub start_time: Millis,
    /// Exercises in the order they were added
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Template this session was started from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Completion time (epoch ms); set once the session moves to history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Millis>,
}

impl Workout {
    /// Whether the session has been completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    fn find_non_finite_weight(&self) -> Option<String> {
        self.exercises.iter().find_map(|exercise| {
            exercise.sets.iter().find_map(|set| {
                let bad = !set.current_weight.is_finite()
                    || set.previous_weight.is_some_and(|w| !w.is_finite());
                bad.then(|| {
                    format!(
                        "non-finite weight in workout {} exercise {:?} set {}",
                        self.id, exercise.name, set.set_number
                    )
                })
            })
        })
    }
}

/// An exercise within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

/// A single set of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: String,
    /// 1-based position, unique within the exercise
    pub set_number: u32,
    /// Reps carried over from the last performance
    #[serde(default)]
    pub previous_reps: Option<u32>,
    /// Weight carried over from the last performance
    #[serde(default)]
    pub previous_weight: Option<f64>,
    /// Reps entered for this session; above zero means the set was performed
    #[serde(default)]
    pub current_reps: u32,
    /// Weight entered for this session
    #[serde(default)]
    pub current_weight: f64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Millis>,
}

impl WorkoutSet {
    /// Whether reps were actually logged for this set.
    pub fn was_performed(&self) -> bool {
        self.current_reps > 0
    }
}

/// A reusable, named list of exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
    /// Creation time (epoch ms)
    pub created_at: Millis,
}

impl WorkoutTemplate {
    /// Create a template with a fresh id.
    pub fn new(name: impl Into<String>, exercises: Vec<TemplateExercise>, created_at: Millis) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            exercises,
            created_at,
        }
    }
}

/// Template entry: an exercise name and how many sets to start with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
    pub name: String,
    pub default_sets: u32,
}

impl TemplateExercise {
    pub fn new(name: impl Into<String>, default_sets: u32) -> Self {
        Self {
            name: name.into(),
            default_sets,
        }
    }
}

/// Rest timer singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RestTimerState {
    pub active: bool,
    /// Timer start (epoch ms)
    pub start_time: Millis,
    /// Rest period in seconds
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_number: Option<u32>,
}

impl Default for RestTimerState {
    fn default() -> Self {
        Self {
            active: false,
            start_time: 0,
            duration: DEFAULT_REST_SECONDS,
            exercise_id: None,
            set_number: None,
        }
    }
}

/// Reps and weight from the most recent time a set was performed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviousPerformance {
    pub reps: u32,
    pub weight: f64,
}

/// Failure reading the persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Stored workout data is corrupt: {0}")]
    Corrupt(String),
}

impl From<MediumError> for ReadError {
    fn from(e: MediumError) -> Self {
        ReadError::Unavailable(e.to_string())
    }
}

/// Failure persisting the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Storage quota exceeded: {needed} bytes requested, {available} bytes available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<MediumError> for WriteError {
    fn from(e: MediumError) -> Self {
        match e {
            MediumError::QuotaExceeded { needed, available } => {
                WriteError::QuotaExceeded { needed, available }
            }
            other => WriteError::Unavailable(other.to_string()),
        }
    }
}
