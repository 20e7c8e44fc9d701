//! Workout module for session tracking, templates and history.

pub mod history;
pub mod session;
pub mod store;
pub mod timer;
pub mod types;

pub use history::{find_previous_performance, group_by_month, MonthGroup};
pub use store::WorkoutStore;
pub use types::{
    new_id, now_millis, Exercise, Millis, PreviousPerformance, ReadError, RestTimerState,
    TemplateExercise, Workout, WorkoutSet, WorkoutStorage, WorkoutTemplate, WriteError,
};
