//! SetLog - On-device workout tracking store
//!
//! Keeps the in-progress strength workout, completed history, saved templates
//! and the rest timer in a single JSON record behind a string-keyed storage
//! medium, and answers previous-performance lookups for pre-filling new sets.

pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use storage::config::StoreConfig;
pub use storage::medium::{FileMedium, MemoryMedium, StorageMedium};
pub use workouts::store::WorkoutStore;
pub use workouts::types::{Workout, WorkoutStorage, WorkoutTemplate};
