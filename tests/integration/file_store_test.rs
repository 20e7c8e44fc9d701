//! Integration tests for the workout store on a file-backed medium.

use setlog::storage::config::{load_config_from, save_config, StoreConfig};
use setlog::workouts::{RestTimerState, TemplateExercise, WorkoutStorage, WriteError};
use setlog::{FileMedium, MemoryMedium, StorageMedium, Workout, WorkoutStore, WorkoutTemplate};
use tempfile::TempDir;

#[test]
fn test_record_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let mut state = WorkoutStorage::default();
    let mut active = Workout::start(1_700_000_000_000);
    active.add_exercise("Overhead Press", &[]);
    state.active_workout = Some(active);
    state.workout_templates.push(WorkoutTemplate::new(
        "Upper",
        vec![TemplateExercise::new("Overhead Press", 3)],
        1_699_000_000_000,
    ));
    state.rest_timer = RestTimerState::start(1_700_000_100_000, 120, None, None);

    {
        let mut store = WorkoutStore::new(FileMedium::new(temp_dir.path()));
        store.save(&state);
    }

    let reopened = WorkoutStore::new(FileMedium::new(temp_dir.path()));
    assert_eq!(reopened.load(), state);
}

#[test]
fn test_blob_is_single_json_file_under_key() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = WorkoutStore::new(FileMedium::new(temp_dir.path()));
    store.set_active_workout(Some(Workout::start(5))).unwrap();

    let path = temp_dir.path().join("workout-storage.json");
    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["activeWorkout"]["startTime"], 5);
    assert!(json["workoutHistory"].as_array().unwrap().is_empty());

    let entries: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_corrupt_file_loads_defaults_and_is_repaired() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("workout-storage.json"), "{\"workoutHist").unwrap();

    let mut store = WorkoutStore::new(FileMedium::new(temp_dir.path()));
    assert_eq!(store.load(), WorkoutStorage::default());
    assert!(store.try_load().is_err());

    store.upsert_template(WorkoutTemplate::new("Pull", vec![], 0)).unwrap();
    assert_eq!(store.try_load().unwrap().workout_templates.len(), 1);
}

#[test]
fn test_custom_storage_key_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    save_config(
        &StoreConfig {
            storage_key: "gym".to_string(),
            ..Default::default()
        },
        &config_path,
    )
    .unwrap();

    let config = load_config_from(&config_path, temp_dir.path().to_path_buf()).unwrap();
    let mut store = WorkoutStore::with_config(FileMedium::new(&config.data_dir), config.clone());
    store.set_active_workout(Some(Workout::start(0))).unwrap();

    assert!(temp_dir.path().join("gym.json").exists());
    assert!(store.medium().get_item("gym").unwrap().is_some());
}

#[test]
fn test_clear_removes_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = WorkoutStore::new(FileMedium::new(temp_dir.path()));
    store.set_active_workout(Some(Workout::start(0))).unwrap();

    store.clear().unwrap();
    assert!(!temp_dir.path().join("workout-storage.json").exists());
    assert_eq!(store.load(), WorkoutStorage::default());

    // Clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn test_quota_exceeded_keeps_previous_record() {
    let mut store = WorkoutStore::new(MemoryMedium::with_quota(1_000));
    let mut workout = Workout::start(0);
    workout.add_exercise("Squat", &[]);
    store.set_active_workout(Some(workout.clone())).unwrap();

    let mut huge = workout.clone();
    for _ in 0..20 {
        huge.add_exercise("A very long exercise name that eats the quota", &[]);
    }

    let result = store.set_active_workout(Some(huge));
    assert!(matches!(result, Err(WriteError::QuotaExceeded { .. })));
    assert_eq!(store.active_workout(), Some(workout));
}
