//! Integration tests for a full training session lifecycle.

use setlog::storage::config::StoreConfig;
use setlog::workouts::{group_by_month, TemplateExercise};
use setlog::{MemoryMedium, Workout, WorkoutStore, WorkoutTemplate};

const HOUR: i64 = 3_600_000;
// 2024-05-01T00:00:00Z
const MAY_FIRST: i64 = 1_714_521_600_000;

fn log_set(
    store: &mut WorkoutStore<MemoryMedium>,
    exercise: &str,
    set_number: u32,
    reps: u32,
    weight: f64,
    now: i64,
) {
    let exercise_id = store
        .active_workout()
        .and_then(|w| {
            w.exercises
                .iter()
                .find(|e| e.name == exercise)
                .map(|e| e.id.clone())
        })
        .unwrap();

    store
        .update_active_workout(|w| {
            let set = w
                .exercise_mut(&exercise_id)
                .and_then(|e| e.set_mut(set_number))
                .unwrap();
            set.current_reps = reps;
            set.current_weight = weight;
        })
        .unwrap();
    assert!(store.complete_set(&exercise_id, set_number, now).unwrap());
}

#[test]
fn test_template_session_prefills_next_session() {
    let mut store = WorkoutStore::new(MemoryMedium::new());
    let template = WorkoutTemplate::new(
        "Push",
        vec![
            TemplateExercise::new("Bench Press", 2),
            TemplateExercise::new("Dips", 1),
        ],
        MAY_FIRST,
    );
    store.upsert_template(template.clone()).unwrap();

    // First session: nothing to pre-fill
    let first = store.start_from_template(&template.id, MAY_FIRST).unwrap().unwrap();
    assert!(first.exercises[0].sets.iter().all(|s| s.previous_reps.is_none()));

    log_set(&mut store, "Bench Press", 1, 8, 60.0, MAY_FIRST + 600_000);
    log_set(&mut store, "Bench Press", 2, 6, 62.5, MAY_FIRST + 900_000);

    let timer = store.get_rest_timer();
    assert!(timer.active);
    assert_eq!(timer.set_number, Some(2));
    assert_eq!(timer.remaining_seconds(MAY_FIRST + 900_000 + 30_000), 120);

    let active = store.active_workout().unwrap();
    let done = store.complete_workout_at(active, MAY_FIRST + HOUR).unwrap();
    assert_eq!(done.total_volume(), 8.0 * 60.0 + 6.0 * 62.5);
    assert!(store.active_workout().is_none());

    // Second session picks up the logged numbers
    let second = store
        .start_from_template(&template.id, MAY_FIRST + 48 * HOUR)
        .unwrap()
        .unwrap();
    let bench = &second.exercises[0];
    assert_eq!(bench.sets[0].previous_reps, Some(8));
    assert_eq!(bench.sets[0].current_weight, 60.0);
    assert_eq!(bench.sets[1].previous_weight, Some(62.5));
    assert_eq!(second.exercises[1].sets[0].previous_reps, None);

    assert_eq!(
        store.find_previous_performance("Bench Press", 2).map(|p| p.reps),
        Some(6)
    );
}

#[test]
fn test_abandoned_session_is_capped() {
    let config = StoreConfig::default();
    let mut store = WorkoutStore::with_config(MemoryMedium::new(), config);

    let abandoned = Workout::start(MAY_FIRST);
    store.set_active_workout(Some(abandoned.clone())).unwrap();

    // Still within the threshold
    assert!(store.expire_stale_active_workout(MAY_FIRST + HOUR).unwrap().is_none());
    assert!(store.active_workout().is_some());

    let expired = store
        .expire_stale_active_workout(MAY_FIRST + 7 * HOUR)
        .unwrap()
        .unwrap();
    assert_eq!(expired.id, abandoned.id);
    assert_eq!(expired.completed_at, Some(MAY_FIRST + 6 * HOUR));
    assert_eq!(expired.duration_ms(), Some(6 * HOUR));
    assert!(store.active_workout().is_none());
    assert_eq!(store.get_history()[0], expired);
}

#[test]
fn test_history_grouped_by_month() {
    let mut store = WorkoutStore::new(MemoryMedium::new());
    // 2024-04-20, 2024-05-01, 2024-05-03
    for start in [MAY_FIRST - 11 * 24 * HOUR, MAY_FIRST, MAY_FIRST + 2 * 24 * HOUR] {
        store.complete_workout_at(Workout::start(start), start + HOUR).unwrap();
    }

    let history = store.get_history();
    let groups = group_by_month(&history);
    let summary: Vec<(String, usize)> = groups
        .iter()
        .map(|g| (g.month.clone(), g.workouts.len()))
        .collect();
    assert_eq!(
        summary,
        vec![("2024-05".to_string(), 2), ("2024-04".to_string(), 1)]
    );
    assert_eq!(groups[0].workouts[0].start_time, MAY_FIRST + 2 * 24 * HOUR);
}
