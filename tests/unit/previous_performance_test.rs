//! Unit tests for previous-performance lookup over history.

use setlog::workouts::{
    find_previous_performance, Exercise, PreviousPerformance, Workout, WorkoutSet,
};

fn performed(set_number: u32, reps: u32, weight: f64) -> WorkoutSet {
    let mut set = WorkoutSet::prefilled(set_number, None);
    set.current_reps = reps;
    set.current_weight = weight;
    set.complete(0);
    set
}

fn completed(start_time: i64, name: &str, sets: Vec<WorkoutSet>) -> Workout {
    let mut workout = Workout::start(start_time);
    let mut exercise = Exercise::with_sets(name, 0, &[]);
    exercise.sets = sets;
    workout.exercises.push(exercise);
    workout.completed_at = Some(start_time + 3_600_000);
    workout
}

#[test]
fn test_bench_press_lookup() {
    let history = vec![completed(0, "Bench Press", vec![performed(1, 8, 60.0)])];

    assert_eq!(
        find_previous_performance(&history, "Bench Press", 1),
        Some(PreviousPerformance {
            reps: 8,
            weight: 60.0
        })
    );
}

#[test]
fn test_empty_history_has_no_previous() {
    assert_eq!(find_previous_performance(&[], "Bench Press", 1), None);
}

#[test]
fn test_zero_rep_sets_are_not_previous_performance() {
    let history = vec![completed(0, "Bench Press", vec![performed(1, 0, 60.0)])];
    assert_eq!(find_previous_performance(&history, "Bench Press", 1), None);
}

#[test]
fn test_newer_workout_without_set_falls_back_to_older() {
    let history = vec![
        completed(2_000, "Bench Press", vec![performed(1, 10, 50.0)]),
        completed(1_000, "Bench Press", vec![performed(1, 8, 55.0), performed(2, 6, 60.0)]),
    ];

    assert_eq!(
        find_previous_performance(&history, "Bench Press", 1).map(|p| p.reps),
        Some(10)
    );
    assert_eq!(
        find_previous_performance(&history, "Bench Press", 2).map(|p| p.weight),
        Some(60.0)
    );
}
