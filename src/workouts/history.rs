//! Read-side projections over workout history.

use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;

use super::types::{Millis, PreviousPerformance, Workout};

/// Find the most recent performance of `set_number` for `exercise_name`.
///
/// Walks `history` newest first. A workout only answers the lookup if the
/// named exercise has that set with reps logged; otherwise the scan moves on
/// to older workouts. Linear in the size of history.
pub fn find_previous_performance(
    history: &[Workout],
    exercise_name: &str,
    set_number: u32,
) -> Option<PreviousPerformance> {
    history.iter().find_map(|workout| {
        workout
            .exercises
            .iter()
            .filter(|exercise| exercise.name == exercise_name)
            .flat_map(|exercise| exercise.sets.iter())
            .find(|set| set.set_number == set_number && set.was_performed())
            .map(|set| PreviousPerformance {
                reps: set.current_reps,
                weight: set.current_weight,
            })
    })
}

/// Workouts that started in the same calendar month (UTC).
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup<'a> {
    /// `YYYY-MM`
    pub month: String,
    pub workouts: Vec<&'a Workout>,
}

/// Group history by the month each workout started in.
///
/// Groups come newest month first; inside a group the history order is kept.
pub fn group_by_month(history: &[Workout]) -> Vec<MonthGroup<'_>> {
    let mut groups: BTreeMap<(i32, u32), Vec<&Workout>> = BTreeMap::new();

    for workout in history {
        let Some(started) = to_datetime(workout.start_time) else {
            tracing::debug!("Skipping workout {} with out-of-range start time", workout.id);
            continue;
        };
        groups
            .entry((started.year(), started.month()))
            .or_default()
            .push(workout);
    }

    groups
        .into_iter()
        .rev()
        .map(|((year, month), workouts)| MonthGroup {
            month: format!("{:04}-{:02}", year, month),
            workouts,
        })
        .collect()
}

impl Workout {
    /// Session length, once completed.
    pub fn duration_ms(&self) -> Option<Millis> {
        self.completed_at
            .map(|completed| completed.saturating_sub(self.start_time).max(0))
    }

    /// Number of sets marked completed.
    pub fn completed_set_count(&self) -> usize {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .count()
    }

    /// Total reps times weight over completed sets.
    pub fn total_volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .map(|s| f64::from(s.current_reps) * s.current_weight)
            .sum()
    }
}

fn to_datetime(millis: Millis) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}
