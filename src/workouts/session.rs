//! Building and editing an in-progress workout.
//!
//! Everything here works on plain values; the store decides when the result
//! is persisted. New sets are pre-filled from the most recent performance in
//! the history passed in.

use super::history::find_previous_performance;
use super::types::{
    new_id, Exercise, Millis, PreviousPerformance, Workout, WorkoutSet, WorkoutTemplate,
};

impl Workout {
    /// An empty session starting at `now`.
    pub fn start(now: Millis) -> Self {
        Self {
            id: new_id(),
            start_time: now,
            exercises: Vec::new(),
            template_id: None,
            completed_at: None,
        }
    }

    /// A session laid out from `template`, with every set pre-filled.
    pub fn from_template(template: &WorkoutTemplate, history: &[Workout], now: Millis) -> Self {
        let exercises = template
            .exercises
            .iter()
            .map(|entry| Exercise::with_sets(&entry.name, entry.default_sets, history))
            .collect();

        Self {
            id: new_id(),
            start_time: now,
            exercises,
            template_id: Some(template.id.clone()),
            completed_at: None,
        }
    }

    /// Append an exercise with a single set and return its id.
    pub fn add_exercise(&mut self, name: &str, history: &[Workout]) -> String {
        let exercise = Exercise::with_sets(name, 1, history);
        let id = exercise.id.clone();
        self.exercises.push(exercise);
        id
    }

    /// Remove an exercise by id.
    pub fn remove_exercise(&mut self, exercise_id: &str) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|e| e.id != exercise_id);
        self.exercises.len() != before
    }

    pub fn exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    pub fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| e.id == exercise_id)
    }
}

impl Exercise {
    /// An exercise with `count` numbered sets.
    pub fn with_sets(name: &str, count: u32, history: &[Workout]) -> Self {
        let sets = (1..=count)
            .map(|n| WorkoutSet::prefilled(n, find_previous_performance(history, name, n)))
            .collect();

        Self {
            id: new_id(),
            name: name.to_string(),
            sets,
        }
    }

    /// Append a set numbered one past the highest existing number and
    /// return that number.
    pub fn add_set(&mut self, history: &[Workout]) -> u32 {
        let number = self
            .sets
            .iter()
            .map(|s| s.set_number)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let previous = find_previous_performance(history, &self.name, number);
        self.sets.push(WorkoutSet::prefilled(number, previous));
        number
    }

    /// Remove a set and renumber the rest so numbers stay `1..=n`.
    ///
    /// Each remaining set keeps its own `previous_*` and `current_*` values;
    /// only its position changes.
    pub fn remove_set(&mut self, set_number: u32) -> bool {
        let before = self.sets.len();
        self.sets.retain(|s| s.set_number != set_number);
        if self.sets.len() == before {
            return false;
        }

        for (i, set) in self.sets.iter_mut().enumerate() {
            set.set_number = i as u32 + 1;
        }
        true
    }

    pub fn set_mut(&mut self, set_number: u32) -> Option<&mut WorkoutSet> {
        self.sets.iter_mut().find(|s| s.set_number == set_number)
    }
}

impl WorkoutSet {
    /// A fresh set whose current values start at the previous performance.
    pub fn prefilled(set_number: u32, previous: Option<PreviousPerformance>) -> Self {
        Self {
            id: new_id(),
            set_number,
            previous_reps: previous.map(|p| p.reps),
            previous_weight: previous.map(|p| p.weight),
            current_reps: previous.map(|p| p.reps).unwrap_or(0),
            current_weight: previous.map(|p| p.weight).unwrap_or(0.0),
            completed: false,
            completed_at: None,
        }
    }

    /// Mark the set done at `now`.
    pub fn complete(&mut self, now: Millis) {
        self.completed = true;
        self.completed_at = Some(now);
    }

    /// Undo a completion.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}
