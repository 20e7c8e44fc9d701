//! On-device workout store.
//!
//! The store owns a [`StorageMedium`] and keeps a single [`WorkoutStorage`]
//! record under one key. Every mutation reads the whole record, changes it
//! and writes the whole record back.
//!
//! Reads and writes come in two flavours. The `try_*` methods and the
//! mutators return explicit errors. [`WorkoutStore::load`] and
//! [`WorkoutStore::save`] never fail: a bad read yields the default record
//! and a failed write is logged and dropped. Mutators start from
//! [`WorkoutStore::load`], so a corrupt record is replaced by the next
//! successful write.

use super::history::find_previous_performance;
use super::types::{
    now_millis, Millis, PreviousPerformance, ReadError, RestTimerState, Workout, WorkoutStorage,
    WorkoutTemplate, WriteError,
};
use crate::storage::config::StoreConfig;
use crate::storage::medium::StorageMedium;

/// Persistent store for workout sessions, history, templates and the rest timer.
pub struct WorkoutStore<M: StorageMedium> {
    medium: M,
    config: StoreConfig,
}

impl<M: StorageMedium> WorkoutStore<M> {
    /// Create a store with the default configuration.
    pub fn new(medium: M) -> Self {
        Self::with_config(medium, StoreConfig::default())
    }

    /// Create a store with the given configuration.
    pub fn with_config(medium: M, config: StoreConfig) -> Self {
        Self { medium, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    pub fn into_medium(self) -> M {
        self.medium
    }

    // ========== Whole-record access ==========

    /// Read the record. A missing or blank slot is not an error and yields
    /// the default record.
    pub fn try_load(&self) -> Result<WorkoutStorage, ReadError> {
        let raw = self.medium.get_item(&self.config.storage_key)?;

        match raw {
            Some(content) if !content.trim().is_empty() => serde_json::from_str(&content)
                .map_err(|e| ReadError::Corrupt(e.to_string())),
            _ => Ok(WorkoutStorage::default()),
        }
    }

    /// Read the record, falling back to defaults on any failure.
    pub fn load(&self) -> WorkoutStorage {
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Failed to load workout storage, using defaults: {}", e);
                WorkoutStorage::default()
            }
        }
    }

    /// Serialize and write the whole record in one write.
    ///
    /// A record holding a NaN or infinite weight is rejected and the stored
    /// record is left as it was.
    pub fn try_save(&mut self, state: &WorkoutStorage) -> Result<(), WriteError> {
        if let Some(problem) = state.find_non_finite_weight() {
            return Err(WriteError::Serialize(problem));
        }

        let content =
            serde_json::to_string(state).map_err(|e| WriteError::Serialize(e.to_string()))?;
        self.medium.set_item(&self.config.storage_key, &content)?;
        Ok(())
    }

    /// Write the record, logging and discarding any failure.
    pub fn save(&mut self, state: &WorkoutStorage) {
        if let Err(e) = self.try_save(state) {
            tracing::warn!("Failed to save workout storage: {}", e);
        }
    }

    /// Erase all persisted state.
    pub fn clear(&mut self) -> Result<(), WriteError> {
        self.medium
            .remove_item(&self.config.storage_key)
            .map_err(WriteError::from)
            .inspect_err(|e| tracing::warn!("Failed to clear workout storage: {}", e))?;
        tracing::info!("Cleared workout storage");
        Ok(())
    }

    /// Read-modify-write of the whole record.
    fn update<T>(&mut self, f: impl FnOnce(&mut WorkoutStorage) -> T) -> Result<T, WriteError> {
        let mut state = self.load();
        let result = f(&mut state);
        self.try_save(&state)
            .inspect_err(|e| tracing::warn!("Failed to save workout storage: {}", e))?;
        Ok(result)
    }

    // ========== Active workout ==========

    /// The in-progress session, if any.
    pub fn active_workout(&self) -> Option<Workout> {
        self.load().active_workout
    }

    /// Replace the active slot.
    pub fn set_active_workout(&mut self, workout: Option<Workout>) -> Result<(), WriteError> {
        self.update(|state| state.active_workout = workout)
    }

    /// Start a session from a saved template, replacing any active session.
    ///
    /// Returns `None` without writing when the template does not exist.
    pub fn start_from_template(
        &mut self,
        template_id: &str,
        now: Millis,
    ) -> Result<Option<Workout>, WriteError> {
        let mut state = self.load();
        let Some(template) = state.workout_templates.iter().find(|t| t.id == template_id) else {
            tracing::debug!("Template {} not found", template_id);
            return Ok(None);
        };

        let workout = Workout::from_template(template, &state.workout_history, now);
        if let Some(replaced) = state.active_workout.replace(workout.clone()) {
            tracing::info!("Discarding active workout {} for template start", replaced.id);
        }

        self.try_save(&state)?;
        tracing::info!("Started workout {} from template {}", workout.id, template_id);
        Ok(Some(workout))
    }

    /// Apply `f` to the active session and persist it.
    ///
    /// Returns `false` without writing when no session is active.
    pub fn update_active_workout(
        &mut self,
        f: impl FnOnce(&mut Workout),
    ) -> Result<bool, WriteError> {
        let mut state = self.load();
        let Some(workout) = state.active_workout.as_mut() else {
            return Ok(false);
        };

        f(workout);
        self.try_save(&state)?;
        Ok(true)
    }

    /// Mark a set of the active session complete and start the rest timer
    /// for it.
    ///
    /// Returns `false` without writing when the set cannot be found.
    pub fn complete_set(
        &mut self,
        exercise_id: &str,
        set_number: u32,
        now: Millis,
    ) -> Result<bool, WriteError> {
        let mut state = self.load();
        let set = state
            .active_workout
            .as_mut()
            .and_then(|w| w.exercise_mut(exercise_id))
            .and_then(|e| e.set_mut(set_number));

        let Some(set) = set else {
            return Ok(false);
        };

        set.complete(now);
        state.rest_timer = RestTimerState::start(
            now,
            self.config.default_rest_seconds,
            Some(exercise_id.to_string()),
            Some(set_number),
        );

        self.try_save(&state)?;
        Ok(true)
    }

    /// Move `workout` into history, completed now. Clears the active slot.
    pub fn complete_workout(&mut self, workout: Workout) -> Result<Workout, WriteError> {
        self.complete_workout_at(workout, now_millis())
    }

    /// Move `workout` into history with the given completion time.
    pub fn complete_workout_at(
        &mut self,
        mut workout: Workout,
        completed_at: Millis,
    ) -> Result<Workout, WriteError> {
        workout.completed_at = Some(completed_at);

        let completed = workout.clone();
        self.update(move |state| {
            state.workout_history.insert(0, workout);
            state.active_workout = None;
        })?;

        tracing::info!("Completed workout {}", completed.id);
        Ok(completed)
    }

    /// Force-complete an active session that started more than the stale
    /// threshold before `now`, capping its length at the threshold.
    ///
    /// Returns the expired workout, or `None` when nothing was stale.
    pub fn expire_stale_active_workout(
        &mut self,
        now: Millis,
    ) -> Result<Option<Workout>, WriteError> {
        let threshold = self.config.stale_after_ms();
        let Some(active) = self.active_workout() else {
            return Ok(None);
        };

        if now.saturating_sub(active.start_time) <= threshold {
            return Ok(None);
        }

        tracing::info!(
            "Expiring workout {} left open for more than {} hours",
            active.id,
            self.config.stale_workout_hours
        );
        let completed_at = active.start_time.saturating_add(threshold);
        self.complete_workout_at(active, completed_at).map(Some)
    }

    // ========== History ==========

    /// Completed workouts, newest first.
    pub fn get_history(&self) -> Vec<Workout> {
        self.load().workout_history
    }

    /// Most recent reps/weight for a set position of an exercise.
    pub fn find_previous_performance(
        &self,
        exercise_name: &str,
        set_number: u32,
    ) -> Option<PreviousPerformance> {
        find_previous_performance(&self.load().workout_history, exercise_name, set_number)
    }

    // ========== Templates ==========

    pub fn get_templates(&self) -> Vec<WorkoutTemplate> {
        self.load().workout_templates
    }

    /// Save a template, replacing one with the same id in place.
    pub fn upsert_template(&mut self, template: WorkoutTemplate) -> Result<(), WriteError> {
        self.update(|state| {
            match state
                .workout_templates
                .iter_mut()
                .find(|t| t.id == template.id)
            {
                Some(existing) => *existing = template,
                None => state.workout_templates.push(template),
            }
        })
    }

    /// Delete a template by id. Returns whether one was removed; an unknown
    /// id leaves the record untouched.
    pub fn delete_template(&mut self, id: &str) -> Result<bool, WriteError> {
        let mut state = self.load();
        let before = state.workout_templates.len();
        state.workout_templates.retain(|t| t.id != id);

        if state.workout_templates.len() == before {
            return Ok(false);
        }

        self.try_save(&state)?;
        Ok(true)
    }

    // ========== Rest timer ==========

    pub fn get_rest_timer(&self) -> RestTimerState {
        self.load().rest_timer
    }

    pub fn set_rest_timer(&mut self, timer: RestTimerState) -> Result<(), WriteError> {
        self.update(|state| state.rest_timer = timer)
    }
}
