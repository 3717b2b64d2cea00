//! Completion records: per-exercise results and the session summary.
//!
//! The engine appends one [`CompletedExercise`] each time an exercise
//! leaves the active phase; [`CompletionData`] is assembled on demand
//! (fully completed or partial) and handed to the caller, which decides
//! whether to persist or discard it. The engine never stores it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::{ExerciseKind, ExerciseSpec, SECS_PER_REP};

/// Result of one finished exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    pub name: String,
    pub kind: ExerciseKind,
    pub sets_completed: u32,
    /// Reps recorded for each completed set; empty for time-based exercises.
    pub reps_per_set: Vec<u32>,
    /// Active seconds spent on the exercise (excludes rest and pauses).
    pub elapsed_secs: u64,
    pub calories: f64,
}

/// Durable summary of one finished or abandoned session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionData {
    pub session_id: String,
    pub workout_name: String,
    pub workout_kind: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: u64,
    /// Sum of per-exercise calories, truncated once.
    pub total_calories: u64,
    pub exercises: Vec<CompletedExercise>,
    /// True iff every planned exercise has a record.
    pub is_fully_completed: bool,
    #[serde(default)]
    pub rating: Option<u8>,
}

impl CompletionData {
    /// Assemble a summary from accumulated records.
    pub fn assemble(
        session_id: &str,
        workout_name: &str,
        workout_kind: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        exercises: Vec<CompletedExercise>,
        is_fully_completed: bool,
    ) -> Self {
        let total_calories = exercises.iter().map(|e| e.calories).sum::<f64>() as u64;
        let duration_secs = (ended_at - started_at).num_seconds().max(0) as u64;
        Self {
            session_id: session_id.to_string(),
            workout_name: workout_name.to_string(),
            workout_kind: workout_kind.to_string(),
            started_at,
            ended_at,
            duration_secs,
            total_calories,
            exercises,
            is_fully_completed,
            rating: None,
        }
    }
}

/// Calories attributed to one finished exercise.
///
/// Time-based: burn rate over the seconds actually spent active.
/// Rep-based: burn rate over the nominal work performed
/// (sets completed x target reps x 3s), so an unticked but fully
/// driven session still attributes a sensible figure.
pub fn attributed_calories(spec: &ExerciseSpec, elapsed_secs: u64, sets_completed: u32) -> f64 {
    let minutes = match spec.kind {
        ExerciseKind::Time { .. } => elapsed_secs as f64 / 60.0,
        ExerciseKind::Reps { reps, .. } => {
            f64::from(sets_completed) * f64::from(reps) * f64::from(SECS_PER_REP) / 60.0
        }
    };
    spec.calorie_class.kcal_per_min() * minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::CalorieClass;

    #[test]
    fn time_based_calories_follow_elapsed() {
        let spec = ExerciseSpec::time_based("Plank", CalorieClass::Strength, 120);
        // Completed only half the countdown before skipping.
        let kcal = attributed_calories(&spec, 60, 1);
        assert!((kcal - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rep_based_calories_follow_sets_completed() {
        let spec = ExerciseSpec::rep_based("Squat", CalorieClass::Strength, 3, 10);
        // 2 of 3 sets: 2 x 10 x 3s = 60s of work = 1 min at 8 kcal/min.
        let kcal = attributed_calories(&spec, 0, 2);
        assert!((kcal - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn assemble_truncates_total_once() {
        let started = Utc::now();
        let ended = started + chrono::Duration::seconds(90);
        let record = |kcal: f64| CompletedExercise {
            name: "X".into(),
            kind: ExerciseKind::Time { duration_secs: 30 },
            sets_completed: 1,
            reps_per_set: vec![],
            elapsed_secs: 30,
            calories: kcal,
        };
        let data = CompletionData::assemble(
            "sid",
            "Test",
            "other",
            started,
            ended,
            vec![record(2.5), record(2.5)],
            true,
        );
        assert_eq!(data.total_calories, 5);
        assert_eq!(data.duration_secs, 90);
    }
}
