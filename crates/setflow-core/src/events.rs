use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Phase;

/// Every successful engine command produces an Event.
/// The CLI prints them; a GUI would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: String,
        workout_name: String,
        exercise: String,
        at: DateTime<Utc>,
    },
    /// A new exercise became active (after rest, or at session start).
    ExerciseStarted {
        exercise_index: usize,
        exercise: String,
        time_based: bool,
        at: DateTime<Utc>,
    },
    RepCounted {
        reps_completed: u32,
        target_reps: u32,
        at: DateTime<Utc>,
    },
    SetCompleted {
        exercise_index: usize,
        /// Set number just finished (1-based).
        set: u32,
        total_sets: u32,
        at: DateTime<Utc>,
    },
    RestStarted {
        after_exercise_index: usize,
        rest_secs: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        at: DateTime<Utc>,
    },
    SessionResumed {
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_id: String,
        total_exercises: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        exercise_index: usize,
        exercise: String,
        current_set: u32,
        total_sets: u32,
        reps_completed: u32,
        target_reps: u32,
        exercise_remaining_secs: Option<u32>,
        rest_remaining_secs: Option<u32>,
        overall_progress: f64,
        at: DateTime<Utc>,
    },
}
