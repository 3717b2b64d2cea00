//! End-to-end session flow tests.
//!
//! Drives the session engine the way the CLI does: commands plus a
//! periodic tick, with completion data persisted through the real
//! SQLite store.

use setflow_core::plan::{CalorieClass, ExerciseSpec, SessionPlan};
use setflow_core::session::{Phase, SessionEngine};
use setflow_core::storage::{CompletionStore, Database};

fn four_exercise_plan() -> SessionPlan {
    SessionPlan::new(
        "Full Body",
        "strength",
        vec![
            ExerciseSpec::rep_based("Squat", CalorieClass::Strength, 2, 5).with_rest(10),
            ExerciseSpec::time_based("Plank", CalorieClass::Strength, 20).with_rest(10),
            ExerciseSpec::rep_based("Push-up", CalorieClass::Strength, 2, 5).with_rest(10),
            ExerciseSpec::time_based("Wall Sit", CalorieClass::Strength, 20),
        ],
    )
}

/// Drive the current rep-based exercise to completion.
fn grind_through_reps(engine: &mut SessionEngine) {
    let sets = engine.total_sets();
    let reps = engine.target_reps();
    for _ in 0..sets {
        for _ in 0..reps {
            engine.increment_rep();
        }
        engine.complete_set();
    }
}

#[test]
fn full_session_produces_complete_record() {
    let mut engine = SessionEngine::new(four_exercise_plan()).unwrap();
    assert_eq!(engine.phase(), Phase::NotStarted);
    engine.start();

    // Exercise 0: reps.
    grind_through_reps(&mut engine);
    assert_eq!(engine.phase(), Phase::Resting);
    engine.skip_rest();

    // Exercise 1: countdown.
    assert_eq!(engine.exercise_index(), 1);
    engine.tick(20);
    engine.skip_rest();

    // Exercise 2: reps.
    grind_through_reps(&mut engine);
    engine.skip_rest();

    // Exercise 3: countdown, last one.
    engine.tick(20);
    assert_eq!(engine.phase(), Phase::Completed);

    let data = engine.completion_data().unwrap();
    assert!(data.is_fully_completed);
    assert_eq!(data.exercises.len(), 4);
    assert_eq!(engine.overall_progress(), 1.0);
}

#[test]
fn partial_exit_after_two_of_four() {
    let mut engine = SessionEngine::new(four_exercise_plan()).unwrap();
    engine.start();
    grind_through_reps(&mut engine);
    engine.skip_rest();
    engine.tick(20); // exercise 1 done, resting again

    let partial = engine.partial_completion().unwrap();
    assert!(!partial.is_fully_completed);
    assert_eq!(partial.exercises.len(), 2);

    // The snapshot must not have mutated the engine.
    assert_eq!(engine.phase(), Phase::Resting);
    assert_eq!(engine.results().len(), 2);

    // Retry is re-invoking the same getter.
    let retry = engine.partial_completion().unwrap();
    assert_eq!(retry.exercises.len(), 2);
}

#[test]
fn resting_precedes_next_exercise() {
    let plan = SessionPlan::new(
        "Pair",
        "hiit",
        vec![
            ExerciseSpec::time_based("Jumping Jacks", CalorieClass::Cardio, 10).with_rest(15),
            ExerciseSpec::time_based("High Knees", CalorieClass::Cardio, 10),
        ],
    );
    let mut engine = SessionEngine::new(plan).unwrap();
    engine.start();
    engine.tick(10);

    assert_eq!(engine.phase(), Phase::Resting);
    assert_eq!(engine.exercise_index(), 0);

    engine.start_next_exercise();
    assert_eq!(engine.phase(), Phase::ExerciseActive);
    assert_eq!(engine.exercise_index(), 1);
}

#[test]
fn pause_resume_crosses_no_time_boundary() {
    let plan = SessionPlan::new(
        "Hold",
        "strength",
        vec![ExerciseSpec::time_based("Plank", CalorieClass::Strength, 60)],
    );
    let mut engine = SessionEngine::new(plan).unwrap();
    engine.start();
    engine.tick(25);

    engine.pause();
    for _ in 0..10 {
        engine.tick(1);
    }
    engine.resume();

    assert_eq!(engine.exercise_remaining_secs(), Some(35));
}

#[test]
fn abandoned_session_persists_and_engine_survives_store_failure_path() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("setflow.db")).unwrap();

    let mut engine = SessionEngine::new(four_exercise_plan()).unwrap();
    engine.start();
    grind_through_reps(&mut engine);

    let partial = engine.partial_completion().unwrap();
    let id = db.save_completion("athlete-7", &partial).unwrap();
    assert!(id > 0);

    let recent = db.recent_workouts(5).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].user_id, "athlete-7");
    assert!(!recent[0].fully_completed);
    assert_eq!(recent[0].exercises_completed, 1);

    let stored = db.workout_detail(id).unwrap().unwrap();
    assert_eq!(stored.exercises[0].name, "Squat");
    assert_eq!(stored.exercises[0].reps_per_set, vec![5, 5]);
}

#[test]
fn engine_snapshot_survives_kv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("setflow.db")).unwrap();

    let mut engine = SessionEngine::new(four_exercise_plan()).unwrap();
    engine.start();
    engine.increment_rep();
    engine.increment_rep();

    db.kv_set("session_engine", &serde_json::to_string(&engine).unwrap())
        .unwrap();
    let raw = db.kv_get("session_engine").unwrap().unwrap();
    let mut restored: SessionEngine = serde_json::from_str(&raw).unwrap();

    assert_eq!(restored.phase(), Phase::ExerciseActive);
    assert_eq!(restored.reps_completed(), 2);

    // The restored engine keeps driving normally.
    for _ in 0..3 {
        restored.increment_rep();
    }
    assert!(restored.complete_set().is_some());
    assert_eq!(restored.current_set(), 2);
}
