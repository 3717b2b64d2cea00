//! Pre-session planning estimates.
//!
//! Pure arithmetic over a [`SessionPlan`]: no clocks, no side effects.
//! The duration figure doubles as the denominator for progress display;
//! the calorie figure is planning-only (live attribution happens in
//! [`crate::completion`]).
//!
//! Rest defaults intentionally differ between the two passes: the
//! duration pass uses the live-session default (15s) while the calorie
//! pass keeps a 30s fallback for rep-based inter-set rest. See DESIGN.md.

use serde::{Deserialize, Serialize};

use crate::plan::{
    ExerciseKind, ExerciseSpec, SessionPlan, CALORIE_REST_FALLBACK_SECS, SECS_PER_REP,
};

/// Planning figures for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub duration_secs: u64,
    pub calories: u64,
}

/// Estimate total duration and calorie burn for a plan.
///
/// Empty plans estimate to zero on both axes.
pub fn estimate(plan: &SessionPlan) -> Estimate {
    let mut duration_secs: u64 = 0;
    let mut calories: f64 = 0.0;

    let last = plan.len().saturating_sub(1);
    for (i, exercise) in plan.exercises.iter().enumerate() {
        duration_secs += active_secs(exercise);
        if i != last {
            duration_secs += u64::from(exercise.rest_secs_or_default());
        }
        calories += exercise.calorie_class.kcal_per_min() * calorie_minutes(exercise);
    }

    Estimate {
        duration_secs,
        // Truncate once at the end, not per exercise.
        calories: calories as u64,
    }
}

/// Active (non-rest) seconds an exercise contributes to the duration pass.
fn active_secs(exercise: &ExerciseSpec) -> u64 {
    match exercise.kind {
        ExerciseKind::Time { duration_secs } => u64::from(duration_secs),
        ExerciseKind::Reps { sets, reps } => {
            u64::from(sets) * u64::from(reps) * u64::from(SECS_PER_REP)
        }
    }
}

/// Exercise minutes as seen by the calorie pass.
///
/// Rep-based exercises count inter-set rest here (with its own 30s
/// fallback when unset); the final rest after an exercise never counts.
fn calorie_minutes(exercise: &ExerciseSpec) -> f64 {
    let secs = match exercise.kind {
        ExerciseKind::Time { duration_secs } => u64::from(duration_secs),
        ExerciseKind::Reps { sets, reps } => {
            let rest = u64::from(exercise.rest_secs.unwrap_or(CALORIE_REST_FALLBACK_SECS));
            u64::from(sets) * u64::from(reps) * u64::from(SECS_PER_REP)
                + rest * u64::from(sets.saturating_sub(1))
        }
    };
    secs as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{CalorieClass, DEFAULT_REST_SECS};

    fn plan(exercises: Vec<ExerciseSpec>) -> SessionPlan {
        SessionPlan::new("test", "strength", exercises)
    }

    #[test]
    fn empty_plan_is_zero() {
        let est = estimate(&plan(vec![]));
        assert_eq!(est, Estimate { duration_secs: 0, calories: 0 });
    }

    #[test]
    fn single_time_based_exercise() {
        // 60s of cardio: no trailing rest, 1 minute at 12 kcal/min.
        let est = estimate(&plan(vec![ExerciseSpec::time_based(
            "High Knees",
            CalorieClass::Cardio,
            60,
        )]));
        assert_eq!(est.duration_secs, 60);
        assert_eq!(est.calories, 12);
    }

    #[test]
    fn rep_based_duration_uses_three_secs_per_rep() {
        let est = estimate(&plan(vec![ExerciseSpec::rep_based(
            "Squat",
            CalorieClass::Strength,
            3,
            10,
        )]));
        // 3 sets x 10 reps x 3s = 90s, no trailing rest for the last exercise.
        assert_eq!(est.duration_secs, 90);
        // Calorie pass adds 30s fallback rest between sets:
        // (90 + 30*2)/60 min * 8 kcal/min = 20 kcal.
        assert_eq!(est.calories, 20);
    }

    #[test]
    fn rest_added_between_exercises_only() {
        let est = estimate(&plan(vec![
            ExerciseSpec::time_based("Plank", CalorieClass::Strength, 30).with_rest(20),
            ExerciseSpec::time_based("Wall Sit", CalorieClass::Strength, 30).with_rest(20),
        ]));
        // 30 + 20 + 30; the second exercise's rest is not appended.
        assert_eq!(est.duration_secs, 80);
    }

    #[test]
    fn unset_rest_uses_live_default_in_duration_pass() {
        let est = estimate(&plan(vec![
            ExerciseSpec::time_based("Plank", CalorieClass::Strength, 30),
            ExerciseSpec::time_based("Wall Sit", CalorieClass::Strength, 30),
        ]));
        assert_eq!(est.duration_secs, 60 + u64::from(DEFAULT_REST_SECS));
    }

    #[test]
    fn calories_truncate_once_at_the_end() {
        // Two 25s "other" exercises: each 25/60 * 6 = 2.5 kcal.
        // Summed first (5.0) then truncated -> 5, not 2+2=4.
        let est = estimate(&plan(vec![
            ExerciseSpec::time_based("A", CalorieClass::Other, 25),
            ExerciseSpec::time_based("B", CalorieClass::Other, 25),
        ]));
        assert_eq!(est.calories, 5);
    }

    #[test]
    fn adding_an_exercise_never_decreases_duration() {
        let base = vec![ExerciseSpec::rep_based("Squat", CalorieClass::Strength, 3, 10)];
        let mut extended = base.clone();
        extended.push(ExerciseSpec::time_based("Plank", CalorieClass::Strength, 1));
        assert!(estimate(&plan(extended)).duration_secs >= estimate(&plan(base)).duration_secs);
    }
}
