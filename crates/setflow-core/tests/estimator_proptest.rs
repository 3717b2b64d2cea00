//! Property tests for the planning estimator.

use proptest::prelude::*;

use setflow_core::estimator::estimate;
use setflow_core::plan::{CalorieClass, ExerciseSpec, SessionPlan};

fn arb_class() -> impl Strategy<Value = CalorieClass> {
    prop_oneof![
        Just(CalorieClass::Strength),
        Just(CalorieClass::Cardio),
        Just(CalorieClass::Plyometric),
        Just(CalorieClass::Endurance),
        Just(CalorieClass::Other),
    ]
}

fn arb_exercise() -> impl Strategy<Value = ExerciseSpec> {
    let time = (arb_class(), 1u32..600, proptest::option::of(0u32..120)).prop_map(
        |(class, duration, rest)| {
            let spec = ExerciseSpec::time_based("ex", class, duration);
            match rest {
                Some(r) => spec.with_rest(r),
                None => spec,
            }
        },
    );
    let reps = (arb_class(), 1u32..6, 1u32..30, proptest::option::of(0u32..120)).prop_map(
        |(class, sets, reps, rest)| {
            let spec = ExerciseSpec::rep_based("ex", class, sets, reps);
            match rest {
                Some(r) => spec.with_rest(r),
                None => spec,
            }
        },
    );
    prop_oneof![time, reps]
}

proptest! {
    /// Appending an exercise never decreases either estimate axis.
    #[test]
    fn estimate_is_monotone_in_plan_length(
        exercises in proptest::collection::vec(arb_exercise(), 1..8),
        extra in arb_exercise(),
    ) {
        let base = SessionPlan::new("p", "mixed", exercises.clone());
        let mut longer_exercises = exercises;
        longer_exercises.push(extra);
        let longer = SessionPlan::new("p", "mixed", longer_exercises);

        let a = estimate(&base);
        let b = estimate(&longer);
        prop_assert!(b.duration_secs >= a.duration_secs);
        prop_assert!(b.calories >= a.calories);
    }

    /// Every exercise contributes at least its own active seconds.
    #[test]
    fn duration_at_least_sum_of_active_work(
        exercises in proptest::collection::vec(arb_exercise(), 1..8),
    ) {
        let min_active: u64 = exercises
            .iter()
            .map(|e| match e.duration_secs() {
                Some(d) => u64::from(d),
                None => u64::from(e.target_sets()) * u64::from(e.target_reps()) * 3,
            })
            .sum();
        let plan = SessionPlan::new("p", "mixed", exercises);
        prop_assert!(estimate(&plan).duration_secs >= min_active);
    }
}

#[test]
fn empty_plan_estimates_to_zero() {
    let plan = SessionPlan::new("empty", "", vec![]);
    let est = estimate(&plan);
    assert_eq!(est.duration_secs, 0);
    assert_eq!(est.calories, 0);
}
