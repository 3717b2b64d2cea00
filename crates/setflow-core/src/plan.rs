//! Session plan model: exercises, calorie classes, plan input normalization.
//!
//! A [`SessionPlan`] is built once before a workout begins and is read-only
//! afterwards. Plans loaded from JSON files may leave optional fields out;
//! defaults are applied exactly once during [`ExerciseInput::into_spec`],
//! never re-derived later.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Seconds assumed per repetition when estimating rep-based work.
pub const SECS_PER_REP: u32 = 3;
/// Rest applied between exercises when a spec leaves `rest_secs` unset.
pub const DEFAULT_REST_SECS: u32 = 15;
/// Rest fallback used only by the calorie pass of the estimator.
pub const CALORIE_REST_FALLBACK_SECS: u32 = 30;

// Normalization defaults for partial plan input.
const INPUT_DEFAULT_SETS: u32 = 1;
const INPUT_DEFAULT_REPS: u32 = 10;
const INPUT_DEFAULT_DURATION_SECS: u32 = 30;
const INPUT_DEFAULT_REST_SECS: u32 = 60;

/// Intensity class mapped to a fixed kcal-per-minute burn rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalorieClass {
    Strength,
    Cardio,
    Plyometric,
    Endurance,
    Other,
}

impl CalorieClass {
    pub fn kcal_per_min(self) -> f64 {
        match self {
            CalorieClass::Strength => 8.0,
            CalorieClass::Cardio => 12.0,
            CalorieClass::Plyometric => 15.0,
            CalorieClass::Endurance => 10.0,
            CalorieClass::Other => 6.0,
        }
    }
}

impl Default for CalorieClass {
    fn default() -> Self {
        CalorieClass::Other
    }
}

/// How progress through one exercise is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Countdown from a target duration.
    Time { duration_secs: u32 },
    /// A fixed number of sets of a fixed number of reps.
    Reps { sets: u32, reps: u32 },
}

/// Immutable description of one exercise in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: ExerciseKind,
    /// Rest after this exercise. `None` falls back to [`DEFAULT_REST_SECS`].
    #[serde(default)]
    pub rest_secs: Option<u32>,
    #[serde(default)]
    pub calorie_class: CalorieClass,
}

impl ExerciseSpec {
    pub fn time_based(name: impl Into<String>, class: CalorieClass, duration_secs: u32) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::Time { duration_secs },
            rest_secs: None,
            calorie_class: class,
        }
    }

    pub fn rep_based(name: impl Into<String>, class: CalorieClass, sets: u32, reps: u32) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::Reps { sets, reps },
            rest_secs: None,
            calorie_class: class,
        }
    }

    pub fn with_rest(mut self, rest_secs: u32) -> Self {
        self.rest_secs = Some(rest_secs);
        self
    }

    pub fn is_time_based(&self) -> bool {
        matches!(self.kind, ExerciseKind::Time { .. })
    }

    /// Target sets; 1 for time-based exercises.
    pub fn target_sets(&self) -> u32 {
        match self.kind {
            ExerciseKind::Time { .. } => 1,
            ExerciseKind::Reps { sets, .. } => sets,
        }
    }

    /// Target reps per set; 0 for time-based exercises.
    pub fn target_reps(&self) -> u32 {
        match self.kind {
            ExerciseKind::Time { .. } => 0,
            ExerciseKind::Reps { reps, .. } => reps,
        }
    }

    /// Countdown duration for time-based exercises.
    pub fn duration_secs(&self) -> Option<u32> {
        match self.kind {
            ExerciseKind::Time { duration_secs } => Some(duration_secs),
            ExerciseKind::Reps { .. } => None,
        }
    }

    /// Rest after this exercise with the live-session default applied.
    pub fn rest_secs_or_default(&self) -> u32 {
        self.rest_secs.unwrap_or(DEFAULT_REST_SECS)
    }
}

/// Ordered, non-empty list of exercises plus display metadata.
///
/// Owned by the caller; the session engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub name: String,
    /// Free-form workout type tag ("strength", "hiit", ...).
    #[serde(default)]
    pub workout_kind: String,
    pub exercises: Vec<ExerciseSpec>,
}

impl SessionPlan {
    pub fn new(name: impl Into<String>, workout_kind: impl Into<String>, exercises: Vec<ExerciseSpec>) -> Self {
        Self {
            name: name.into(),
            workout_kind: workout_kind.into(),
            exercises,
        }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn exercise(&self, index: usize) -> Option<&ExerciseSpec> {
        self.exercises.get(index)
    }
}

/// Raw exercise entry as it appears in a plan file.
///
/// Optional fields are filled from fixed defaults (sets=1, reps=10,
/// duration=30s, rest=60s) when converted into an [`ExerciseSpec`].
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseInput {
    pub name: String,
    pub kind: ExerciseKindTag,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub rest_secs: Option<u32>,
    #[serde(default)]
    pub calorie_class: Option<CalorieClass>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKindTag {
    Time,
    Reps,
}

impl ExerciseInput {
    pub fn into_spec(self) -> Result<ExerciseSpec, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "exercise name must not be empty".into(),
            });
        }
        let kind = match self.kind {
            ExerciseKindTag::Time => {
                let duration_secs = self.duration_secs.unwrap_or(INPUT_DEFAULT_DURATION_SECS);
                if duration_secs == 0 {
                    return Err(ValidationError::InvalidValue {
                        field: "duration_secs".into(),
                        message: "time-based exercise duration must be > 0".into(),
                    });
                }
                ExerciseKind::Time { duration_secs }
            }
            ExerciseKindTag::Reps => {
                let sets = self.sets.unwrap_or(INPUT_DEFAULT_SETS);
                let reps = self.reps.unwrap_or(INPUT_DEFAULT_REPS);
                if sets == 0 {
                    return Err(ValidationError::InvalidValue {
                        field: "sets".into(),
                        message: "rep-based exercise needs at least one set".into(),
                    });
                }
                if reps == 0 {
                    return Err(ValidationError::InvalidValue {
                        field: "reps".into(),
                        message: "rep-based exercise needs at least one rep per set".into(),
                    });
                }
                ExerciseKind::Reps { sets, reps }
            }
        };
        Ok(ExerciseSpec {
            name: self.name,
            kind,
            rest_secs: Some(self.rest_secs.unwrap_or(INPUT_DEFAULT_REST_SECS)),
            calorie_class: self.calorie_class.unwrap_or_default(),
        })
    }
}

/// A whole plan file (JSON) before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanInput {
    pub name: String,
    #[serde(default)]
    pub workout_kind: String,
    pub exercises: Vec<ExerciseInput>,
}

impl PlanInput {
    pub fn into_plan(self) -> Result<SessionPlan, ValidationError> {
        if self.exercises.is_empty() {
            return Err(ValidationError::EmptyCollection("exercises".into()));
        }
        let exercises = self
            .exercises
            .into_iter()
            .map(ExerciseInput::into_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SessionPlan::new(self.name, self.workout_kind, exercises))
    }
}
