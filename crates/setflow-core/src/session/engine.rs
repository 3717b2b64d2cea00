//! Session engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads -- the caller drives it by invoking `tick()` periodically from
//! one scheduling source and issuing commands in between.
//!
//! ## State Transitions
//!
//! ```text
//! NotStarted -> ExerciseActive <-> Paused
//!               ExerciseActive -> Resting -> ExerciseActive (next index)
//!               ExerciseActive | Resting | Paused -> Completed
//! ```
//!
//! `Completed` is terminal. Commands issued in a phase that does not
//! permit them are safe no-ops returning `None`; callers gate their UI by
//! phase but the engine re-validates everything internally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rest::RestController;
use super::timer::ExerciseTimer;
use crate::completion::{attributed_calories, CompletedExercise, CompletionData};
use crate::error::EngineError;
use crate::events::Event;
use crate::plan::{ExerciseSpec, SessionPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    NotStarted,
    ExerciseActive,
    Resting,
    Paused,
    Completed,
}

/// Which countdown was live when the session was paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PausedFrom {
    Exercise,
    Rest,
}

/// Core session engine.
///
/// Owns all mutable workout state: active exercise index, set and rep
/// counters, the exercise/rest countdowns, and the append-only list of
/// completed-exercise records. Collaborators (persistence, video lookup)
/// are injected at the call sites that need them; the engine never
/// touches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEngine {
    plan: SessionPlan,
    session_id: String,
    phase: Phase,
    exercise_index: usize,
    /// 1-based set counter; stays at 1 for time-based exercises.
    current_set: u32,
    reps_completed: u32,
    timer: Option<ExerciseTimer>,
    rest: Option<RestController>,
    #[serde(default)]
    paused_from: Option<PausedFrom>,
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    ended_at: Option<DateTime<Utc>>,
    /// Appended exactly once per exercise, before any subsequent
    /// transition becomes observable.
    results: Vec<CompletedExercise>,
    /// Reps recorded per completed set of the current exercise.
    set_reps: Vec<u32>,
    /// Active seconds accumulated for the current rep-based exercise.
    exercise_elapsed_secs: u64,
}

impl SessionEngine {
    /// Create an engine for a plan. Rejects empty plans.
    pub fn new(plan: SessionPlan) -> Result<Self, EngineError> {
        if plan.is_empty() {
            return Err(EngineError::EmptyPlan);
        }
        Ok(Self {
            plan,
            session_id: Uuid::new_v4().to_string(),
            phase: Phase::NotStarted,
            exercise_index: 0,
            current_set: 1,
            reps_completed: 0,
            timer: None,
            rest: None,
            paused_from: None,
            started_at: None,
            ended_at: None,
            results: Vec::new(),
            set_reps: Vec::new(),
            exercise_elapsed_secs: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn reps_completed(&self) -> u32 {
        self.reps_completed
    }

    pub fn current_exercise(&self) -> Option<&ExerciseSpec> {
        if self.phase == Phase::Completed {
            return None;
        }
        self.plan.exercise(self.exercise_index)
    }

    pub fn next_exercise(&self) -> Option<&ExerciseSpec> {
        if self.phase == Phase::Completed {
            return None;
        }
        self.plan.exercise(self.exercise_index + 1)
    }

    pub fn total_sets(&self) -> u32 {
        self.current_exercise().map(|e| e.target_sets()).unwrap_or(0)
    }

    pub fn target_reps(&self) -> u32 {
        self.current_exercise().map(|e| e.target_reps()).unwrap_or(0)
    }

    /// Remaining countdown for the active time-based exercise.
    pub fn exercise_remaining_secs(&self) -> Option<u32> {
        self.timer.as_ref().map(ExerciseTimer::remaining_secs)
    }

    /// Remaining countdown for the active rest period.
    pub fn rest_remaining_secs(&self) -> Option<u32> {
        self.rest.as_ref().map(RestController::remaining_secs)
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// 0.0 .. 1.0 in whole completed exercises over the plan length.
    pub fn overall_progress(&self) -> f64 {
        self.results.len() as f64 / self.plan.len() as f64
    }

    pub fn results(&self) -> &[CompletedExercise] {
        &self.results
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let exercise = self.plan.exercise(self.exercise_index);
        Event::StateSnapshot {
            phase: self.phase,
            exercise_index: self.exercise_index,
            exercise: exercise.map(|e| e.name.clone()).unwrap_or_default(),
            current_set: self.current_set,
            total_sets: exercise.map(|e| e.target_sets()).unwrap_or(0),
            reps_completed: self.reps_completed,
            target_reps: exercise.map(|e| e.target_reps()).unwrap_or(0),
            exercise_remaining_secs: self.exercise_remaining_secs(),
            rest_remaining_secs: self.rest_remaining_secs(),
            overall_progress: self.overall_progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// NotStarted -> ExerciseActive at index 0, set 1, reps 0.
    pub fn start(&mut self) -> Option<Event> {
        if self.phase != Phase::NotStarted {
            return None;
        }
        self.started_at = Some(Utc::now());
        self.phase = Phase::ExerciseActive;
        self.arm_current_exercise();
        let exercise = self.plan.exercise(self.exercise_index)?;
        Some(Event::SessionStarted {
            session_id: self.session_id.clone(),
            workout_name: self.plan.name.clone(),
            exercise: exercise.name.clone(),
            at: Utc::now(),
        })
    }

    /// Count one rep, up to the target. Counting beyond the target is a
    /// no-op; it does not complete the set.
    pub fn increment_rep(&mut self) -> Option<Event> {
        if self.phase != Phase::ExerciseActive {
            return None;
        }
        let exercise = self.plan.exercise(self.exercise_index)?;
        if exercise.is_time_based() {
            return None;
        }
        let target = exercise.target_reps();
        if self.reps_completed >= target {
            return None;
        }
        self.reps_completed += 1;
        Some(Event::RepCounted {
            reps_completed: self.reps_completed,
            target_reps: target,
            at: Utc::now(),
        })
    }

    /// Complete the current set once its rep target is met.
    pub fn complete_set(&mut self) -> Option<Event> {
        if self.phase != Phase::ExerciseActive {
            return None;
        }
        let exercise = self.plan.exercise(self.exercise_index)?;
        if exercise.is_time_based() || self.reps_completed < exercise.target_reps() {
            return None;
        }
        Some(self.finish_set())
    }

    /// Force-complete the current set regardless of reps counted.
    pub fn skip_current_set(&mut self) -> Option<Event> {
        if self.phase != Phase::ExerciseActive {
            return None;
        }
        let exercise = self.plan.exercise(self.exercise_index)?;
        if exercise.is_time_based() {
            return None;
        }
        Some(self.finish_set())
    }

    /// End the current exercise now. Driven internally by timer expiry
    /// and the last set completing, but also available as an explicit
    /// command (ending a countdown early, for example).
    pub fn complete_exercise(&mut self) -> Option<Event> {
        if self.phase != Phase::ExerciseActive {
            return None;
        }
        Some(self.complete_current_exercise())
    }

    /// Resting -> ExerciseActive at the next index.
    pub fn start_next_exercise(&mut self) -> Option<Event> {
        if self.phase != Phase::Resting {
            return None;
        }
        self.rest = None;
        Some(self.advance_to_next())
    }

    /// Skip the rest period; equivalent to the rest expiring at zero.
    pub fn skip_rest(&mut self) -> Option<Event> {
        if self.phase != Phase::Resting {
            return None;
        }
        if let Some(rest) = &mut self.rest {
            rest.skip();
        }
        self.rest = None;
        Some(self.advance_to_next())
    }

    /// ExerciseActive | Resting -> Paused. Countdowns keep their
    /// remaining values untouched.
    pub fn pause(&mut self) -> Option<Event> {
        match self.phase {
            Phase::ExerciseActive => {
                if let Some(timer) = &mut self.timer {
                    timer.pause();
                }
                self.paused_from = Some(PausedFrom::Exercise);
            }
            Phase::Resting => {
                self.paused_from = Some(PausedFrom::Rest);
            }
            _ => return None,
        }
        self.phase = Phase::Paused;
        Some(Event::SessionPaused { at: Utc::now() })
    }

    /// Paused -> whichever phase the pause interrupted, countdowns
    /// resuming from the exact remaining values they held.
    pub fn resume(&mut self) -> Option<Event> {
        if self.phase != Phase::Paused {
            return None;
        }
        match self.paused_from.take() {
            Some(PausedFrom::Exercise) | None => {
                if let Some(timer) = &mut self.timer {
                    timer.resume();
                }
                self.phase = Phase::ExerciseActive;
            }
            Some(PausedFrom::Rest) => {
                self.phase = Phase::Resting;
            }
        }
        Some(Event::SessionResumed { at: Utc::now() })
    }

    /// Advance all live countdowns. Call periodically from one
    /// scheduling source. Idempotent with respect to pause: while
    /// paused, ticks change nothing.
    pub fn tick(&mut self, delta_secs: u32) -> Option<Event> {
        match self.phase {
            Phase::ExerciseActive => {
                if let Some(timer) = &mut self.timer {
                    if timer.tick(delta_secs) {
                        return Some(self.complete_current_exercise());
                    }
                } else {
                    self.exercise_elapsed_secs += u64::from(delta_secs);
                }
                None
            }
            Phase::Resting => {
                if let Some(rest) = &mut self.rest {
                    if rest.tick(delta_secs) {
                        self.rest = None;
                        return Some(self.advance_to_next());
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Snapshot of everything finished so far, for exit-with-save.
    ///
    /// Does not mutate the engine: the caller decides whether to persist
    /// or discard it, then tears the engine down separately. Returns
    /// `None` before the session starts; after full completion, use
    /// [`SessionEngine::completion_data`].
    pub fn partial_completion(&self) -> Option<CompletionData> {
        if self.phase == Phase::NotStarted || self.phase == Phase::Completed {
            return None;
        }
        Some(CompletionData::assemble(
            &self.session_id,
            &self.plan.name,
            &self.plan.workout_kind,
            self.started_at?,
            Utc::now(),
            self.results.clone(),
            false,
        ))
    }

    /// Final summary once the session is complete.
    pub fn completion_data(&self) -> Option<CompletionData> {
        if self.phase != Phase::Completed {
            return None;
        }
        Some(CompletionData::assemble(
            &self.session_id,
            &self.plan.name,
            &self.plan.workout_kind,
            self.started_at?,
            self.ended_at?,
            self.results.clone(),
            self.results.len() == self.plan.len(),
        ))
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Reset per-exercise counters and arm the countdown if the current
    /// exercise is time-based.
    fn arm_current_exercise(&mut self) {
        self.current_set = 1;
        self.reps_completed = 0;
        self.set_reps.clear();
        self.exercise_elapsed_secs = 0;
        self.rest = None;
        self.timer = self
            .plan
            .exercise(self.exercise_index)
            .and_then(ExerciseSpec::duration_secs)
            .map(|secs| {
                let mut timer = ExerciseTimer::new(secs);
                timer.start();
                timer
            });
    }

    /// Record the just-finished set; completes the exercise when it was
    /// the last one.
    fn finish_set(&mut self) -> Event {
        self.set_reps.push(self.reps_completed);
        let finished = self.current_set;
        let total = self.total_sets();
        if finished >= total {
            return self.complete_current_exercise();
        }
        self.current_set += 1;
        self.reps_completed = 0;
        Event::SetCompleted {
            exercise_index: self.exercise_index,
            set: finished,
            total_sets: total,
            at: Utc::now(),
        }
    }

    /// Append the record for the current exercise, then either start the
    /// rest period or finish the session. The append happens before the
    /// phase changes, so callers never observe a transition without its
    /// record.
    fn complete_current_exercise(&mut self) -> Event {
        let index = self.exercise_index;
        // Index is always in bounds outside Completed; guard anyway.
        let Some(spec) = self.plan.exercise(index).cloned() else {
            self.phase = Phase::Completed;
            return Event::SessionCompleted {
                session_id: self.session_id.clone(),
                total_exercises: self.results.len(),
                at: Utc::now(),
            };
        };

        let (elapsed_secs, sets_completed, reps_per_set) = if spec.is_time_based() {
            let elapsed = self
                .timer
                .as_ref()
                .map(|t| u64::from(t.elapsed_secs()))
                .unwrap_or(0);
            (elapsed, 1, Vec::new())
        } else {
            (
                self.exercise_elapsed_secs,
                self.set_reps.len() as u32,
                self.set_reps.clone(),
            )
        };

        self.results.push(CompletedExercise {
            name: spec.name.clone(),
            kind: spec.kind,
            sets_completed,
            reps_per_set,
            elapsed_secs,
            calories: attributed_calories(&spec, elapsed_secs, sets_completed),
        });
        self.timer = None;

        if index + 1 < self.plan.len() {
            let rest_secs = spec.rest_secs_or_default();
            if rest_secs == 0 {
                // Zero-length rest collapses straight into the next exercise.
                return self.advance_to_next();
            }
            self.rest = Some(RestController::start(rest_secs));
            self.phase = Phase::Resting;
            Event::RestStarted {
                after_exercise_index: index,
                rest_secs,
                at: Utc::now(),
            }
        } else {
            self.phase = Phase::Completed;
            self.ended_at = Some(Utc::now());
            Event::SessionCompleted {
                session_id: self.session_id.clone(),
                total_exercises: self.results.len(),
                at: Utc::now(),
            }
        }
    }

    fn advance_to_next(&mut self) -> Event {
        self.exercise_index += 1;
        self.phase = Phase::ExerciseActive;
        self.arm_current_exercise();
        let (name, time_based) = self
            .plan
            .exercise(self.exercise_index)
            .map(|e| (e.name.clone(), e.is_time_based()))
            .unwrap_or_default();
        Event::ExerciseStarted {
            exercise_index: self.exercise_index,
            exercise: name,
            time_based,
            at: Utc::now(),
        }
    }
}
