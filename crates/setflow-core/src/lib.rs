//! # Setflow Core Library
//!
//! This library provides the core business logic for Setflow, a guided
//! workout runner. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI
//! being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: A tick-driven state machine that requires the
//!   caller to periodically invoke `tick()` for countdown progress
//! - **Estimator**: Pure pre-session duration/calorie figures
//! - **Storage**: SQLite-based workout storage and TOML-based configuration
//! - **Video**: Bounded-timeout lookup of exercise guidance videos
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core workout state machine
//! - [`estimate`]: Planning estimates for a [`SessionPlan`]
//! - [`Database`]: Workout and statistics persistence
//! - [`Config`]: Application configuration management
//! - [`VideoLookup`]: Trait for injected video directory collaborators

pub mod completion;
pub mod error;
pub mod estimator;
pub mod events;
pub mod plan;
pub mod session;
pub mod storage;
pub mod video;

pub use completion::{CompletedExercise, CompletionData};
pub use error::{ConfigError, CoreError, DatabaseError, EngineError, ValidationError, VideoError};
pub use estimator::{estimate, Estimate};
pub use events::Event;
pub use plan::{CalorieClass, ExerciseInput, ExerciseKind, ExerciseSpec, PlanInput, SessionPlan};
pub use session::{ExerciseTimer, Phase, RestController, SessionEngine};
pub use storage::{CompletionStore, Config, Database, WorkoutRecord, WorkoutStats};
pub use video::{lookup_or_none, NoVideo, VideoDirectory, VideoLookup, VideoRef};
