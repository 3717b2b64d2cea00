mod engine;
mod rest;
mod timer;

pub use engine::{Phase, SessionEngine};
pub use rest::RestController;
pub use timer::ExerciseTimer;
