pub mod config;
pub mod plan;
pub mod session;
pub mod stats;

use std::path::Path;

use setflow_core::{PlanInput, SessionPlan};

/// Load and normalize a JSON plan file.
pub fn load_plan(path: &Path) -> Result<SessionPlan, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let input: PlanInput = serde_json::from_str(&raw)?;
    Ok(input.into_plan()?)
}
