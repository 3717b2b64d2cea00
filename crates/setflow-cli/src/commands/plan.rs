use std::path::PathBuf;

use clap::Subcommand;
use setflow_core::estimate;

use super::load_plan;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Estimate total duration and calorie burn for a plan file
    Estimate {
        /// Path to a JSON plan file
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the normalized plan as JSON
    Show {
        #[arg(long)]
        file: PathBuf,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Estimate { file } => {
            let plan = load_plan(&file)?;
            let est = estimate(&plan);
            println!("{}", serde_json::to_string_pretty(&est)?);
        }
        PlanAction::Show { file } => {
            let plan = load_plan(&file)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }
    Ok(())
}
