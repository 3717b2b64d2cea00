use clap::Subcommand;
use setflow_core::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// All-time workout totals
    Summary,
    /// Recent workouts, newest first
    History {
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Full stored record for one workout
    Show {
        /// Row id as printed by `stats history`
        id: i64,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        StatsAction::Summary => {
            let stats = db.stats_all()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::History { limit } => {
            let records = db.recent_workouts(limit)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        StatsAction::Show { id } => match db.workout_detail(id)? {
            Some(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
            None => return Err(format!("no workout with id {id}").into()),
        },
    }
    Ok(())
}
