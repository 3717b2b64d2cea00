use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "setflow", version, about = "Setflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan inspection and estimates
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Live session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Workout statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
