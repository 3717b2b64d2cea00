use clap::Subcommand;
use setflow_core::storage::data_dir;
use setflow_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Print the data directory path
    Path,
    /// Set the user id attached to persisted workouts
    SetUser { id: String },
    /// Set (or clear) the video directory base URL
    SetVideoUrl {
        /// Omit to clear and run in "no video" mode
        url: Option<String>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", data_dir()?.display());
        }
        ConfigAction::SetUser { id } => {
            let mut config = Config::load()?;
            config.user.id = id;
            config.save()?;
            println!("user id updated");
        }
        ConfigAction::SetVideoUrl { url } => {
            let mut config = Config::load()?;
            config.video.base_url = url;
            config.save()?;
            println!("video directory updated");
        }
    }
    Ok(())
}
