use clap::Subcommand;
use nordigen_account::config::Config;
use nordigen_account::error::AppResult;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration path
    Paths,
}

impl ShowResource {
    pub async fn execute(&self) -> AppResult<()> {
        match self {
            ShowResource::Paths => show_paths(),
        }
    }
}

fn show_paths() -> AppResult<()> {
    let config_path = Config::config_file()?;

    info!(path = ?config_path, "Config path");

    Ok(())
}
