mod accounts;
mod auth;
mod show;

use clap::{Parser, Subcommand};
use nordigen_account::error::AppResult;

pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "nordigen-account")]
#[command(about = "Inspect bank accounts linked through the Nordigen (GoCardless) Bank Account Data API", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> AppResult<()> {
        match &self.command {
            Commands::Auth { refresh_token } => auth::execute(refresh_token.clone()).await,
            Commands::Accounts {
                requisition,
                refresh_token,
                no_fetch,
            } => accounts::execute(requisition.clone(), refresh_token.clone(), *no_fetch).await,
            Commands::Show { resource } => resource.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify credentials and report a newly generated refresh token
    Auth {
        /// Refresh token to use instead of the one in the config file
        #[arg(long)]
        refresh_token: Option<String>,
    },
    /// List the accounts linked to a requisition with their balances
    Accounts {
        /// Requisition ID, defaults to `requisition_id` from the config file
        #[arg(long)]
        requisition: Option<String>,

        /// Refresh token to use instead of the one in the config file
        #[arg(long)]
        refresh_token: Option<String>,

        /// Only list account IDs, without fetching details or balances
        #[arg(long)]
        no_fetch: bool,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}
