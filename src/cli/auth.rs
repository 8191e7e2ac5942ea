use nordigen_account::config::{Config, NordigenConfig};
use nordigen_account::error::AppResult;
use nordigen_account::nordigen::{NewRefreshToken, NordigenClient, create_nordigen_client};
use tracing::{info, warn};

pub async fn execute(refresh_token: Option<String>) -> AppResult<()> {
    let config = Config::load()?;
    let _client = authenticate(&config.nordigen, refresh_token).await?;

    info!("Nordigen authentication verified");

    Ok(())
}

/// Build a client, preferring a refresh token given on the command line
pub(super) async fn authenticate(
    config: &NordigenConfig,
    refresh_token: Option<String>,
) -> AppResult<NordigenClient> {
    let config = match refresh_token {
        Some(token) => config.clone().with_refresh_token(Some(token)),
        None => config.clone(),
    };

    let (client, new_refresh_token) = create_nordigen_client(&config).await?;
    match new_refresh_token {
        Some(token) => report_new_refresh_token(&token),
        None => info!("Existing refresh token accepted"),
    }

    Ok(client)
}

fn report_new_refresh_token(token: &NewRefreshToken) {
    warn!(
        expires_at = %token.expires_at.format("%Y-%m-%d"),
        "Generated a new refresh token; set refresh_token in the config file to reuse it"
    );
    println!("{}", token.token);
}
