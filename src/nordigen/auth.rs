use super::client::{base_url, endpoint, parse_response};
use crate::config::NordigenConfig;
use crate::error::{NordigenApiError, Result};
use crate::nordigen::NordigenClient;
use crate::nordigen::types::{AccessToken, NewTokenRequest, RefreshTokenRequest, TokenPair};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

/// A refresh token generated while creating a client.
///
/// It replaces whatever token the caller supplied and should be stored for
/// the next session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl NewRefreshToken {
    fn from_token_pair(pair: &TokenPair) -> Result<Self> {
        let expires_at = TimeDelta::try_seconds(pair.refresh_expires)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                NordigenApiError::new(format!(
                    "Malformed API response: refresh_expires {} is out of range",
                    pair.refresh_expires
                ))
            })?;

        Ok(Self {
            token: pair.refresh.clone(),
            expires_at,
        })
    }
}

#[async_trait]
pub(super) trait TokenOperations {
    /// Request a fresh access/refresh pair with the secret ID and key
    async fn generate_token(&self) -> Result<TokenPair>;

    /// Trade a refresh token for a new access token
    async fn exchange_token(&self, refresh_token: &str) -> Result<AccessToken>;
}

pub(super) struct NordigenAuth {
    http_client: Client,
    base_url: Url,
    secret_id: String,
    secret_key: String,
}

impl NordigenAuth {
    pub(super) fn new(config: &NordigenConfig) -> Result<Self> {
        if config.secret_id.is_empty() {
            return Err(NordigenApiError::new("secret_id must not be empty"));
        }
        if config.secret_key.is_empty() {
            return Err(NordigenApiError::new("secret_key must not be empty"));
        }

        let http_client = reqwest::ClientBuilder::new().build()?;

        Ok(Self {
            http_client,
            base_url: base_url(&config.base_url)?,
            secret_id: config.secret_id.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    fn into_client(self, access_token: String) -> NordigenClient {
        NordigenClient::new(self.http_client, self.base_url, access_token)
    }
}

#[async_trait]
impl TokenOperations for NordigenAuth {
    #[instrument(name = "Generating token pair", skip_all)]
    async fn generate_token(&self) -> Result<TokenPair> {
        let request = NewTokenRequest {
            secret_id: &self.secret_id,
            secret_key: &self.secret_key,
        };

        let response = self
            .http_client
            .post(endpoint(&self.base_url, &["token", "new"])?)
            .json(&request)
            .send()
            .await?;

        parse_response(response, "Error generating token").await
    }

    #[instrument(name = "Exchanging refresh token", skip_all)]
    async fn exchange_token(&self, refresh_token: &str) -> Result<AccessToken> {
        let request = RefreshTokenRequest {
            refresh: refresh_token,
        };

        let response = self
            .http_client
            .post(endpoint(&self.base_url, &["token", "refresh"])?)
            .json(&request)
            .send()
            .await?;

        parse_response(response, "Error exchanging token").await
    }
}

/// Obtain an access token, reusing `refresh_token` when the API still
/// accepts it.
///
/// A rejected (401) refresh token is replaced by a newly generated pair, once.
/// Returns the access token and the new refresh token if one was generated.
async fn negotiate_access_token<A>(
    auth: &A,
    refresh_token: Option<&str>,
) -> Result<(String, Option<NewRefreshToken>)>
where
    A: TokenOperations + Sync,
{
    let Some(refresh_token) = refresh_token.filter(|token| !token.is_empty()) else {
        debug!("No refresh token supplied, generating a new token pair");
        let pair = auth.generate_token().await?;
        let new_refresh_token = NewRefreshToken::from_token_pair(&pair)?;
        return Ok((pair.access, Some(new_refresh_token)));
    };

    match auth.exchange_token(refresh_token).await {
        Ok(token) => {
            debug!("Refresh token accepted");
            Ok((token.access, None))
        }
        Err(e) if e.is_unauthorized() => {
            debug!("Refresh token rejected ({}), generating a new token pair", e);
            let pair = auth.generate_token().await?;
            let new_refresh_token = NewRefreshToken::from_token_pair(&pair)?;
            Ok((pair.access, Some(new_refresh_token)))
        }
        Err(e) => Err(e),
    }
}

/// Create an authenticated [`NordigenClient`].
///
/// Uses `config.refresh_token` when set, regenerating it if it has expired.
/// The second element of the result is `Some` whenever a new refresh token was
/// generated; nothing is persisted here.
#[instrument(name = "Authenticating to Nordigen", skip_all)]
pub async fn create_nordigen_client(
    config: &NordigenConfig,
) -> Result<(NordigenClient, Option<NewRefreshToken>)> {
    let auth = NordigenAuth::new(config)?;
    let (access_token, new_refresh_token) =
        negotiate_access_token(&auth, config.refresh_token.as_deref()).await?;

    Ok((auth.into_client(access_token), new_refresh_token))
}
