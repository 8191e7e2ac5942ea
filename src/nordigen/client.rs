use super::NordigenOperations;
use crate::error::{NordigenApiError, Result};
use crate::models::{AccountDetails, Balance};
use crate::nordigen::types::{AccountDetailsResponse, BalancesResponse, Requisition};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

/// Authenticated handle on the Bank Account Data API.
///
/// Obtained from [`create_nordigen_client`](super::create_nordigen_client).
pub struct NordigenClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl NordigenClient {
    pub(super) fn new(client: Client, base_url: Url, access_token: String) -> Self {
        Self {
            client,
            base_url,
            access_token,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], context: &str) -> Result<T> {
        let url = endpoint(&self.base_url, segments)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        parse_response(response, context).await
    }
}

#[async_trait]
impl NordigenOperations for NordigenClient {
    #[instrument(name = "Fetching requisition", skip_all, fields(requisition_id = %requisition_id))]
    async fn get_requisition(&self, requisition_id: &str) -> Result<Requisition> {
        self.get(
            &["requisitions", requisition_id],
            "Error fetching requisition details",
        )
        .await
    }

    #[instrument(name = "Fetching account details", skip_all, fields(account_id = %account_id))]
    async fn get_account_details(&self, account_id: &str) -> Result<AccountDetails> {
        let response: AccountDetailsResponse = self
            .get(
                &["accounts", account_id, "details"],
                "Error retrieving account details",
            )
            .await?;

        Ok(response.account.into())
    }

    #[instrument(name = "Fetching account balances", skip_all, fields(account_id = %account_id))]
    async fn get_account_balances(&self, account_id: &str) -> Result<Vec<Balance>> {
        let response: BalancesResponse = self
            .get(
                &["accounts", account_id, "balances"],
                "Error retrieving account balances",
            )
            .await?;

        Ok(response.balances.into_iter().map(Into::into).collect())
    }
}

/// Parse the API base URL, making sure relative paths join beneath it
pub(super) fn base_url(raw: &str) -> Result<Url> {
    let raw = match raw.ends_with('/') {
        true => raw.to_string(),
        false => format!("{}/", raw),
    };

    Url::parse(&raw).map_err(|e| NordigenApiError::new(format!("Invalid base URL {}: {}", raw, e)))
}

/// Append `segments` below the base path, each percent-escaped as a single
/// segment, with the trailing slash the API expects
pub(super) fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url> {
    if let Some(segment) = segments
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == "..")
    {
        return Err(NordigenApiError::new(format!(
            "Invalid path segment {:?}",
            segment
        )));
    }

    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| NordigenApiError::new(format!("Base URL {} cannot hold a path", base_url)))?
        .pop_if_empty()
        .extend(segments)
        .push("");

    Ok(url)
}

/// Turn an API response into `T`, or into a [`NordigenApiError`] carrying the
/// status and body when the request was not successful
pub(super) async fn parse_response<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(NordigenApiError::from_api_response(
            context,
            status.as_u16(),
            &body,
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        NordigenApiError::with_response(
            format!("{}: unexpected response: {}", context, e),
            Some(status.as_u16()),
            serde_json::from_str(&body).ok(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let base = base_url(DEFAULT_BASE_URL).unwrap();
        let url = endpoint(&base, &["accounts", "acc-A", "details"]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://bankaccountdata.gocardless.com/api/v2/accounts/acc-A/details/"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let base = base_url("http://localhost:8080/api/v2").unwrap();
        let url = endpoint(&base, &["token", "new"]).unwrap();

        assert_eq!(url.as_str(), "http://localhost:8080/api/v2/token/new/");
    }

    #[test]
    fn test_ids_stay_in_their_segment() {
        let base = base_url(DEFAULT_BASE_URL).unwrap();

        let url = endpoint(&base, &["requisitions", "../accounts/acc-A/details"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://bankaccountdata.gocardless.com/api/v2/requisitions/..%2Faccounts%2Facc-A%2Fdetails/"
        );

        let url = endpoint(&base, &["accounts", "abc?x=1#frag", "balances"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://bankaccountdata.gocardless.com/api/v2/accounts/abc%3Fx=1%23frag/balances/"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_dot_and_empty_ids_are_rejected() {
        let base = base_url(DEFAULT_BASE_URL).unwrap();

        assert!(endpoint(&base, &["requisitions", ".."]).is_err());
        assert!(endpoint(&base, &["requisitions", "."]).is_err());
        assert!(endpoint(&base, &["accounts", "", "details"]).is_err());
    }

    #[tokio::test]
    async fn test_error_response_keeps_status_and_body() {
        let response = http::Response::builder()
            .status(401)
            .body(r#"{"summary":"Invalid token","detail":"Token is invalid or expired","status_code":401}"#)
            .unwrap();

        let err = parse_response::<Requisition>(response.into(), "Error fetching requisition details")
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.response_body().unwrap()["summary"], "Invalid token");
    }

    #[tokio::test]
    async fn test_non_json_error_response() {
        let response = http::Response::builder()
            .status(503)
            .body("Service Unavailable")
            .unwrap();

        let err = parse_response::<Requisition>(response.into(), "Error fetching requisition details")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.response_body(), Some(&serde_json::json!("Service Unavailable")));
    }

    #[tokio::test]
    async fn test_success_with_unexpected_body() {
        let response = http::Response::builder()
            .status(200)
            .body(r#"{"detail":"no id here"}"#)
            .unwrap();

        let err = parse_response::<Requisition>(response.into(), "Error fetching requisition details")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(200));
        assert!(err.message().contains("unexpected response"));
    }

    #[tokio::test]
    async fn test_success_response_is_parsed() {
        let response = http::Response::builder()
            .status(200)
            .body(r#"{"id":"req-123","status":"LN","accounts":["acc-A"]}"#)
            .unwrap();

        let requisition = parse_response::<Requisition>(response.into(), "Error fetching requisition details")
            .await
            .unwrap();

        assert_eq!(requisition.accounts, vec!["acc-A".to_string()]);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(base_url("not a url").is_err());
    }
}
