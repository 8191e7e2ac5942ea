use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// https://developer.gocardless.com/bank-account-data/quick-start-guide
#[derive(Debug, Serialize)]
pub(super) struct NewTokenRequest<'a> {
    pub(super) secret_id: &'a str,
    pub(super) secret_key: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshTokenRequest<'a> {
    pub(super) refresh: &'a str,
}

/// Response of `POST token/new/`. Expiry values are in seconds.
#[derive(Debug, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub access_expires: i64,
    pub refresh: String,
    pub refresh_expires: i64,
}

/// Response of `POST token/refresh/`
#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access: String,
    pub access_expires: i64,
}

// https://developer.gocardless.com/bank-account-data/endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requisition {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub institution_id: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub accounts: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AccountDetailsResponse {
    #[serde(default)]
    pub(super) account: NordigenAccountDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NordigenAccountDetails {
    pub name: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
    // Also returned, unused here:
    // pub resource_id: String,
    // pub iban: String,
    // pub owner_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct BalancesResponse {
    #[serde(default)]
    pub(super) balances: Vec<NordigenBalance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NordigenBalance {
    pub balance_type: Option<String>,
    #[serde(default)]
    pub balance_amount: NordigenAmount,
}

/// Amounts are sent as decimal strings, e.g. `"657.49"`
#[derive(Debug, Default, Deserialize)]
pub struct NordigenAmount {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}
