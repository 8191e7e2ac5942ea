mod auth;
mod client;
pub mod types;

pub use auth::{NewRefreshToken, create_nordigen_client};
pub use client::NordigenClient;

use crate::error::Result;
use crate::models::{AccountDetails, Balance};
use crate::nordigen::types::Requisition;

use async_trait::async_trait;

/// Calls made against the API once a client holds a valid access token
#[async_trait]
pub trait NordigenOperations {
    async fn get_requisition(&self, requisition_id: &str) -> Result<Requisition>;

    async fn get_account_details(&self, account_id: &str) -> Result<AccountDetails>;

    async fn get_account_balances(&self, account_id: &str) -> Result<Vec<Balance>>;
}
