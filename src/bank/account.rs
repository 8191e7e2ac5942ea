use crate::error::Result;
use crate::models::{AccountDetails, Balance};
use crate::nordigen::NordigenOperations;
use std::fmt;
use tracing::{debug, instrument};

/// One account linked through a requisition.
///
/// `details` and `balances` stay `None` until fetched. Each successful update
/// replaces the previous value wholesale; a failed one leaves it untouched.
pub struct BankAccount<'c, C> {
    client: &'c C,
    account_id: String,
    details: Option<AccountDetails>,
    balances: Option<Vec<Balance>>,
}

impl<'c, C> BankAccount<'c, C>
where
    C: NordigenOperations + Sync,
{
    pub fn new(client: &'c C, account_id: impl Into<String>) -> Self {
        Self {
            client,
            account_id: account_id.into(),
            details: None,
            balances: None,
        }
    }

    /// Create the account and fetch both its details and balances
    pub async fn with_data(client: &'c C, account_id: impl Into<String>) -> Result<Self> {
        let mut account = Self::new(client, account_id);
        account.update().await?;
        Ok(account)
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn details(&self) -> Option<&AccountDetails> {
        self.details.as_ref()
    }

    pub fn balances(&self) -> Option<&[Balance]> {
        self.balances.as_deref()
    }

    #[instrument(name = "Updating account details", skip_all, fields(account_id = %self.account_id))]
    pub async fn update_account_data(&mut self) -> Result<()> {
        let details = self.client.get_account_details(&self.account_id).await?;
        self.details = Some(details);

        Ok(())
    }

    #[instrument(name = "Updating account balances", skip_all, fields(account_id = %self.account_id))]
    pub async fn update_balance_data(&mut self) -> Result<()> {
        let balances = self.client.get_account_balances(&self.account_id).await?;
        debug!(count = balances.len(), "Balances fetched");
        self.balances = Some(balances);

        Ok(())
    }

    /// Refresh details, then balances
    pub async fn update(&mut self) -> Result<()> {
        self.update_account_data().await?;
        self.update_balance_data().await
    }
}

impl<C> fmt::Debug for BankAccount<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankAccount")
            .field("account_id", &self.account_id)
            .field("details", &self.details)
            .field("balances", &self.balances)
            .finish()
    }
}
