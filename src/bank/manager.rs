use super::BankAccount;
use crate::error::{NordigenApiError, Result};
use crate::nordigen::NordigenOperations;
use crate::nordigen::types::Requisition;
use std::fmt;
use tracing::{debug, instrument};

// Requisition status once the end user agreement has run out
const STATUS_EXPIRED: &str = "EX";

const STATUS_CODE_EXPIRED: u16 = 428;
const STATUS_CODE_NO_ACCOUNTS: u16 = 410;

/// The accounts linked through one requisition.
///
/// The account list is taken from the requisition once, at construction,
/// and keeps the requisition's ordering.
pub struct BankAccountManager<'c, C> {
    requisition_id: String,
    institution_id: Option<String>,
    reference: Option<String>,
    accounts: Vec<BankAccount<'c, C>>,
}

impl<'c, C> BankAccountManager<'c, C>
where
    C: NordigenOperations + Sync,
{
    /// Look up the requisition and wrap each linked account.
    ///
    /// With `fetch_data` set, details and balances of every account are
    /// fetched before returning. Any failure aborts construction.
    #[instrument(name = "Loading requisition accounts", skip_all, fields(requisition_id = %requisition_id))]
    pub async fn new(client: &'c C, requisition_id: &str, fetch_data: bool) -> Result<Self> {
        let requisition = client.get_requisition(requisition_id).await?;
        check_requisition(&requisition)?;

        let mut accounts = Vec::with_capacity(requisition.accounts.len());
        for account_id in &requisition.accounts {
            let account = match fetch_data {
                true => BankAccount::with_data(client, account_id.as_str()).await?,
                false => BankAccount::new(client, account_id.as_str()),
            };
            accounts.push(account);
        }

        debug!(count = accounts.len(), "Accounts loaded");

        Ok(Self {
            requisition_id: requisition_id.to_string(),
            institution_id: requisition.institution_id,
            reference: requisition.reference,
            accounts,
        })
    }
}

impl<'c, C> BankAccountManager<'c, C> {
    pub fn requisition_id(&self) -> &str {
        &self.requisition_id
    }

    pub fn institution_id(&self) -> Option<&str> {
        self.institution_id.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn accounts(&self) -> &[BankAccount<'c, C>] {
        &self.accounts
    }

    /// Mutable access for refreshing account data; the set of accounts is fixed
    pub fn accounts_mut(&mut self) -> &mut [BankAccount<'c, C>] {
        &mut self.accounts
    }
}

fn check_requisition(requisition: &Requisition) -> Result<()> {
    if requisition.status == STATUS_EXPIRED {
        return Err(NordigenApiError::with_response(
            "Access to accounts has expired as set in End User Agreement. Connect the accounts again with a new requisition.",
            Some(STATUS_CODE_EXPIRED),
            serde_json::to_value(requisition).ok(),
        ));
    }

    if requisition.accounts.is_empty() {
        return Err(NordigenApiError::with_response(
            "No accounts found for the given requisition ID. Ensure that bank authorization has been completed.",
            Some(STATUS_CODE_NO_ACCOUNTS),
            serde_json::to_value(requisition).ok(),
        ));
    }

    Ok(())
}

impl<C> fmt::Debug for BankAccountManager<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankAccountManager")
            .field("requisition_id", &self.requisition_id)
            .field("institution_id", &self.institution_id)
            .field("reference", &self.reference)
            .field("accounts", &self.accounts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::mocks::{MockNordigenClient, mock_requisition};
    use crate::models::account::test_helpers::mock_details;
    use crate::models::balance::test_helpers::mock_balance;
    use rust_decimal::prelude::dec;

    fn client_with_accounts(account_ids: &[&str]) -> MockNordigenClient {
        let client = MockNordigenClient::with_requisition(mock_requisition("req-123", account_ids));
        for account_id in account_ids {
            client.set_details(account_id, mock_details(&format!("Account {}", account_id)));
            client.set_balances(account_id, vec![mock_balance("expected", dec!(10.00))]);
        }
        client
    }

    #[tokio::test]
    async fn test_accounts_follow_requisition_order() {
        let client = client_with_accounts(&["acc-A", "acc-B"]);

        let manager = BankAccountManager::new(&client, "req-123", false)
            .await
            .unwrap();

        let ids: Vec<&str> = manager.accounts().iter().map(|a| a.account_id()).collect();
        assert_eq!(ids, vec!["acc-A", "acc-B"]);
        assert_eq!(manager.requisition_id(), "req-123");
        assert_eq!(manager.institution_id(), Some("SANDBOXFINANCE_SFIN0000"));
        assert_eq!(manager.reference(), Some("ref-req-123"));
    }

    #[tokio::test]
    async fn test_without_fetch_data_accounts_are_empty() {
        let client = client_with_accounts(&["acc-A", "acc-B", "acc-C"]);

        let manager = BankAccountManager::new(&client, "req-123", false)
            .await
            .unwrap();

        assert_eq!(manager.accounts().len(), 3);
        for account in manager.accounts() {
            assert!(account.details().is_none());
            assert!(account.balances().is_none());
        }
        assert_eq!(client.calls(), vec!["requisition:req-123"]);
    }

    #[tokio::test]
    async fn test_with_fetch_data_accounts_are_populated() {
        let client = client_with_accounts(&["acc-A", "acc-B"]);

        let manager = BankAccountManager::new(&client, "req-123", true)
            .await
            .unwrap();

        for account in manager.accounts() {
            let details = account.details().unwrap();
            assert_eq!(details.name, format!("Account {}", account.account_id()));
            assert_eq!(
                account.balances(),
                Some(&[mock_balance("expected", dec!(10.00))][..])
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_construction() {
        let client = client_with_accounts(&["acc-A", "acc-B"]);
        client.balances.lock().unwrap().remove("acc-B");

        let err = BankAccountManager::new(&client, "req-123", true)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_unknown_requisition() {
        let client = client_with_accounts(&["acc-A"]);

        let err = BankAccountManager::new(&client, "req-missing", false)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(404));
        assert!(err.response_body().is_some());
    }

    #[tokio::test]
    async fn test_expired_requisition() {
        let mut requisition = mock_requisition("req-123", &["acc-A"]);
        requisition.status = "EX".to_string();
        let client = MockNordigenClient::with_requisition(requisition.clone());

        let err = BankAccountManager::new(&client, "req-123", false)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(428));
        assert_eq!(
            err.response_body(),
            Some(&serde_json::to_value(&requisition).unwrap())
        );
    }

    #[tokio::test]
    async fn test_requisition_without_accounts() {
        let client = MockNordigenClient::with_requisition(mock_requisition("req-123", &[]));

        let err = BankAccountManager::new(&client, "req-123", false)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(410));
    }

    #[tokio::test]
    async fn test_accounts_can_be_refreshed_later() {
        let client = client_with_accounts(&["acc-A"]);
        let mut manager = BankAccountManager::new(&client, "req-123", false)
            .await
            .unwrap();

        for account in manager.accounts_mut() {
            account.update().await.unwrap();
        }

        assert!(manager.accounts()[0].details().is_some());
    }
}
