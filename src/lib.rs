//! Convenience layer over the Nordigen / GoCardless Bank Account Data API.
//!
//! ```rust,no_run
//! # use nordigen_account::{BankAccountManager, NordigenConfig, create_nordigen_client};
//! # async fn run() -> nordigen_account::error::Result<()> {
//! let config = NordigenConfig::new("secret-id", "secret-key");
//! let (client, new_refresh_token) = create_nordigen_client(&config).await?;
//! if let Some(token) = new_refresh_token {
//!     // store token.token somewhere safe, it is valid until token.expires_at
//! }
//!
//! let manager = BankAccountManager::new(&client, "requisition-id", true).await?;
//! for account in manager.accounts() {
//!     println!("{} {:?}", account.account_id(), account.balances());
//! }
//! # Ok(())
//! # }
//! ```

pub mod bank;
pub mod config;
pub mod error;
pub mod models;
pub mod nordigen;

pub use bank::{BankAccount, BankAccountManager};
pub use config::NordigenConfig;
pub use error::NordigenApiError;
pub use nordigen::{NordigenClient, NordigenOperations, create_nordigen_client};
