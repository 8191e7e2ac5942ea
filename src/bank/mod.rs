mod account;
mod manager;

pub use account::BankAccount;
pub use manager::BankAccountManager;
