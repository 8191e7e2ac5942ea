pub mod account;
pub mod balance;

pub use account::AccountDetails;
pub use balance::Balance;

/// Stand-in for fields the bank left out of a response
pub(crate) const UNKNOWN: &str = "Unknown";
