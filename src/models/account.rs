use super::UNKNOWN;
use crate::nordigen::types::NordigenAccountDetails;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountDetails {
    pub name: String,
    pub status: String,
    pub currency: String,
}

impl From<NordigenAccountDetails> for AccountDetails {
    fn from(n: NordigenAccountDetails) -> Self {
        AccountDetails {
            name: n.name.unwrap_or_else(|| UNKNOWN.to_string()),
            status: n.status.unwrap_or_else(|| UNKNOWN.to_string()),
            currency: n.currency.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub(crate) fn mock_details(name: &str) -> AccountDetails {
        AccountDetails {
            name: name.to_string(),
            status: "enabled".to_string(),
            currency: "EUR".to_string(),
        }
    }
}
