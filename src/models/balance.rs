use super::UNKNOWN;
use crate::nordigen::types::NordigenBalance;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One reported balance, e.g. the booked or available amount in one currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub balance_type: String,
    pub currency: String,
    pub amount: Decimal,
}

impl From<NordigenBalance> for Balance {
    fn from(n: NordigenBalance) -> Self {
        Balance {
            balance_type: n.balance_type.unwrap_or_else(|| UNKNOWN.to_string()),
            currency: n
                .balance_amount
                .currency
                .unwrap_or_else(|| UNKNOWN.to_string()),
            amount: n.balance_amount.amount.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub(crate) fn mock_balance(balance_type: &str, amount: Decimal) -> Balance {
        Balance {
            balance_type: balance_type.to_string(),
            currency: "EUR".to_string(),
            amount,
        }
    }
}
