//! Synthetic account records from the banking backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An account as provisioned by the remote banking backend.
///
/// `liability` marks a fully provisioned, ready account; the readiness poller
/// waits for at least one of these to appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticAccount {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub liability: bool,
    #[serde(default)]
    pub net_usd_available_balance: Option<Decimal>,
}

impl SyntheticAccount {
    pub fn is_ready(&self) -> bool {
        self.liability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn liability_flag_marks_ready() {
        let account = SyntheticAccount {
            uid: "acct-1".to_string(),
            name: "Spending".to_string(),
            liability: true,
            net_usd_available_balance: Some(dec!(125.50)),
        };
        assert!(account.is_ready());
    }

    #[test]
    fn balance_decodes_from_string() {
        let account: SyntheticAccount = serde_json::from_value(serde_json::json!({
            "uid": "acct-2",
            "name": "Savings",
            "liability": false,
            "net_usd_available_balance": "42.00"
        }))
        .unwrap();
        assert!(!account.is_ready());
        assert_eq!(account.net_usd_available_balance, Some(dec!(42.00)));
    }
}
