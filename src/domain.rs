use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed catalog of expense categories, in menu display order.
pub const EXPENSE_CATEGORIES: [&str; 14] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Shopping",
    "Healthcare",
    "Travel",
    "Education",
    "Gifts",
    "Hobbies",
    "Rent",
    "Subscriptions",
    "Charity",
    "Personal Care",
];

/// Resolves a user-supplied category to its canonical catalog spelling.
pub fn resolve_category(raw: &str) -> Option<&'static str> {
    EXPENSE_CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(raw.trim()))
        .copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Wallet,
    Card,
}

impl AccountKind {
    /// Synthetic category label logged for a plain deposit into this kind.
    pub fn deposit_label(self) -> &'static str {
        match self {
            AccountKind::Wallet => "Deposit",
            AccountKind::Card => "Card Deposit",
        }
    }

    /// Synthetic category label logged for a plain withdrawal from this kind.
    pub fn withdrawal_label(self) -> &'static str {
        match self {
            AccountKind::Wallet => "Withdrawal",
            AccountKind::Card => "Card Withdrawal",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Wallet => write!(f, "wallet"),
            AccountKind::Card => write!(f, "card"),
        }
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wallet" => Ok(AccountKind::Wallet),
            "card" => Ok(AccountKind::Card),
            other => Err(format!(
                "unknown account kind: {other} (expected wallet or card)"
            )),
        }
    }
}

/// A named balance holder. Wallets and cards behave identically; the kind
/// only matters for identity and the labels their movements produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    name: String,
    balance: Decimal,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: Decimal::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn deposit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Withdraws `amount` if covered by the balance. On failure the balance
    /// is left untouched.
    pub fn withdraw(&mut self, amount: Decimal) -> bool {
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }
}

/// Immutable signed monetary event. Positive amounts are inflows, negative
/// amounts are outflows. Not linked back to the account it affected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    amount: Decimal,
    category: String,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Stamps the transaction with the current wall-clock time.
    pub fn new(amount: Decimal, category: impl Into<String>) -> Self {
        Self::with_timestamp(amount, category, Utc::now())
    }

    pub fn with_timestamp(
        amount: Decimal,
        category: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            category: category.into(),
            timestamp,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        raw.parse().expect("decimal literal")
    }

    #[test]
    fn deposit_increases_balance_by_exactly_the_amount() {
        let mut acct = Account::new("1");
        acct.deposit(dec("100"));
        acct.deposit(dec("0.50"));
        assert_eq!(acct.balance(), dec("100.50"));
    }

    #[test]
    fn withdraw_succeeds_iff_covered_and_leaves_balance_on_failure() {
        let mut acct = Account::new("1");
        acct.deposit(dec("100"));

        assert!(!acct.withdraw(dec("150")));
        assert_eq!(acct.balance(), dec("100"));

        assert!(acct.withdraw(dec("100")));
        assert_eq!(acct.balance(), Decimal::ZERO);
    }

    #[test]
    fn category_resolution_is_case_insensitive_and_canonical() {
        assert_eq!(resolve_category("food"), Some("Food"));
        assert_eq!(resolve_category("  personal care "), Some("Personal Care"));
        assert_eq!(resolve_category("Groceries"), None);
    }

    #[test]
    fn kind_labels_match_the_movement_kind() {
        assert_eq!(AccountKind::Wallet.deposit_label(), "Deposit");
        assert_eq!(AccountKind::Wallet.withdrawal_label(), "Withdrawal");
        assert_eq!(AccountKind::Card.deposit_label(), "Card Deposit");
        assert_eq!(AccountKind::Card.withdrawal_label(), "Card Withdrawal");
    }
}
