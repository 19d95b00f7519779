use crate::domain::{Account, AccountKind, Transaction, resolve_category};
use crate::errors::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

/// Aggregate owner of all accounts and the transaction log.
///
/// Wallets and cards live in separate ordered collections; the log is
/// append-only and insertion-ordered. Callers never get mutable access to
/// the collections, only to the operations below.
#[derive(Debug, Default)]
pub struct Ledger {
    wallets: Vec<Account>,
    cards: Vec<Account>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, kind: AccountKind) -> &Vec<Account> {
        match kind {
            AccountKind::Wallet => &self.wallets,
            AccountKind::Card => &self.cards,
        }
    }

    fn collection_mut(&mut self, kind: AccountKind) -> &mut Vec<Account> {
        match kind {
            AccountKind::Wallet => &mut self.wallets,
            AccountKind::Card => &mut self.cards,
        }
    }

    /// Appends a fresh zero-balance account. Duplicate names are permitted;
    /// lookups resolve to the first match in insertion order.
    pub fn add_account(&mut self, kind: AccountKind, name: impl Into<String>) {
        let account = Account::new(name);
        debug!(%kind, name = account.name(), "account added");
        self.collection_mut(kind).push(account);
    }

    /// Removes every account of `kind` whose name matches, returning how
    /// many were removed.
    pub fn remove_accounts(&mut self, kind: AccountKind, name: &str) -> usize {
        let accounts = self.collection_mut(kind);
        let before = accounts.len();
        accounts.retain(|a| a.name() != name);
        let removed = before - accounts.len();
        debug!(%kind, name, removed, "account removal");
        removed
    }

    /// First account of `kind` with a matching name, in insertion order.
    pub fn find_account(&self, kind: AccountKind, name: &str) -> Option<&Account> {
        self.collection(kind).iter().find(|a| a.name() == name)
    }

    fn find_account_mut(&mut self, kind: AccountKind, name: &str) -> Option<&mut Account> {
        self.collection_mut(kind)
            .iter_mut()
            .find(|a| a.name() == name)
    }

    pub fn accounts(&self, kind: AccountKind) -> &[Account] {
        self.collection(kind)
    }

    /// Appends to the transaction log. Never fails; the log is append-only.
    pub fn record(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Every transaction with `start <= timestamp <= end`, inclusive both
    /// ends, in insertion order.
    pub fn transactions_in_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.timestamp() >= start && t.timestamp() <= end)
            .cloned()
            .collect()
    }

    /// Deposits into the named account and logs the movement under the
    /// kind's deposit label. Returns the new balance.
    pub fn deposit(
        &mut self,
        kind: AccountKind,
        name: &str,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let account = self
            .find_account_mut(kind, name)
            .ok_or_else(|| LedgerError::AccountNotFound {
                kind,
                name: name.to_string(),
            })?;

        account.deposit(amount);
        let balance = account.balance();
        let tx = Transaction::new(amount, kind.deposit_label());
        debug!(%kind, name, %amount, %balance, id = %tx.id(), "deposit");
        self.record(tx);
        Ok(balance)
    }

    /// Withdraws from the named account and logs the negated amount under
    /// the kind's withdrawal label. On insufficient balance nothing is
    /// logged and the balance is untouched.
    pub fn withdraw(
        &mut self,
        kind: AccountKind,
        name: &str,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let account = self
            .find_account_mut(kind, name)
            .ok_or_else(|| LedgerError::AccountNotFound {
                kind,
                name: name.to_string(),
            })?;

        if !account.withdraw(amount) {
            return Err(LedgerError::InsufficientBalance {
                kind,
                name: name.to_string(),
                balance: account.balance(),
                requested: amount,
            });
        }

        let balance = account.balance();
        let tx = Transaction::new(-amount, kind.withdrawal_label());
        debug!(%kind, name, %amount, %balance, id = %tx.id(), "withdrawal");
        self.record(tx);
        Ok(balance)
    }

    /// Withdraws `amount` as a categorized expense. The category must be one
    /// of the fixed catalog; it is stored in canonical spelling.
    pub fn record_expense(
        &mut self,
        kind: AccountKind,
        name: &str,
        amount: Decimal,
        category: &str,
    ) -> Result<Decimal, LedgerError> {
        let category = resolve_category(category)
            .ok_or_else(|| LedgerError::UnknownCategory(category.to_string()))?;

        let account = self
            .find_account_mut(kind, name)
            .ok_or_else(|| LedgerError::AccountNotFound {
                kind,
                name: name.to_string(),
            })?;

        if !account.withdraw(amount) {
            return Err(LedgerError::InsufficientBalance {
                kind,
                name: name.to_string(),
                balance: account.balance(),
                requested: amount,
            });
        }

        let balance = account.balance();
        let tx = Transaction::new(-amount, category);
        debug!(%kind, name, %amount, category, %balance, id = %tx.id(), "expense");
        self.record(tx);
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn dec(raw: &str) -> Decimal {
        raw.parse().expect("decimal literal")
    }

    #[test]
    fn deposit_logs_a_positive_transaction_with_the_kind_label() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Wallet, "1");

        let balance = ledger.deposit(AccountKind::Wallet, "1", dec("100")).unwrap();
        assert_eq!(balance, dec("100"));

        let log = ledger.transactions();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].amount(), dec("100"));
        assert_eq!(log[0].category(), "Deposit");
    }

    #[test]
    fn failed_withdrawal_leaves_balance_and_log_untouched() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Wallet, "1");
        ledger.deposit(AccountKind::Wallet, "1", dec("100")).unwrap();

        let err = ledger
            .withdraw(AccountKind::Wallet, "1", dec("150"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(
            ledger.find_account(AccountKind::Wallet, "1").unwrap().balance(),
            dec("100")
        );
        assert_eq!(ledger.transactions().len(), 1);

        let balance = ledger
            .withdraw(AccountKind::Wallet, "1", dec("100"))
            .unwrap();
        assert_eq!(balance, Decimal::ZERO);
        let log = ledger.transactions();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].amount(), dec("-100"));
        assert_eq!(log[1].category(), "Withdrawal");
    }

    #[test]
    fn card_expense_withdraws_and_logs_the_canonical_category() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Card, "1");
        ledger.deposit(AccountKind::Card, "1", dec("50")).unwrap();

        let balance = ledger
            .record_expense(AccountKind::Card, "1", dec("20"), "food")
            .unwrap();
        assert_eq!(balance, dec("30"));

        let last = ledger.transactions().last().unwrap();
        assert_eq!(last.amount(), dec("-20"));
        assert_eq!(last.category(), "Food");
    }

    #[test]
    fn expense_rejects_unknown_categories_before_touching_the_account() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Wallet, "1");
        ledger.deposit(AccountKind::Wallet, "1", dec("50")).unwrap();

        let err = ledger
            .record_expense(AccountKind::Wallet, "1", dec("20"), "Groceries")
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownCategory(_)));
        assert_eq!(
            ledger.find_account(AccountKind::Wallet, "1").unwrap().balance(),
            dec("50")
        );
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn operations_on_missing_accounts_report_not_found() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Wallet, "1");

        let err = ledger
            .deposit(AccountKind::Card, "1", dec("10"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound { .. }));
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn duplicate_names_are_permitted_and_find_returns_the_first() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Wallet, "spare");
        ledger.add_account(AccountKind::Wallet, "spare");
        ledger.deposit(AccountKind::Wallet, "spare", dec("25")).unwrap();

        let accounts = ledger.accounts(AccountKind::Wallet);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].balance(), dec("25"));
        assert_eq!(accounts[1].balance(), Decimal::ZERO);
    }

    #[test]
    fn listing_accounts_is_read_only_and_repeatable() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Wallet, "a");
        ledger.add_account(AccountKind::Wallet, "b");

        let snapshot = |l: &Ledger| -> Vec<(String, Decimal)> {
            l.accounts(AccountKind::Wallet)
                .iter()
                .map(|a| (a.name().to_string(), a.balance()))
                .collect()
        };
        assert_eq!(snapshot(&ledger), snapshot(&ledger));
    }

    #[test]
    fn remove_deletes_every_matching_account_of_that_kind() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Wallet, "spare");
        ledger.add_account(AccountKind::Wallet, "spare");
        ledger.add_account(AccountKind::Wallet, "main");
        ledger.add_account(AccountKind::Card, "spare");

        assert_eq!(ledger.remove_accounts(AccountKind::Wallet, "spare"), 2);
        assert_eq!(ledger.remove_accounts(AccountKind::Wallet, "spare"), 0);
        assert_eq!(ledger.accounts(AccountKind::Wallet).len(), 1);
        assert_eq!(ledger.accounts(AccountKind::Card).len(), 1);
    }

    #[test]
    fn removing_accounts_keeps_their_historical_transactions() {
        let mut ledger = Ledger::new();
        ledger.add_account(AccountKind::Wallet, "1");
        ledger.deposit(AccountKind::Wallet, "1", dec("100")).unwrap();

        ledger.remove_accounts(AccountKind::Wallet, "1");
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn period_filter_is_inclusive_on_both_ends_and_keeps_order() {
        let mut ledger = Ledger::new();
        let base = Utc::now();

        ledger.record(Transaction::with_timestamp(
            dec("1"),
            "Deposit",
            base - Duration::days(3),
        ));
        ledger.record(Transaction::with_timestamp(dec("2"), "Deposit", base));
        ledger.record(Transaction::with_timestamp(
            dec("3"),
            "Deposit",
            base + Duration::days(3),
        ));

        let window = ledger.transactions_in_period(base - Duration::days(3), base);
        let amounts: Vec<Decimal> = window.iter().map(|t| t.amount()).collect();
        assert_eq!(amounts, vec![dec("1"), dec("2")]);

        let all = ledger.transactions_in_period(
            base - Duration::days(10),
            base + Duration::days(10),
        );
        assert_eq!(all.len(), 3);
    }
}
