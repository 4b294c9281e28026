//! Append-only transaction log and account registry
//!
//! Nothing here keeps a running balance: every balance is a fresh replay of
//! the log, so read views can never drift from the transactions they sum.

use jiff::civil::Date;

use crate::model::{
    Account, AccountDetails, AccountId, AccountMeta, AccountSummary, NewAccount, Transaction,
    TransactionDetails, TransactionId,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from previously exported parts.
    pub fn from_parts(accounts: Vec<Account>, transactions: Vec<Transaction>) -> Self {
        Self {
            accounts,
            transactions,
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| &a.id == id)
    }

    pub fn add_account(&mut self, account: NewAccount) -> AccountId {
        // Ids derive from the log length; the log never shrinks
        let id = AccountId(format!("act-{}", self.accounts.len() + 1));
        tracing::debug!(account_id = %id, label = %account.label, "adding account");
        self.accounts.push(Account {
            id: id.clone(),
            label: account.label,
            kind: account.kind,
            interest: account.interest,
        });
        id
    }

    /// Append a transaction. Callers validate the details.
    pub fn add_transaction(
        &mut self,
        details: TransactionDetails,
        occured_on: Date,
    ) -> TransactionId {
        let id = TransactionId(format!("tx-{}", self.transactions.len() + 1));
        tracing::debug!(
            transaction_id = %id,
            from = %details.from_account_id,
            to = %details.to_account_id,
            amount = details.amount,
            kind = %details.kind,
            %occured_on,
            "adding transaction"
        );
        self.transactions.push(Transaction {
            id: id.clone(),
            details,
            occured_on,
        });
        id
    }

    fn visible(until: Option<Date>) -> impl Fn(&&Transaction) -> bool {
        move |tx: &&Transaction| until.is_none_or(|until| tx.occured_on <= until)
    }

    /// Money in minus money out over transactions dated on or before `until`.
    pub fn balance(&self, account: &AccountId, until: Option<Date>) -> i64 {
        self.transactions
            .iter()
            .filter(Self::visible(until))
            .map(|tx| tx.details.signed_amount_for(account))
            .sum()
    }

    /// Transactions paying into `account`.
    pub fn debits(&self, account: &AccountId, until: Option<Date>) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(Self::visible(until))
            .filter(|tx| &tx.details.to_account_id == account)
            .cloned()
            .collect()
    }

    /// Transactions paying out of `account`.
    pub fn credits(&self, account: &AccountId, until: Option<Date>) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(Self::visible(until))
            .filter(|tx| &tx.details.from_account_id == account)
            .cloned()
            .collect()
    }

    pub fn details(&self, account: &AccountId, until: Option<Date>) -> AccountDetails {
        AccountDetails {
            balance: self.balance(account, until),
            transactions: self
                .transactions
                .iter()
                .filter(Self::visible(until))
                .filter(|tx| tx.details.touches(account))
                .cloned()
                .collect(),
        }
    }

    pub fn summaries(&self, until: Option<Date>) -> Vec<AccountSummary> {
        self.accounts
            .iter()
            .map(|account| AccountSummary {
                account: account.clone(),
                balance: self.balance(&account.id, until),
            })
            .collect()
    }

    pub fn meta(&self, id: &AccountId) -> AccountMeta {
        match self.account(id) {
            Some(account) => AccountMeta {
                interest: account.interest.clone(),
                label: account.label.clone(),
                kind: account.kind.clone(),
            },
            None => AccountMeta::unregistered(id),
        }
    }
}
