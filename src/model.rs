//! Typed records for the data handed over by the banking API.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Kind of a transaction, as reported by the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionType {
    /// Increases the owning balance.
    Credit,
    /// Decreases the owning balance.
    Debit,
    /// Deposits, withdrawals, closures and anything else. These have no
    /// effect on the reconstructed balance.
    Other(String),
}

impl TransactionType {
    pub fn from_api(s: &str) -> Self {
        use TransactionType::*;
        match s {
            "CREDIT" => Credit,
            "DEBIT" => Debit,
            other => Other(other.to_string()),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use TransactionType::*;
        match self {
            Credit => f.write_str("CREDIT"),
            Debit => f.write_str("DEBIT"),
            Other(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    /// Calendar day of the transaction timestamp, in the zone chosen when
    /// the payload was parsed.
    pub day: NaiveDate,
    /// Magnitude of the value moved. Never negative.
    pub amount: Decimal,
    pub type_: TransactionType,
    pub description: String,
}

impl Transaction {
    /// Returns the signed change this transaction made to the aggregate
    /// balance going forward in time.
    pub fn balance_effect(&self) -> Decimal {
        use TransactionType::*;
        match self.type_ {
            Credit => self.amount,
            Debit => -self.amount,
            Other(_) => Decimal::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub id: Option<i64>,
    pub account_number: String,
    pub balance: Decimal,
}

impl Account {
    /// Name to show for the account: its number, or its id when the listing
    /// left the number out.
    pub fn label(&self) -> String {
        match self.id {
            _ if !self.account_number.is_empty() => self.account_number.clone(),
            Some(id) => format!("#{}", id),
            None => "?".to_string(),
        }
    }
}

/// Sum of the balances of all given accounts, or `None` if the sum is out
/// of range.
pub fn total_balance(accounts: &[Account]) -> Option<Decimal> {
    accounts
        .iter()
        .try_fold(Decimal::ZERO, |sum, acct| sum.checked_add(acct.balance))
}
