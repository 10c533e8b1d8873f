//! Conversion of the banking API's loosely typed JSON payloads into
//! [`Transaction`] and [`Account`] records.
//!
//! Individual records that cannot be interpreted are skipped with a warning.
//! Only a document that is not a JSON array at all is an error.

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde_derive::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{Account, Transaction, TransactionType};

/// Reason a single record was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record is not an object of the expected shape: {0}")]
    Shape(String),
    #[error("missing field {0:?}")]
    MissingField(&'static str),
    #[error("unrecognised timestamp {0:?}")]
    BadTimestamp(String),
    #[error("unrecognised amount {0}")]
    BadAmount(String),
    #[error("negative amount {0}")]
    NegativeAmount(Decimal),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    id: Option<Value>,
    amount: Option<Value>,
    #[serde(rename = "type")]
    type_: Option<String>,
    description: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    id: Option<Value>,
    account_number: Option<String>,
    balance: Option<Value>,
}

/// Naive date-time layouts, as serialised by the back end without an
/// offset. These are already wall-clock times.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Interprets `s` as an instant in the zone `tz`.
///
/// Timestamps carrying an offset are converted into `tz`. Naive timestamps
/// and plain dates are wall-clock times in `tz`.
pub fn parse_timestamp(s: &str, tz: Tz) -> Result<DateTime<Tz>, RecordError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz));
    }
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| RecordError::BadTimestamp(s.to_string()))?;
    // A wall-clock time skipped over by a DST change is taken an hour later.
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .ok_or_else(|| RecordError::BadTimestamp(s.to_string()))
}

/// Returns the calendar day of the timestamp `s` in the zone `tz`.
pub fn parse_day(s: &str, tz: Tz) -> Result<NaiveDate, RecordError> {
    parse_timestamp(s, tz).map(|dt| dt.date_naive())
}

/// Reads an amount given as a JSON number or a numeric string. Very large
/// and very small JSON numbers come in exponent form, e.g. `1e-7`.
fn parse_decimal(v: &Value) -> Result<Decimal, RecordError> {
    let s = match v {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(RecordError::BadAmount(other.to_string())),
    };
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .map_err(|_| RecordError::BadAmount(v.to_string()))
}

fn parse_id(v: Option<&Value>) -> Option<i64> {
    v.and_then(Value::as_i64)
}

fn convert_transaction(v: Value, tz: Tz) -> Result<Transaction, RecordError> {
    let raw: RawTransaction =
        serde_json::from_value(v).map_err(|e| RecordError::Shape(e.to_string()))?;

    let date = raw.date.ok_or(RecordError::MissingField("date"))?;
    let day = parse_day(&date, tz)?;

    let amount = parse_decimal(raw.amount.as_ref().ok_or(RecordError::MissingField("amount"))?)?;
    if amount < Decimal::ZERO {
        return Err(RecordError::NegativeAmount(amount));
    }

    let type_ = raw.type_.ok_or(RecordError::MissingField("type"))?;

    Ok(Transaction {
        id: parse_id(raw.id.as_ref()),
        day,
        amount,
        type_: TransactionType::from_api(&type_),
        description: raw.description.unwrap_or_default(),
    })
}

fn convert_account(v: Value) -> Result<Account, RecordError> {
    let raw: RawAccount =
        serde_json::from_value(v).map_err(|e| RecordError::Shape(e.to_string()))?;
    let balance = parse_decimal(raw.balance.as_ref().ok_or(RecordError::MissingField("balance"))?)?;
    Ok(Account {
        id: parse_id(raw.id.as_ref()),
        account_number: raw.account_number.unwrap_or_default(),
        balance,
    })
}

fn parse_array(content: &str, what: &str) -> Result<Vec<Value>> {
    let doc: Value =
        serde_json::from_str(content).with_context(|| format!("parsing {} document", what))?;
    match doc {
        Value::Array(items) => Ok(items),
        other => bail!("expected a JSON array of {}, got {}", what, json_kind(&other)),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a transaction listing, skipping records that cannot be
/// interpreted.
pub fn parse_transactions(content: &str, tz: Tz) -> Result<Vec<Transaction>> {
    let items = parse_array(content, "transactions")?;
    let total = items.len();
    let mut transactions = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match convert_transaction(item, tz) {
            Ok(trn) => transactions.push(trn),
            Err(e) => tracing::warn!(index, "skipping transaction: {}", e),
        }
    }
    tracing::debug!(total, kept = transactions.len(), "parsed transactions");
    Ok(transactions)
}

/// Parses an account listing, skipping records that cannot be interpreted.
pub fn parse_accounts(content: &str) -> Result<Vec<Account>> {
    let items = parse_array(content, "accounts")?;
    let mut accounts = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match convert_account(item) {
            Ok(acct) => accounts.push(acct),
            Err(e) => tracing::warn!(index, "skipping account: {}", e),
        }
    }
    Ok(accounts)
}
