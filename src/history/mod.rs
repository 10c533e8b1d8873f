//! Backward reconstruction of the daily aggregate balance for the current
//! month.
//!
//! The walk starts from the known present balance on today's date and steps
//! back one calendar day at a time to the first of the month, undoing the
//! effect of each day's transactions as it goes. The value recorded for a
//! day is the running balance *after* that day's transactions have been
//! undone, i.e. the balance as it stood before that day's activity.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::model::Transaction;

pub mod cmd;

/// One point of a [`BalanceHistory`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: Decimal,
}

/// Daily balances in ascending date order, as two parallel sequences.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalanceHistory {
    pub dates: Vec<NaiveDate>,
    pub balances: Vec<Decimal>,
}

impl BalanceHistory {
    /// The series shown when nothing could be computed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = DailyBalance> + '_ {
        self.dates
            .iter()
            .zip(self.balances.iter())
            .map(|(&date, &balance)| DailyBalance { date, balance })
    }

    /// Short day/month labels for the x-axis of a chart, e.g. "05/03".
    pub fn labels(&self) -> Vec<String> {
        self.dates.iter().map(day_label).collect()
    }
}

pub fn day_label(date: &NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// First calendar day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// Sums the forward balance effect of the transactions on each day,
/// ignoring those dated before `since`.
///
/// A transaction that would take its day's total out of the representable
/// range is skipped.
pub fn net_effect_by_day(
    transactions: &[Transaction],
    since: NaiveDate,
) -> BTreeMap<NaiveDate, Decimal> {
    let mut by_day = BTreeMap::new();
    for trn in transactions.iter().filter(|trn| trn.day >= since) {
        let total = by_day.entry(trn.day).or_insert(Decimal::ZERO);
        match total.checked_add(trn.balance_effect()) {
            Some(sum) => *total = sum,
            None => tracing::warn!(
                id = ?trn.id,
                day = %trn.day,
                "skipping transaction: daily total out of range"
            ),
        }
    }
    by_day
}

/// Reconstructs the balance of every day from the first of `today`'s month
/// through `today`, ending at `current_balance`.
///
/// If a running balance leaves the representable range the series is empty.
pub fn reconstruct(
    current_balance: Decimal,
    transactions: &[Transaction],
    today: NaiveDate,
) -> BalanceHistory {
    let first = first_of_month(today);
    let effects = net_effect_by_day(transactions, first);

    let mut running = current_balance;
    let mut visited: Vec<DailyBalance> = Vec::with_capacity(today.day() as usize);
    let mut day = today;
    loop {
        if let Some(effect) = effects.get(&day) {
            running = match running.checked_sub(*effect) {
                Some(prev) => prev,
                None => {
                    tracing::warn!(day = %day, "balance out of range, nothing to chart");
                    return BalanceHistory::empty();
                }
            };
        }
        visited.push(DailyBalance {
            date: day,
            balance: running,
        });
        if day <= first {
            break;
        }
        day = match day.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }

    let mut history = BalanceHistory {
        dates: Vec::with_capacity(visited.len()),
        balances: Vec::with_capacity(visited.len()),
    };
    for point in visited.into_iter().rev() {
        history.dates.push(point.date);
        history.balances.push(point.balance);
    }
    tracing::debug!(
        days = history.len(),
        from = %first,
        to = %today,
        "reconstructed balance history"
    );
    history
}

/// As [`reconstruct`], taking today's date from `now` in its own zone.
pub fn reconstruct_at(
    current_balance: Decimal,
    transactions: &[Transaction],
    now: DateTime<Tz>,
) -> BalanceHistory {
    reconstruct(current_balance, transactions, now.date_naive())
}

/// As [`reconstruct_at`], at the current wall-clock time in `tz`.
pub fn reconstruct_now(
    current_balance: Decimal,
    transactions: &[Transaction],
    tz: Tz,
) -> BalanceHistory {
    reconstruct_at(current_balance, transactions, Utc::now().with_timezone(&tz))
}
