//! Rolling credit and debit totals over a trailing window of days.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use clap::Args;
use rust_decimal::Decimal;

use crate::clock::Now;
use crate::filespec::{self, FileSpec};
use crate::model::{Transaction, TransactionType};
use crate::money;
use crate::payload;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RollingTotals {
    pub credits: Decimal,
    pub debits: Decimal,
    /// Number of credits and debits counted.
    pub count: usize,
}

impl RollingTotals {
    pub fn net(&self) -> Decimal {
        self.credits - self.debits
    }
}

/// Totals the credits and debits dated within the `days` days up to and
/// including `today`. A window reaching past the earliest representable
/// date starts there. Transactions that would take a total out of range are
/// skipped.
pub fn rolling_totals(transactions: &[Transaction], today: NaiveDate, days: u32) -> RollingTotals {
    let since = today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    transactions
        .iter()
        .filter(|trn| trn.day >= since && trn.day <= today)
        .fold(RollingTotals::default(), |mut acc, trn| {
            let total = match trn.type_ {
                TransactionType::Credit => &mut acc.credits,
                TransactionType::Debit => &mut acc.debits,
                TransactionType::Other(_) => return acc,
            };
            match total.checked_add(trn.amount) {
                Some(sum) => {
                    *total = sum;
                    acc.count += 1;
                }
                None => tracing::warn!(id = ?trn.id, "skipping transaction: total out of range"),
            }
            acc
        })
}

/// The most recent transaction of any kind, by day and then by id.
pub fn latest(transactions: &[Transaction]) -> Option<&Transaction> {
    transactions.iter().max_by_key(|trn| (trn.day, trn.id))
}

#[derive(Debug, Args)]
pub struct Command {
    /// JSON transaction listing, as returned by the API. "-" reads stdin.
    #[arg(short = 't', long = "transactions")]
    transactions: FileSpec,
    /// Reference time; defaults to the current time.
    #[arg(long = "now")]
    now: Option<String>,
    /// Time zone used to assign timestamps to calendar days.
    #[arg(long = "timezone", default_value = "UTC")]
    timezone: Tz,
    /// Length of the trailing window, in days.
    #[arg(long = "days", default_value_t = 30)]
    days: u32,
    /// The file to write to. "-" writes to stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: FileSpec,
}

impl Command {
    pub fn run(&self) -> Result<()> {
        let today = match Now::from_arg(self.now.as_deref(), self.timezone).today() {
            Some(today) => today,
            None => anyhow::bail!("cannot interpret --now {:?}", self.now),
        };
        let content = filespec::read_file(&self.transactions)?;
        let trns = payload::parse_transactions(&content, self.timezone)?;
        let totals = rolling_totals(&trns, today, self.days);
        filespec::write_file(&self.output, &render(&totals, latest(&trns)))
    }
}

fn render(totals: &RollingTotals, last: Option<&Transaction>) -> String {
    let mut s = format!(
        "credits: {}\ndebits: {}\nnet: {}\ntransactions: {}\n",
        money::format_amount(totals.credits, Some(&TransactionType::Credit)),
        money::format_amount(totals.debits, Some(&TransactionType::Debit)),
        money::format_balance(totals.net()),
        totals.count,
    );
    match last {
        Some(trn) => s.push_str(&format!(
            "last: {} {} {} {}\n",
            trn.day,
            trn.type_,
            money::format_amount(trn.amount, Some(&trn.type_)),
            trn.description,
        )),
        None => s.push_str("last: none\n"),
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_text_eq;
    use crate::testutil::{day, dec, trn};

    #[test]
    fn window_is_inclusive_of_both_ends() {
        let trns = vec![
            trn("2024-02-04", "1.000", "CREDIT"),
            trn("2024-02-03", "2.000", "CREDIT"),
            trn("2024-03-05", "4.000", "DEBIT"),
            trn("2024-03-06", "8.000", "DEBIT"),
        ];
        // 2024 is a leap year: thirty days before 5 March is 4 February.
        let totals = rolling_totals(&trns, day("2024-03-05"), 30);
        assert_eq!(dec("1.000"), totals.credits);
        assert_eq!(dec("4.000"), totals.debits);
        assert_eq!(2, totals.count);
        assert_eq!(dec("-3.000"), totals.net());
    }

    #[test]
    fn other_kinds_are_not_counted() {
        let trns = vec![
            trn("2024-03-01", "100.000", "DEPOSIT"),
            trn("2024-03-01", "50.000", "WITHDRAW"),
            trn("2024-03-02", "5.000", "CREDIT"),
        ];
        let totals = rolling_totals(&trns, day("2024-03-05"), 30);
        assert_eq!(dec("5.000"), totals.credits);
        assert_eq!(Decimal::ZERO, totals.debits);
        assert_eq!(1, totals.count);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(
            RollingTotals::default(),
            rolling_totals(&[], day("2024-03-05"), 30)
        );
    }

    #[test]
    fn window_longer_than_the_calendar() {
        let trns = vec![
            trn("1900-01-01", "1.000", "CREDIT"),
            trn("2024-03-05", "2.000", "DEBIT"),
        ];
        let totals = rolling_totals(&trns, day("2024-03-05"), u32::MAX);
        assert_eq!(dec("1.000"), totals.credits);
        assert_eq!(dec("2.000"), totals.debits);
        assert_eq!(2, totals.count);
    }

    #[test]
    fn credit_out_of_range_is_skipped() {
        let trns = vec![
            trn("2024-03-01", "79228162514264337593543950335", "CREDIT"),
            trn("2024-03-02", "1", "CREDIT"),
            trn("2024-03-02", "1", "DEBIT"),
        ];
        let totals = rolling_totals(&trns, day("2024-03-05"), 30);
        assert_eq!(Decimal::MAX, totals.credits);
        assert_eq!(dec("1"), totals.debits);
        assert_eq!(2, totals.count);
    }

    #[test]
    fn renders_totals() {
        let totals = RollingTotals {
            credits: dec("1500.5"),
            debits: dec("2000"),
            count: 3,
        };
        let mut last = trn("2024-03-04", "60", "DEPOSIT");
        last.description = "Depot especes".to_string();
        assert_text_eq!(
            "credits: +1 500.500 TND\n\
             debits: -2 000.000 TND\n\
             net: -499.500 TND\n\
             transactions: 3\n\
             last: 2024-03-04 DEPOSIT 60.000 TND Depot especes\n",
            &render(&totals, Some(&last))
        );
        assert!(render(&RollingTotals::default(), None).ends_with("last: none\n"));
    }

    #[test]
    fn latest_breaks_ties_by_id() {
        let mut a = trn("2024-03-04", "1", "CREDIT");
        a.id = Some(10);
        let mut b = trn("2024-03-04", "2", "DEBIT");
        b.id = Some(11);
        let c = trn("2024-03-01", "3", "CREDIT");
        let trns = vec![a, b, c];
        assert_eq!(Some(&trns[1]), latest(&trns));
        assert_eq!(None, latest(&[]));
    }
}
