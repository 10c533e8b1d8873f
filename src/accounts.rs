use anyhow::{Context, Result};
use clap::Args;

use crate::filespec::{self, FileSpec};
use crate::model::{total_balance, Account};
use crate::money::format_balance;
use crate::payload;

#[derive(Debug, Args)]
pub struct Command {
    /// JSON account listing, as returned by the API. "-" reads stdin.
    accounts: FileSpec,
    /// The file to write to. "-" writes to stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: FileSpec,
}

impl Command {
    pub fn run(&self) -> Result<()> {
        let content = filespec::read_file(&self.accounts)?;
        let accounts = payload::parse_accounts(&content)?;
        filespec::write_file(&self.output, &render(&accounts)?)
    }
}

fn render(accounts: &[Account]) -> Result<String> {
    let total = total_balance(accounts).context("total balance is out of range")?;
    let labels: Vec<String> = accounts.iter().map(Account::label).collect();
    let width = labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("total".len());
    let mut s = String::new();
    for (label, acct) in labels.iter().zip(accounts) {
        s.push_str(&format!(
            "{:<width$}  {}\n",
            label,
            format_balance(acct.balance),
            width = width
        ));
    }
    s.push_str(&format!(
        "{:<width$}  {}\n",
        "total",
        format_balance(total),
        width = width
    ));
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_text_eq;
    use crate::testutil::account;

    #[test]
    fn lists_accounts_and_total() {
        let accounts = vec![account("TN0001", "1500.25"), account("TN0002", "-300")];
        assert_text_eq!(
            "TN0001  1 500.250 TND\nTN0002  -300.000 TND\ntotal   1 200.250 TND\n",
            &render(&accounts).expect("render")
        );
    }

    #[test]
    fn account_without_number_is_listed_by_id() {
        let mut acct = account("", "12");
        acct.id = Some(42);
        assert_text_eq!(
            "#42    12.000 TND\ntotal  12.000 TND\n",
            &render(&[acct]).expect("render")
        );
    }

    #[test]
    fn no_accounts_is_zero_total() {
        assert_text_eq!("total  0.000 TND\n", &render(&[]).expect("render"));
    }

    #[test]
    fn total_out_of_range_is_an_error() {
        let accounts = vec![
            account("TN0001", "79228162514264337593543950335"),
            account("TN0002", "1"),
        ];
        assert!(render(&accounts).is_err());
    }
}
