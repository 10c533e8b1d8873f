use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Args;
use rust_decimal::Decimal;

use crate::clock::Now;
use crate::filespec::{self, FileSpec};
use crate::history::{reconstruct_at, reconstruct_now, BalanceHistory};
use crate::model::{total_balance, Transaction};
use crate::output::{self, OutputFormat};
use crate::payload;

#[derive(Debug, Args)]
pub struct Command {
    /// JSON transaction listing, as returned by the API. "-" reads stdin.
    #[arg(short = 't', long = "transactions")]
    transactions: FileSpec,
    #[command(flatten)]
    balance: BalanceSource,
    /// Reference time; defaults to the current time. If it cannot be
    /// interpreted an empty series is written.
    #[arg(long = "now")]
    now: Option<String>,
    /// Time zone used to assign timestamps to calendar days.
    #[arg(long = "timezone", default_value = "UTC")]
    timezone: Tz,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// The file to write the series to (overwrites any existing file). "-"
    /// writes to stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: FileSpec,
}

/// Where the present aggregate balance comes from.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct BalanceSource {
    /// The present aggregate balance across all accounts.
    #[arg(long = "current-balance", allow_negative_numbers = true)]
    current_balance: Option<Decimal>,
    /// JSON account listing whose balances are summed.
    #[arg(long = "accounts")]
    accounts: Option<FileSpec>,
}

impl BalanceSource {
    fn resolve(&self) -> Result<Decimal> {
        if let Some(balance) = self.current_balance {
            return Ok(balance);
        }
        match &self.accounts {
            Some(fs) => {
                let content = filespec::read_file(fs)?;
                let accounts = payload::parse_accounts(&content)
                    .with_context(|| format!("reading accounts from {}", fs))?;
                total_balance(&accounts).context("total balance is out of range")
            }
            None => anyhow::bail!("either --current-balance or --accounts is required"),
        }
    }
}

impl Command {
    pub fn run(&self) -> Result<()> {
        let history = match Now::from_arg(self.now.as_deref(), self.timezone) {
            Now::WallClock(tz) => {
                let (current, trns) = self.load(tz)?;
                reconstruct_now(current, &trns, tz)
            }
            fixed => match fixed.moment() {
                Some(now) => {
                    let (current, trns) = self.load(now.timezone())?;
                    reconstruct_at(current, &trns, now)
                }
                None => BalanceHistory::empty(),
            },
        };
        if history.is_empty() {
            tracing::warn!("no days to chart, writing an empty series");
        } else {
            tracing::info!(days = history.len(), "writing balance series");
        }
        filespec::write_file(&self.output, &output::render(&history, self.format)?)
    }

    /// Reads the present balance and the transaction listing.
    fn load(&self, tz: Tz) -> Result<(Decimal, Vec<Transaction>)> {
        let current = self.balance.resolve()?;
        let content = filespec::read_file(&self.transactions)?;
        let trns = payload::parse_transactions(&content, tz)
            .with_context(|| format!("reading transactions from {}", self.transactions))?;
        Ok((current, trns))
    }
}
