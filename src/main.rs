use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[cfg(test)]
mod testutil;

mod accounts;
mod clock;
mod filespec;
mod history;
mod model;
mod money;
mod output;
mod payload;
mod stats;

#[derive(Debug, Parser)]
/// Derives chart data from the transaction and account listings of a
/// banking API.
struct Command {
    /// Log more detail to stderr. Repeat for more. RUST_LOG overrides this.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    #[command(name = "history")]
    /// Reconstructs the daily aggregate balance for the current month, going
    /// back from the present balance.
    History(history::cmd::Command),
    #[command(name = "stats")]
    /// Totals credits and debits over a trailing window of days.
    Stats(stats::Command),
    #[command(name = "summary")]
    /// Lists account balances and their total.
    Summary(accounts::Command),
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cmd = Command::parse();
    init_logging(cmd.verbose);
    use SubCommand::*;
    match cmd.subcmd {
        History(cmd) => cmd.run(),
        Stats(cmd) => cmd.run(),
        Summary(cmd) => cmd.run(),
    }
}
