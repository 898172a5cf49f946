//! tumbler-cli — submit a mixing request against a REST ledger.
//!
//! Validates the request (amounts, recipients, timeout), derives a
//! one-time deposit address when none is given, tells the user where to
//! send funds, and runs a mixer until every batch reaches a terminal
//! state.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use tumbler_core::{Address, Coin, LedgerClient, address::one_time_addresses};
use tumbler_engine::{Batch, BatchOutcome, FixedPool, HourlyPool, Mixer, PoolStrategy};
use tumbler_ledger::{HttpLedger, LedgerConfig, MemoryLedger};

#[derive(Parser)]
#[command(name = "tumbler-cli")]
#[command(version, about = "Obscure a transfer by pooling, splitting, and re-timing it.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mix a deposit into randomized payouts across recipient addresses.
    Mix(MixArgs),
    /// Derive fresh one-time deposit addresses.
    NewAddress(NewAddressArgs),
}

#[derive(Args)]
struct MixArgs {
    /// Amount to mix, in coins (e.g. 50.00).
    #[arg(short, long)]
    amount: String,

    /// Service fee withheld in the pool, in coins (e.g. 2.00).
    #[arg(short, long, default_value = "0.20")]
    fee: String,

    /// Comma-separated recipient addresses.
    #[arg(short, long, value_delimiter = ',', required = true)]
    recipients: Vec<String>,

    /// How long to watch for the deposit before giving up, in seconds.
    #[arg(short, long, default_value = "300")]
    timeout_secs: u64,

    /// Seconds between deposit polls.
    #[arg(long, default_value = "1")]
    poll_secs: u64,

    /// Deposit address to watch. Derived fresh when omitted.
    #[arg(short, long)]
    deposit_address: Option<String>,

    /// Ledger API base URL.
    #[arg(long, default_value = "http://localhost:8080")]
    api_base: String,

    /// Pin the custodial pool address instead of the hourly bucket.
    #[arg(long)]
    pool_address: Option<String>,

    /// Run against an in-memory ledger instead of the real one.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct NewAddressArgs {
    /// Number of addresses to derive.
    #[arg(short, long, default_value = "1")]
    count: usize,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mix(args) => mix(args).await,
        Commands::NewAddress(args) => {
            for address in one_time_addresses(args.count) {
                println!("{address}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn mix(args: MixArgs) -> Result<ExitCode> {
    let amount: Coin = args
        .amount
        .parse()
        .with_context(|| format!("invalid --amount {:?}", args.amount))?;
    let fee: Coin = args
        .fee
        .parse()
        .with_context(|| format!("invalid --fee {:?}", args.fee))?;

    if !amount.is_positive() {
        bail!("--amount must be positive");
    }
    if fee < Coin::ZERO {
        bail!("--fee cannot be negative");
    }
    match amount.checked_sub(fee) {
        Some(net) if net.is_positive() => {}
        _ => bail!("--fee must leave something to disburse (fee {fee} vs amount {amount})"),
    }
    if args.recipients.iter().any(|r| r.trim().is_empty()) {
        bail!("recipient addresses cannot be empty");
    }
    if args.timeout_secs == 0 {
        bail!("--timeout-secs must be positive");
    }

    let recipients: Vec<Address> = args
        .recipients
        .iter()
        .map(|r| Address::new(r.trim()))
        .collect();

    let deposit_address = match args.deposit_address {
        Some(addr) => Address::new(addr),
        None => {
            let mut derived = one_time_addresses(1);
            derived.remove(0)
        }
    };

    let ledger: Arc<dyn LedgerClient> = if args.dry_run {
        Arc::new(MemoryLedger::new())
    } else {
        Arc::new(
            HttpLedger::new(LedgerConfig::from_base(&args.api_base))
                .context("failed to build ledger client")?,
        )
    };

    let strategy: Arc<dyn PoolStrategy> = match args.pool_address {
        Some(addr) => Arc::new(FixedPool(Address::new(addr))),
        None => Arc::new(HourlyPool),
    };

    let source = tumbler_engine::Account::new(deposit_address.clone(), ledger.clone());
    let batch = Batch::new(
        amount,
        fee,
        vec![source],
        recipients,
        Duration::from_secs(args.timeout_secs),
    )
    .context("invalid mixing request")?
    .with_poll_interval(Duration::from_secs(args.poll_secs.max(1)));

    println!("Send {amount} to deposit address:\n\n    {deposit_address}\n");
    println!(
        "Watching for {}s; payouts follow once the full amount arrives.",
        args.timeout_secs
    );

    let results = Mixer::new(vec![batch], strategy, ledger).run().await;

    let mut failed = false;
    for result in results {
        match result.outcome {
            Ok(BatchOutcome::Completed { payouts }) => {
                println!("Mix complete: {payouts} payout(s) sent.");
            }
            Ok(BatchOutcome::TimedOut) => {
                println!("No deposit observed in time; nothing was disbursed.");
                failed = true;
            }
            Err(e) => {
                eprintln!("Mixing failed partway: {e}");
                failed = true;
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
