//! loan-schedule - fixed-rate amortization schedules with lump sum payments.
//!
//! # Usage
//!
//! ```bash
//! # 10 year loan, csv on stdout
//! loan-schedule --loan-amount 125000 --interest 5 --years 10 --start-date "September 9 2019"
//!
//! # with extra payments, as an html page
//! loan-schedule lump-sums.csv --loan-amount 125000 --interest 5 --years 10 \
//!     --start-date "September 9 2019" --output html > schedule.html
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use loan_schedule_rs::{
    render_to_string, Decimal, LoanConfig, LumpSumLedger, Money, OutputFormat, ScheduleReport,
};
use tracing_subscriber::EnvFilter;

/// Amortization schedule for a fixed-rate loan, with optional lump sum payments
#[derive(Parser, Debug)]
#[command(name = "loan-schedule", version, about, long_about = None)]
struct Cli {
    /// Lump sums file (csv): date,amount[,original amount,currency,exchange rate,rate date]
    lump_sums: Option<PathBuf>,

    /// Initial loan amount
    #[arg(long, env = "LOAN_AMOUNT")]
    loan_amount: Option<Decimal>,

    /// Annual interest rate (i.e. 5 for 5%)
    #[arg(long, env = "LOAN_INTEREST")]
    interest: Option<Decimal>,

    /// The term in number of years
    #[arg(long, env = "LOAN_YEARS")]
    years: Option<u32>,

    /// First payment date (such as "September 9 2019")
    #[arg(long, env = "LOAN_START_DATE")]
    start_date: Option<String>,

    /// Json file with loan_amount, interest_percent, years and start_date; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// The output format
    #[arg(short, long, value_enum, default_value = "csv")]
    output: OutputFormat,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn loan_config(&self) -> Result<LoanConfig> {
        let base = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                Some(LoanConfig::from_json(&json)?)
            }
            None => None,
        };

        let loan_amount = self
            .loan_amount
            .map(Money::from_decimal)
            .or(base.as_ref().map(|c| c.loan_amount));
        let interest = self.interest.or(base.as_ref().map(|c| c.interest_percent));
        let years = self.years.or(base.as_ref().map(|c| c.years));
        let start_date = self
            .start_date
            .clone()
            .or(base.as_ref().map(|c| c.start_date.clone()));

        match (loan_amount, interest, years, start_date) {
            (Some(amount), Some(interest), Some(years), Some(start)) => {
                Ok(LoanConfig::new(amount, interest, years, start))
            }
            (amount, interest, years, start) => {
                let missing: Vec<&str> = [
                    ("--loan-amount", amount.is_none()),
                    ("--interest", interest.is_none()),
                    ("--years", years.is_none()),
                    ("--start-date", start.is_none()),
                ]
                .into_iter()
                .filter_map(|(flag, absent)| absent.then_some(flag))
                .collect();
                bail!("missing required loan terms: {}", missing.join(", "))
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // logs go to stderr so stdout stays clean for the report
    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();

    let config = cli.loan_config()?;
    let terms = config.to_terms().context("invalid loan terms")?;
    tracing::info!(
        principal = %terms.principal,
        rate = %terms.annual_rate,
        payments = terms.payment_count,
        output = ?cli.output,
        "generating schedule"
    );

    let ledger = match &cli.lump_sums {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening lump sums file {}", path.display()))?;
            LumpSumLedger::from_reader(file, terms.contractual_day())
                .with_context(|| format!("reading lump sums file {}", path.display()))?
        }
        None => LumpSumLedger::empty(),
    };

    let report = ScheduleReport::build(&terms, &ledger).context("generating schedule")?;
    let output = render_to_string(cli.output, &report).context("rendering schedule")?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
