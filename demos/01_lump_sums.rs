use loan_schedule_rs::{
    render_to_string, Decimal, LoanConfig, LumpSumLedger, Money, OutputFormat, ScheduleReport,
};

const LUMP_SUMS: &str = "\
payment date,amount,original amount,currency,exchange rate,rate date
March 9 2020,5000.00,,,,
September 2021,2500.00,2250.00,EUR,1.1111,September 3 2021
";

fn main() -> loan_schedule_rs::Result<()> {
    let config = LoanConfig::new(Money::from_major(125_000), Decimal::from(5), 10, "September 9 2019");
    let terms = config.to_terms()?;

    // the header row is skipped; the month-only date lands on the 9th
    let ledger = LumpSumLedger::from_reader(LUMP_SUMS.as_bytes(), terms.contractual_day())?;
    let report = ScheduleReport::build(&terms, &ledger)?;

    println!(
        "paid off after {} payments instead of {}, saving {} in interest",
        report.summary.payments_made,
        terms.payment_count,
        report.summary.interest_saved.to_currency_string(),
    );
    println!();
    print!("{}", render_to_string(OutputFormat::Markdown, &report)?);
    Ok(())
}
