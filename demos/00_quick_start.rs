use loan_schedule_rs::{
    render_to_string, Decimal, LoanConfig, LumpSumLedger, Money, OutputFormat, ScheduleReport,
};

fn main() -> loan_schedule_rs::Result<()> {
    // $125,000 at 5% over 10 years, first payment on September 9 2019
    let config = LoanConfig::new(Money::from_major(125_000), Decimal::from(5), 10, "September 9 2019");
    let terms = config.to_terms()?;

    let report = ScheduleReport::build(&terms, &LumpSumLedger::empty())?;
    println!("monthly payment: {}", report.summary.fixed_payment.to_currency_string());
    println!("total interest:  {}", report.summary.total_interest.to_currency_string());
    println!();
    print!("{}", render_to_string(OutputFormat::Table, &report)?);
    Ok(())
}
