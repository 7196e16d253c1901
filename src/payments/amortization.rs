use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LoanTerms;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::types::{PaymentPeriod, RowKind, ScheduleRow};

use super::lump_sum::LumpSumLedger;

/// fixed periodic payment that fully amortizes `principal` over `payment_count` periods
///
/// `payment = r * P / (1 - (1 + r)^-n)`, or `P / n` when the rate is zero.
/// the result keeps full decimal precision.
pub fn periodic_payment(principal: Money, monthly_rate: Rate, payment_count: u32) -> Result<Money> {
    if !principal.is_positive() {
        return Err(ScheduleError::invalid_input(format!(
            "principal must be positive, got {principal}"
        )));
    }
    if monthly_rate.is_negative() {
        return Err(ScheduleError::invalid_input(format!(
            "monthly rate must not be negative, got {monthly_rate}"
        )));
    }
    if payment_count == 0 {
        return Err(ScheduleError::invalid_input("payment count must be positive"));
    }

    let r = monthly_rate.as_decimal();
    if r.is_zero() {
        return Ok(Money::from_decimal(principal.as_decimal() / Decimal::from(payment_count)));
    }

    // (1 + r)^n by exact decimal exponentiation, then inverted for the negative exponent
    let compound = (Decimal::ONE + r)
        .checked_powi(i64::from(payment_count))
        .ok_or_else(|| ScheduleError::Calculation {
            message: format!("(1 + {r})^{payment_count} overflows"),
        })?;
    let discount = Decimal::ONE
        .checked_div(compound)
        .ok_or_else(|| ScheduleError::Calculation {
            message: "discount factor underflows".to_string(),
        })?;

    let denominator = Decimal::ONE - discount;
    if denominator <= Decimal::ZERO {
        return Err(ScheduleError::Calculation {
            message: format!("rate {monthly_rate} is too small to amortize over {payment_count} periods"),
        });
    }

    let payment = r
        .checked_mul(principal.as_decimal())
        .and_then(|scaled| scaled.checked_div(denominator))
        .ok_or_else(|| ScheduleError::Calculation {
            message: "periodic payment overflows".to_string(),
        })?;

    Ok(Money::from_decimal(payment))
}

/// generated schedule with the fixed payment it was built from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationSchedule {
    pub fixed_payment: Money,
    pub rows: Vec<ScheduleRow>,
}

impl AmortizationSchedule {
    /// generate payment schedule
    pub fn generate(terms: &LoanTerms, ledger: &LumpSumLedger) -> Result<Self> {
        let calculator = AmortizationCalculator::new(terms)?;
        let rows = calculator.calculate_schedule(ledger)?;

        Ok(Self {
            fixed_payment: calculator.fixed_payment(),
            rows,
        })
    }

    /// regular payment rows, excluding the opening line
    pub fn payments(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Loan && r.period > 0)
    }

    /// lump sum rows
    pub fn lump_sums(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(|r| r.is_lump_sum())
    }

    pub fn total_interest(&self) -> Money {
        self.rows.iter().map(|r| r.interest).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.rows.iter().map(|r| r.principal).sum()
    }

    /// everything paid, regular payments and lump sums
    pub fn total_paid(&self) -> Money {
        self.rows.iter().map(|r| r.payment).sum()
    }

    pub fn total_lump_sums(&self) -> Money {
        self.lump_sums().map(|r| r.payment).sum()
    }

    /// number of regular payments made
    pub fn payments_made(&self) -> u32 {
        self.payments().map(|r| r.period).max().unwrap_or(0)
    }

    pub fn ending_balance(&self) -> Money {
        self.rows.last().map(|r| r.balance).unwrap_or(Money::ZERO)
    }

    /// date the balance reached zero, if it did
    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.rows
            .iter()
            .find(|r| r.period > 0 && r.balance.is_zero())
            .map(|r| r.date)
    }
}

/// period-by-period schedule calculator for one loan
pub struct AmortizationCalculator<'a> {
    terms: &'a LoanTerms,
    fixed_payment: Money,
}

impl<'a> AmortizationCalculator<'a> {
    pub fn new(terms: &'a LoanTerms) -> Result<Self> {
        let fixed_payment = periodic_payment(terms.principal, terms.monthly_rate, terms.payment_count)?;

        info!(
            payment_count = terms.payment_count,
            monthly_rate = %terms.monthly_rate.as_decimal(),
            fixed_payment = %fixed_payment.to_currency_string(),
            "amortization terms resolved"
        );

        Ok(Self { terms, fixed_payment })
    }

    pub fn fixed_payment(&self) -> Money {
        self.fixed_payment
    }

    /// calculate full amortization schedule
    ///
    /// every amount is truncated to the cent as soon as it is computed, so the
    /// balance never carries sub-cent digits from one period to the next.
    pub fn calculate_schedule(&self, ledger: &LumpSumLedger) -> Result<Vec<ScheduleRow>> {
        let count = self.terms.payment_count;
        let mut rows = Vec::with_capacity(count as usize + 1 + ledger.len());
        let mut balance = self.terms.principal.truncate_cents();
        let mut applied = 0;

        for n in 0..=count {
            if n > 0 && !balance.is_positive() {
                break;
            }

            let date = self.terms.period_date(n)?;

            if n == 0 {
                rows.push(ScheduleRow {
                    period: 0,
                    date,
                    kind: RowKind::Loan,
                    interest: Money::ZERO,
                    principal: Money::ZERO,
                    payment: Money::ZERO,
                    balance,
                });
            } else {
                let row = self.regular_payment(n, date, balance)?;
                balance = row.balance;
                rows.push(row);
            }

            if let Some(row) = self.lump_sum_payment(n, date, balance, ledger)? {
                balance = row.balance;
                applied += 1;
                rows.push(row);
            }
        }

        if applied < ledger.len() {
            warn!(
                unapplied = ledger.len() - applied,
                "some lump sums fall outside the repayment period and were not applied"
            );
        }

        // every other total is bounded by what was paid
        rows.iter()
            .try_fold(Money::ZERO, |total, row| total.checked_add(row.payment))
            .ok_or_else(|| ScheduleError::Calculation {
                message: "total paid overflows".to_string(),
            })?;

        debug!(rows = rows.len(), ending_balance = %balance, "schedule calculated");
        Ok(rows)
    }

    fn regular_payment(&self, n: u32, date: NaiveDate, balance: Money) -> Result<ScheduleRow> {
        let interest = balance.monthly_interest(self.terms.annual_rate)?;

        let principal = if n == self.terms.payment_count {
            // final contractual payment settles the truncation residue
            balance
        } else {
            (self.fixed_payment - interest)
                .min(balance)
                .max(Money::ZERO)
                .truncate_cents()
        };
        let due = interest
            .checked_add(principal)
            .ok_or_else(|| ScheduleError::Calculation {
                message: format!("payment for period {n} overflows"),
            })?;
        let payment = if n == self.terms.payment_count {
            due
        } else {
            self.fixed_payment.min(due)
        };

        Ok(ScheduleRow {
            period: n,
            date,
            kind: RowKind::Loan,
            interest,
            principal,
            payment,
            balance: (balance - principal).truncate_cents(),
        })
    }

    fn lump_sum_payment(
        &self,
        n: u32,
        date: NaiveDate,
        balance: Money,
        ledger: &LumpSumLedger,
    ) -> Result<Option<ScheduleRow>> {
        let period = PaymentPeriod::containing(date, self.terms.contractual_day());
        let Some(lump_sum) = ledger.get(&period) else {
            return Ok(None);
        };

        if lump_sum.payment_date != date {
            return Err(ScheduleError::MisalignedLumpSum {
                period,
                payment_date: lump_sum.payment_date,
                due_date: date,
            });
        }

        if !balance.is_positive() {
            debug!(period = %period, "loan already repaid, lump sum not needed");
            return Ok(None);
        }

        let remaining = (balance - lump_sum.amount.min(balance)).truncate_cents();
        let amount = balance - remaining;
        debug!(period = n, amount = %amount, "applying lump sum");

        Ok(Some(ScheduleRow {
            period: n,
            date,
            kind: RowKind::LumpSum,
            interest: Money::ZERO,
            principal: amount,
            payment: amount,
            balance: remaining,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoanConfig;
    use crate::input::LumpSumRecord;
    use rust_decimal_macros::dec;

    fn terms(amount: i64, percent: Decimal, years: u32, start: &str) -> LoanTerms {
        LoanConfig::new(Money::from_major(amount), percent, years, start)
            .to_terms()
            .unwrap()
    }

    fn ledger(day: u32, rows: &[(&str, &str)]) -> LumpSumLedger {
        let records: Vec<LumpSumRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, (date, amount))| LumpSumRecord {
                line: i + 1,
                fields: vec![date.to_string(), amount.to_string()],
            })
            .collect();
        LumpSumLedger::from_records(&records, day).unwrap()
    }

    #[test]
    fn test_periodic_payment_formula() {
        let monthly = Rate::from_percentage(dec!(5)).monthly_rate();
        let payment = periodic_payment(Money::from_major(125_000), monthly, 120).unwrap();
        assert_eq!(payment.truncate_cents(), Money::from_minor(132581));
    }

    #[test]
    fn test_periodic_payment_zero_rate() {
        let payment = periodic_payment(Money::from_major(1200), Rate::ZERO, 12).unwrap();
        assert_eq!(payment, Money::from_major(100));
    }

    #[test]
    fn test_periodic_payment_invalid_input() {
        let monthly = Rate::from_percentage(dec!(5)).monthly_rate();
        let cases = [
            periodic_payment(Money::ZERO, monthly, 12),
            periodic_payment(Money::from_major(1000), monthly, 0),
            periodic_payment(Money::from_major(1000), Rate::from_decimal(dec!(-0.01)), 12),
        ];
        for result in cases {
            assert!(matches!(result, Err(ScheduleError::InvalidInput { .. })));
        }
    }

    #[test]
    fn test_first_period() {
        let terms = terms(125_000, dec!(5), 10, "September 9 2019");
        let schedule = AmortizationSchedule::generate(&terms, &LumpSumLedger::empty()).unwrap();

        let opening = &schedule.rows[0];
        assert_eq!(opening.period, 0);
        assert_eq!(opening.interest, Money::ZERO);
        assert_eq!(opening.principal, Money::ZERO);
        assert_eq!(opening.balance, Money::from_major(125_000));

        let first = &schedule.rows[1];
        assert_eq!(first.interest, Money::from_minor(52083));
        assert_eq!(first.principal, Money::from_minor(80498));
        assert_eq!(first.payment, Money::from_minor(132581));
        assert_eq!(first.balance, Money::from_minor(12419502));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2019, 10, 9).unwrap());
    }

    #[test]
    fn test_balance_reaches_zero_at_term() {
        let cases = [
            (125_000, dec!(5), 10),
            (100_000, dec!(3.5), 30),
            (250_000, dec!(7.25), 25),
            (5_000, dec!(12), 1),
            (1_000, dec!(0.5), 3),
            (1_000, dec!(0), 3),
        ];

        for (amount, percent, years) in cases {
            let terms = terms(amount, percent, years, "January 15 2020");
            let schedule = AmortizationSchedule::generate(&terms, &LumpSumLedger::empty()).unwrap();
            let last = schedule.rows.last().unwrap();

            assert_eq!(last.period, terms.payment_count, "{amount} at {percent}% for {years}y");
            assert_eq!(last.balance, Money::ZERO);
            assert_eq!(schedule.total_principal(), Money::from_major(amount));
            assert_eq!(schedule.payments_made(), terms.payment_count);
        }
    }

    #[test]
    fn test_balance_never_increases() {
        let terms = terms(250_000, dec!(7.25), 25, "May 31 2021");
        let schedule = AmortizationSchedule::generate(&terms, &LumpSumLedger::empty()).unwrap();

        for pair in schedule.rows.windows(2) {
            assert!(pair[1].balance <= pair[0].balance);
            assert!(!pair[1].principal.is_negative());
            assert_eq!(pair[1].payment, pair[1].interest + pair[1].principal);
        }
    }

    #[test]
    fn test_every_amount_is_whole_cents() {
        let terms = terms(98_765, dec!(6.125), 15, "March 3 2022");
        let schedule = AmortizationSchedule::generate(&terms, &LumpSumLedger::empty()).unwrap();

        for row in &schedule.rows {
            for amount in [row.interest, row.principal, row.payment, row.balance] {
                assert_eq!(amount.truncate_cents(), amount);
            }
        }
    }

    #[test]
    fn test_lump_sum_emits_second_row() {
        let terms = terms(125_000, dec!(5), 10, "September 9 2019");
        let baseline = AmortizationSchedule::generate(&terms, &LumpSumLedger::empty()).unwrap();

        let lumps = ledger(9, &[("March 9 2020", "5000.00")]);
        let schedule = AmortizationSchedule::generate(&terms, &lumps).unwrap();

        let period_six: Vec<&ScheduleRow> = schedule.rows.iter().filter(|r| r.period == 6).collect();
        assert_eq!(period_six.len(), 2);
        assert_eq!(period_six[0].kind, RowKind::Loan);
        assert_eq!(period_six[1].kind, RowKind::LumpSum);
        assert_eq!(period_six[1].interest, Money::ZERO);
        assert_eq!(period_six[1].payment, Money::from_major(5000));

        let baseline_six = baseline.rows.iter().find(|r| r.period == 6).unwrap();
        assert_eq!(period_six[0], baseline_six);
        assert_eq!(period_six[1].balance, baseline_six.balance - Money::from_major(5000));

        // paid off sooner, with less interest
        assert!(schedule.payments_made() < terms.payment_count);
        assert!(schedule.total_interest() < baseline.total_interest());
        assert_eq!(schedule.ending_balance(), Money::ZERO);
        assert_eq!(schedule.total_lump_sums(), Money::from_major(5000));
    }

    #[test]
    fn test_lump_sum_capped_at_balance() {
        let terms = terms(10_000, dec!(4), 2, "January 1 2021");
        let lumps = ledger(1, &[("February 1 2021", "50000")]);
        let schedule = AmortizationSchedule::generate(&terms, &lumps).unwrap();

        let lump = schedule.lump_sums().next().unwrap();
        let regular = &schedule.rows[1];
        assert_eq!(lump.principal, regular.balance);
        assert_eq!(lump.balance, Money::ZERO);
        assert_eq!(schedule.rows.len(), 3);
        assert_eq!(schedule.payoff_date(), NaiveDate::from_ymd_opt(2021, 2, 1));
    }

    #[test]
    fn test_lump_sum_with_sub_cent_digits() {
        let terms = terms(10_000, dec!(0), 1, "January 1 2021");
        let lumps = ledger(1, &[("February 1 2021", "100.999")]);
        let schedule = AmortizationSchedule::generate(&terms, &lumps).unwrap();

        assert_eq!(schedule.rows[1].balance, Money::from_minor(916667));
        let lump = &schedule.rows[2];
        assert_eq!(lump.kind, RowKind::LumpSum);
        // the balance is truncated after subtracting the exact amount
        assert_eq!(lump.balance, Money::from_minor(906567));
        assert_eq!(lump.payment, Money::from_minor(10100));
        assert_eq!(lump.principal, lump.payment);
    }

    #[test]
    fn test_final_payment_settles_remaining_balance() {
        let terms = terms(125_000, dec!(5), 10, "September 9 2019");
        let schedule = AmortizationSchedule::generate(&terms, &LumpSumLedger::empty()).unwrap();
        let before = &schedule.rows[schedule.rows.len() - 2];
        let last = schedule.rows.last().unwrap();

        assert_eq!(last.period, 120);
        assert_eq!(last.principal, before.balance);
        assert_eq!(last.payment, last.interest + before.balance);
        assert_eq!(last.payment, Money::from_minor(132640));
        assert!(last.payment > schedule.fixed_payment);
        assert_eq!(last.balance, Money::ZERO);
    }

    #[test]
    fn test_overflowing_terms_are_an_error() {
        let principal = Money::from_str_exact("50000000000000000000000000000").unwrap();
        let terms = LoanConfig::new(principal, dec!(200), 1, "January 1 2021")
            .to_terms()
            .unwrap();
        let err = AmortizationSchedule::generate(&terms, &LumpSumLedger::empty()).unwrap_err();
        assert!(matches!(err, ScheduleError::Calculation { .. }));
    }

    #[test]
    fn test_lump_sum_on_opening_row() {
        let terms = terms(10_000, dec!(4), 2, "January 1 2021");
        let lumps = ledger(1, &[("January 1 2021", "1000")]);
        let schedule = AmortizationSchedule::generate(&terms, &lumps).unwrap();

        assert_eq!(schedule.rows[1].kind, RowKind::LumpSum);
        assert_eq!(schedule.rows[1].balance, Money::from_major(9000));
        assert_eq!(schedule.rows[2].interest, Money::from_major(30));
    }

    #[test]
    fn test_misaligned_lump_sum_rejected() {
        let terms = terms(125_000, dec!(5), 10, "September 9 2019");
        // the 20th attributes to the march period but is not its due date
        let lumps = ledger(9, &[("March 20 2020", "5000.00")]);
        let err = AmortizationSchedule::generate(&terms, &lumps).unwrap_err();

        match err {
            ScheduleError::MisalignedLumpSum { period, payment_date, due_date } => {
                assert_eq!(period, PaymentPeriod::new(2020, 3, 9));
                assert_eq!(payment_date, NaiveDate::from_ymd_opt(2020, 3, 20).unwrap());
                assert_eq!(due_date, NaiveDate::from_ymd_opt(2020, 3, 9).unwrap());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lump_sum_after_payoff_ignored() {
        let terms = terms(1_200, dec!(0), 1, "January 10 2021");
        let lumps = ledger(10, &[("June 10 2030", "100")]);
        let schedule = AmortizationSchedule::generate(&terms, &lumps).unwrap();
        assert_eq!(schedule.lump_sums().count(), 0);
        assert_eq!(schedule.rows.len(), 13);
    }
}
