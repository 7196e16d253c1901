use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

use crate::config::LoanTerms;
use crate::dates::format_date;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::payments::{AmortizationSchedule, LumpSumLedger, LumpSumPayment};
use crate::types::ScheduleRow;

/// headline figures for a schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub principal: Money,
    pub annual_rate: Rate,
    pub payment_count: u32,
    pub start_date: NaiveDate,
    pub fixed_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub total_lump_sums: Money,
    pub payments_made: u32,
    pub payoff_date: Option<NaiveDate>,
    /// interest avoided compared with paying only the regular payment
    pub interest_saved: Money,
}

/// schedule row as display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct FormattedRow {
    #[tabled(rename = "month")]
    pub month: String,
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    pub kind: String,
    #[tabled(rename = "interest")]
    pub interest: String,
    #[tabled(rename = "principal")]
    pub principal: String,
    #[tabled(rename = "payment")]
    pub payment: String,
    #[tabled(rename = "balance")]
    pub balance: String,
}

impl From<&ScheduleRow> for FormattedRow {
    fn from(row: &ScheduleRow) -> Self {
        Self {
            month: format_date(row.date),
            kind: row.kind.label().to_string(),
            interest: row.interest.to_currency_string(),
            principal: row.principal.to_currency_string(),
            payment: row.payment.to_currency_string(),
            balance: row.balance.to_currency_string(),
        }
    }
}

/// everything a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub summary: ScheduleSummary,
    pub rows: Vec<ScheduleRow>,
    pub lump_sums: Vec<LumpSumPayment>,
}

impl ScheduleReport {
    /// generate the schedule and the no-lump-sum baseline it is compared with
    pub fn build(terms: &LoanTerms, ledger: &LumpSumLedger) -> Result<Self> {
        let schedule = AmortizationSchedule::generate(terms, ledger)?;
        let interest_saved = if ledger.is_empty() {
            Money::ZERO
        } else {
            let baseline = AmortizationSchedule::generate(terms, &LumpSumLedger::empty())?;
            (baseline.total_interest() - schedule.total_interest()).max(Money::ZERO)
        };

        Ok(Self::from_schedule(terms, &schedule, ledger, interest_saved))
    }

    pub fn from_schedule(
        terms: &LoanTerms,
        schedule: &AmortizationSchedule,
        ledger: &LumpSumLedger,
        interest_saved: Money,
    ) -> Self {
        let summary = ScheduleSummary {
            principal: terms.principal,
            annual_rate: terms.annual_rate,
            payment_count: terms.payment_count,
            start_date: terms.start_date,
            fixed_payment: schedule.fixed_payment,
            total_interest: schedule.total_interest(),
            total_paid: schedule.total_paid(),
            total_lump_sums: schedule.total_lump_sums(),
            payments_made: schedule.payments_made(),
            payoff_date: schedule.payoff_date(),
            interest_saved,
        };

        Self {
            summary,
            rows: schedule.rows.clone(),
            lump_sums: ledger.iter().cloned().collect(),
        }
    }

    pub fn formatted_rows(&self) -> Vec<FormattedRow> {
        self.rows.iter().map(FormattedRow::from).collect()
    }

    /// one line per lump sum, with currency conversion notes
    pub fn lump_sum_notes(&self) -> Vec<String> {
        self.lump_sums.iter().map(LumpSumPayment::describe).collect()
    }

    /// label/value pairs for the summary section
    pub fn summary_lines(&self) -> Vec<(&'static str, String)> {
        let s = &self.summary;
        let mut lines = vec![
            ("Loan amount", s.principal.to_currency_string()),
            ("Interest rate", s.annual_rate.to_string()),
            ("Term", format!("{} monthly payments from {}", s.payment_count, format_date(s.start_date))),
            ("Monthly payment", s.fixed_payment.to_currency_string()),
            ("Total interest", s.total_interest.to_currency_string()),
            ("Total paid", s.total_paid.to_currency_string()),
        ];

        if !s.total_lump_sums.is_zero() {
            lines.push(("Lump sums", s.total_lump_sums.to_currency_string()));
            lines.push(("Interest saved", s.interest_saved.to_currency_string()));
        }

        lines.push(("Payments made", s.payments_made.to_string()));
        if let Some(date) = s.payoff_date {
            lines.push(("Paid off", format_date(date)));
        }
        lines
    }
}
