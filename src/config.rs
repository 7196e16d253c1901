use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::{add_months, ParsedDate};
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// raw loan inputs as supplied on the command line or in a json config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    /// initial loan amount
    pub loan_amount: Money,
    /// annual interest rate as a percentage (5 for 5%)
    pub interest_percent: Decimal,
    /// term in years
    pub years: u32,
    /// first contractual payment date, e.g. `September 9 2019`
    pub start_date: String,
}

impl LoanConfig {
    pub fn new(
        loan_amount: Money,
        interest_percent: Decimal,
        years: u32,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            loan_amount,
            interest_percent,
            years,
            start_date: start_date.into(),
        }
    }

    /// load from json text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ScheduleError::invalid_input(format!("loan config: {e}")))
    }

    /// validate and derive the immutable loan terms
    pub fn to_terms(&self) -> Result<LoanTerms> {
        let start_date = ParsedDate::parse(&self.start_date)
            .and_then(|parsed| parsed.resolve(1))
            .ok_or_else(|| {
                ScheduleError::invalid_input(format!(
                    "start date '{}' should look like 'September 9 2019'",
                    self.start_date
                ))
            })?;

        LoanTerms::new(
            self.loan_amount,
            Rate::from_percentage(self.interest_percent),
            self.years,
            start_date,
        )
    }
}

/// immutable terms the schedule is generated from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub monthly_rate: Rate,
    pub payment_count: u32,
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Rate, years: u32, start_date: NaiveDate) -> Result<Self> {
        if !principal.is_positive() {
            return Err(ScheduleError::invalid_input(format!(
                "loan amount must be positive, got {principal}"
            )));
        }

        if annual_rate.is_negative() {
            return Err(ScheduleError::invalid_input(format!(
                "interest rate must not be negative, got {annual_rate}"
            )));
        }

        if years == 0 {
            return Err(ScheduleError::invalid_input("term must be at least one year"));
        }

        let payment_count = years.checked_mul(12).ok_or_else(|| {
            ScheduleError::invalid_input(format!("term of {years} years is too long"))
        })?;

        // every period date must be representable
        if add_months(start_date, payment_count).is_none() {
            return Err(ScheduleError::invalid_input(format!(
                "term of {years} years from {start_date} runs past the supported calendar"
            )));
        }

        Ok(Self {
            principal,
            annual_rate,
            monthly_rate: annual_rate.monthly_rate(),
            payment_count,
            start_date,
        })
    }

    /// day of month regular payments fall due
    pub fn contractual_day(&self) -> u32 {
        self.start_date.day()
    }

    /// payment date of period `n` (period 0 is the start date)
    pub fn period_date(&self, n: u32) -> Result<NaiveDate> {
        add_months(self.start_date, n).ok_or_else(|| ScheduleError::Calculation {
            message: format!("period {n} date overflows the calendar"),
        })
    }
}
