use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates::{days_in_month, month_name};
use crate::decimal::Money;

/// one recurring payment slot, keyed on the contractual payment day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaymentPeriod {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PaymentPeriod {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// the period in the same month as `date`, on the contractual day
    pub fn containing(date: NaiveDate, contractual_day: u32) -> Self {
        Self::new(date.year(), date.month(), contractual_day)
    }

    /// the period one month earlier, same contractual day
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12, self.day)
        } else {
            Self::new(self.year, self.month - 1, self.day)
        }
    }

    /// the calendar date this period falls due, clamped to the month's length
    pub fn due_date(&self) -> Option<NaiveDate> {
        let day = self.day.clamp(1, days_in_month(self.year, self.month));
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

impl fmt::Display for PaymentPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", month_name(self.month), self.day, self.year)
    }
}

/// what produced a schedule row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// the regular contractual payment (or the opening balance line)
    Loan,
    /// an extra payment applied straight to principal
    LumpSum,
}

impl RowKind {
    pub fn label(&self) -> &'static str {
        match self {
            RowKind::Loan => "loan",
            RowKind::LumpSum => "lump sum",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// one line of the amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 0 for the opening line, then 1..=payment count
    pub period: u32,
    pub date: NaiveDate,
    pub kind: RowKind,
    pub interest: Money,
    pub principal: Money,
    pub payment: Money,
    pub balance: Money,
}

impl ScheduleRow {
    pub fn is_lump_sum(&self) -> bool {
        self.kind == RowKind::LumpSum
    }
}
