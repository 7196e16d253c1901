use chrono::NaiveDate;
use thiserror::Error;

use crate::types::PaymentPeriod;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("malformed lump sum record at line {line}: {message}")]
    MalformedRecord {
        line: usize,
        message: String,
    },

    #[error("duplicate lump sum at line {line}: period {period} already has a lump sum payment")]
    DuplicateLumpSum {
        period: PaymentPeriod,
        line: usize,
    },

    #[error("lump sum for period {period} paid on {payment_date} but the payment is due on {due_date}; lump sums must fall on the contractual payment date")]
    MisalignedLumpSum {
        period: PaymentPeriod,
        payment_date: NaiveDate,
        due_date: NaiveDate,
    },

    #[error("calculation error: {message}")]
    Calculation {
        message: String,
    },

    #[error("render error: {message}")]
    Render {
        message: String,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScheduleError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        ScheduleError::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        ScheduleError::MalformedRecord {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
