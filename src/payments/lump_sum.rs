use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::dates::{format_date, ParsedDate};
use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::input::{read_lump_sum_records, LumpSumRecord};
use crate::types::PaymentPeriod;

/// fields in a plain `date,amount` record
pub const BASIC_FIELDS: usize = 2;
/// fields in a record carrying its currency conversion
pub const EXTENDED_FIELDS: usize = 6;

/// how a lump sum was converted from the currency it was paid in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConversion {
    pub original_amount: Money,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub rate_date: NaiveDate,
}

/// an extra payment applied to principal on a payment date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSumPayment {
    pub period: PaymentPeriod,
    pub payment_date: NaiveDate,
    /// amount in loan currency; the only figure the schedule uses
    pub amount: Money,
    pub conversion: Option<CurrencyConversion>,
    /// line in the source file
    pub line: usize,
}

impl LumpSumPayment {
    /// one-line description for the report, e.g.
    /// `June 1 2020: $5,000.00 (4,500.00 EUR at 1.1111 as of May 29 2020)`
    pub fn describe(&self) -> String {
        let base = format!("{}: {}", format_date(self.payment_date), self.amount.to_currency_string());
        match &self.conversion {
            Some(c) => format!(
                "{base} ({} {} at {} as of {})",
                c.original_amount.to_grouped_string(),
                c.currency,
                c.exchange_rate.normalize(),
                format_date(c.rate_date),
            ),
            None => base,
        }
    }
}

/// the lump sums of a loan, at most one per payment period
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LumpSumLedger {
    payments: BTreeMap<PaymentPeriod, LumpSumPayment>,
}

impl LumpSumLedger {
    /// ledger with no lump sums
    pub fn empty() -> Self {
        Self::default()
    }

    /// read csv records and build the ledger
    pub fn from_reader<R: Read>(reader: R, contractual_day: u32) -> Result<Self> {
        let records = read_lump_sum_records(reader)?;
        Self::from_records(&records, contractual_day)
    }

    /// build from parsed records
    ///
    /// the first record may be a header: if its date or amount does not parse
    /// it is skipped. on any later record the same failure is fatal.
    pub fn from_records(records: &[LumpSumRecord], contractual_day: u32) -> Result<Self> {
        let mut payments = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            let payment = match parse_record(record, contractual_day) {
                Ok(payment) => payment,
                Err(RecordError::Header(reason)) if index == 0 => {
                    warn!(line = record.line, "skipping what looks like a header row: {reason}");
                    continue;
                }
                Err(RecordError::Header(reason)) | Err(RecordError::Fatal(reason)) => {
                    return Err(ScheduleError::malformed(record.line, reason));
                }
            };

            if payments.contains_key(&payment.period) {
                return Err(ScheduleError::DuplicateLumpSum {
                    period: payment.period,
                    line: record.line,
                });
            }

            debug!(
                line = record.line,
                period = %payment.period,
                amount = %payment.amount,
                "lump sum recorded"
            );
            payments.insert(payment.period, payment);
        }

        info!(count = payments.len(), "lump sum ledger built");
        Ok(Self { payments })
    }

    /// the lump sum for a period, if any
    pub fn get(&self, period: &PaymentPeriod) -> Option<&LumpSumPayment> {
        self.payments.get(period)
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// lump sums in period order
    pub fn iter(&self) -> impl Iterator<Item = &LumpSumPayment> {
        self.payments.values()
    }
}

/// attribute a payment date to its period
///
/// a payment made before this month's due date settles the previous cycle.
pub fn normalize_period(payment_date: NaiveDate, contractual_day: u32) -> PaymentPeriod {
    let period = PaymentPeriod::containing(payment_date, contractual_day);
    match period.due_date() {
        Some(due) if payment_date < due => period.previous(),
        _ => period,
    }
}

enum RecordError {
    /// date or amount unparsable; tolerated on the first record
    Header(String),
    Fatal(String),
}

fn parse_record(record: &LumpSumRecord, contractual_day: u32) -> std::result::Result<LumpSumPayment, RecordError> {
    let fields = &record.fields;
    if fields.len() != BASIC_FIELDS && fields.len() != EXTENDED_FIELDS {
        return Err(RecordError::Fatal(format!(
            "expected {BASIC_FIELDS} fields (date,amount) or {EXTENDED_FIELDS} fields \
             (date,amount,original amount,currency,exchange rate,rate date) but found {}",
            fields.len()
        )));
    }

    let payment_date = ParsedDate::parse(&fields[0])
        .and_then(|parsed| parsed.resolve(contractual_day))
        .ok_or_else(|| {
            RecordError::Header(format!(
                "payment date '{}' should look like 'January 2 2006' or 'January 2006'",
                fields[0]
            ))
        })?;

    let amount = Money::from_str_exact(&fields[1])
        .map_err(|e| RecordError::Header(format!("payment amount '{}': {e}", fields[1])))?;

    if !amount.is_positive() {
        return Err(RecordError::Fatal(format!("payment amount must be positive, got {amount}")));
    }

    let conversion = if fields.len() == EXTENDED_FIELDS {
        parse_conversion(&fields[2..]).map_err(RecordError::Fatal)?
    } else {
        None
    };

    Ok(LumpSumPayment {
        period: normalize_period(payment_date, contractual_day),
        payment_date,
        amount,
        conversion,
        line: record.line,
    })
}

fn parse_conversion(fields: &[String]) -> std::result::Result<Option<CurrencyConversion>, String> {
    if fields.iter().all(|f| f.is_empty()) {
        return Ok(None);
    }
    if fields.iter().any(|f| f.is_empty()) {
        return Err("currency conversion needs original amount, currency, exchange rate and rate date".to_string());
    }

    let original_amount = Money::from_str_exact(&fields[0])
        .map_err(|e| format!("original amount '{}': {e}", fields[0]))?;

    let currency = fields[1].to_ascii_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("currency '{}' should be a three letter code such as EUR", fields[1]));
    }

    let exchange_rate = Decimal::from_str(&fields[2])
        .map_err(|e| format!("exchange rate '{}': {e}", fields[2]))?;
    if exchange_rate <= Decimal::ZERO {
        return Err(format!("exchange rate must be positive, got {exchange_rate}"));
    }

    let rate_date = ParsedDate::parse(&fields[3])
        .and_then(|parsed| parsed.resolve(1))
        .ok_or_else(|| format!("exchange rate date '{}' is not a date", fields[3]))?;

    Ok(Some(CurrencyConversion {
        original_amount,
        currency,
        exchange_rate,
        rate_date,
    }))
}
