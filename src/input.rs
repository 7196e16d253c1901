//! Lump sum file reading.
//!
//! The file is plain csv with no required header:
//! `payment date,amount[,original amount,currency,exchange rate,rate date]`.
//! Fields are kept as text so amounts are parsed exactly later on.

use csv::{ReaderBuilder, Trim};
use std::io::Read;

use crate::errors::Result;

/// one csv record with the line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumpSumRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

/// read every non-empty record
pub fn read_lump_sum_records<R: Read>(reader: R) -> Result<Vec<LumpSumRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(index + 1);

        records.push(LumpSumRecord {
            line,
            fields: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(records)
}
