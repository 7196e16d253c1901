use csv::WriterBuilder;
use std::io::Write;

use crate::errors::Result;
use crate::report::ScheduleReport;

/// `month,type,interest,principal,payment,balance` with one row per schedule line
pub struct Csv;

impl super::RenderFormat for Csv {
    fn render<W: Write>(w: W, report: &ScheduleReport) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(w);
        for row in report.formatted_rows() {
            wrt.serialize(row)?;
        }
        wrt.flush()?;
        Ok(())
    }
}
