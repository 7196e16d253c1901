use std::io::Write;

use crate::errors::{Result, ScheduleError};
use crate::report::ScheduleReport;

/// the full report, amounts as exact decimal strings
pub struct Json;

impl super::RenderFormat for Json {
    fn render<W: Write>(mut w: W, report: &ScheduleReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, report).map_err(|e| ScheduleError::Render {
            message: format!("json: {e}"),
        })?;
        writeln!(w)?;
        Ok(())
    }
}
