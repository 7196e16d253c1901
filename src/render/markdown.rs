use std::io::Write;
use tabled::settings::Style;

use crate::errors::Result;
use crate::report::ScheduleReport;

/// markdown document: title, summary list, schedule table, lump sum list
pub struct Markdown;

impl super::RenderFormat for Markdown {
    fn render<W: Write>(mut w: W, report: &ScheduleReport) -> Result<()> {
        writeln!(w, "# Amortization schedule")?;
        writeln!(w)?;
        for (label, value) in report.summary_lines() {
            writeln!(w, "- **{label}**: {value}")?;
        }
        writeln!(w)?;

        let table = tabled::Table::new(report.formatted_rows())
            .with(Style::markdown())
            .to_string();
        writeln!(w, "{table}")?;

        let notes = report.lump_sum_notes();
        if !notes.is_empty() {
            writeln!(w)?;
            writeln!(w, "## Lump sums")?;
            writeln!(w)?;
            for note in notes {
                writeln!(w, "- {note}")?;
            }
        }
        Ok(())
    }
}
