use std::io::Write;
use tabled::settings::{object::Columns, Alignment, Modify, Style};

use crate::errors::Result;
use crate::report::ScheduleReport;

/// plain text table with the summary above and lump sums below
pub struct Table;

impl super::RenderFormat for Table {
    fn render<W: Write>(mut w: W, report: &ScheduleReport) -> Result<()> {
        let lines = report.summary_lines();
        let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in &lines {
            writeln!(w, "{label:<width$}  {value}")?;
        }
        writeln!(w)?;

        let table = tabled::Table::new(report.formatted_rows())
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
            .to_string();
        writeln!(w, "{table}")?;

        let notes = report.lump_sum_notes();
        if !notes.is_empty() {
            writeln!(w)?;
            writeln!(w, "Lump sums")?;
            for note in notes {
                writeln!(w, "  {note}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::render::{fixtures, render_to_string, OutputFormat};

    #[test]
    fn test_table_output() {
        let out = render_to_string(OutputFormat::Table, &fixtures::report()).unwrap();

        assert!(out.starts_with("Loan amount"));
        assert!(out.contains("$12,000.00"));
        assert!(out.contains("lump sum"));
        assert!(out.contains("July 15 2021: $2,000.00 (1,700.00 EUR at 1.1765 as of July 12 2021)"));
    }
}
