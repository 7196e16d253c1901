//! Output formats for a computed schedule.
//!
//! Each format is a plain translation of a [`ScheduleReport`]; nothing here
//! recomputes amounts.

pub mod csv;
pub mod html;
pub mod json;
pub mod markdown;
pub mod table;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::errors::{Result, ScheduleError};
use crate::report::ScheduleReport;

pub use self::csv::Csv;
pub use html::Html;
pub use json::Json;
pub use markdown::Markdown;
pub use table::Table;

/// a way of writing a report
pub trait RenderFormat {
    fn render<W: Write>(w: W, report: &ScheduleReport) -> Result<()>;
}

/// selectable output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// comma separated values
    #[default]
    Csv,
    /// plain text table
    Table,
    /// markdown document
    Markdown,
    /// styled html page
    Html,
    /// the full report as json
    Json,
}

/// write `report` in `format`
pub fn render<W: Write>(format: OutputFormat, w: W, report: &ScheduleReport) -> Result<()> {
    match format {
        OutputFormat::Csv => Csv::render(w, report),
        OutputFormat::Table => Table::render(w, report),
        OutputFormat::Markdown => Markdown::render(w, report),
        OutputFormat::Html => Html::render(w, report),
        OutputFormat::Json => Json::render(w, report),
    }
}

/// render into a string so a failed render leaves nothing half written
pub fn render_to_string(format: OutputFormat, report: &ScheduleReport) -> Result<String> {
    let mut buf = Vec::new();
    render(format, &mut buf, report)?;
    String::from_utf8(buf).map_err(|e| ScheduleError::Render {
        message: format!("output is not utf-8: {e}"),
    })
}
