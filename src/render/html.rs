use std::io::Write;

use crate::errors::Result;
use crate::report::ScheduleReport;

const STYLESHEET: &str = "\
body{box-sizing:border-box;min-width:200px;max-width:980px;margin:0 auto;padding:45px;\
font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",Helvetica,Arial,sans-serif;\
font-size:16px;line-height:1.5;color:#24292e}\
h1,h2{border-bottom:1px solid #eaecef;padding-bottom:.3em}\
table{border-collapse:collapse;width:100%}\
th,td{padding:6px 13px;border:1px solid #dfe2e5}\
td.amount{text-align:right;font-variant-numeric:tabular-nums}\
tr:nth-child(2n){background-color:#f6f8fa}\
tr.lump-sum{background-color:#e6ffed}\
dl{display:grid;grid-template-columns:max-content auto;gap:.25em 1em}\
dt{font-weight:600}dd{margin:0}";

/// standalone styled page
pub struct Html;

impl super::RenderFormat for Html {
    fn render<W: Write>(mut w: W, report: &ScheduleReport) -> Result<()> {
        writeln!(w, "<!DOCTYPE html>")?;
        writeln!(w, "<html>\n<head>")?;
        writeln!(w, "<meta charset=\"utf-8\">")?;
        writeln!(w, "<title>Amortization schedule</title>")?;
        writeln!(w, "<style>\n{STYLESHEET}\n</style>")?;
        writeln!(w, "</head>\n<body>")?;
        writeln!(w, "<h1>Amortization schedule</h1>")?;

        writeln!(w, "<dl>")?;
        for (label, value) in report.summary_lines() {
            writeln!(w, "<dt>{}</dt><dd>{}</dd>", escape(label), escape(&value))?;
        }
        writeln!(w, "</dl>")?;

        writeln!(w, "<table>")?;
        writeln!(
            w,
            "<thead><tr><th>month</th><th>type</th><th>interest</th><th>principal</th><th>payment</th><th>balance</th></tr></thead>"
        )?;
        writeln!(w, "<tbody>")?;
        for (row, text) in report.rows.iter().zip(report.formatted_rows()) {
            let class = if row.is_lump_sum() { " class=\"lump-sum\"" } else { "" };
            writeln!(
                w,
                "<tr{class}><td>{}</td><td>{}</td><td class=\"amount\">{}</td><td class=\"amount\">{}</td><td class=\"amount\">{}</td><td class=\"amount\">{}</td></tr>",
                escape(&text.month),
                escape(&text.kind),
                escape(&text.interest),
                escape(&text.principal),
                escape(&text.payment),
                escape(&text.balance),
            )?;
        }
        writeln!(w, "</tbody>\n</table>")?;

        let notes = report.lump_sum_notes();
        if !notes.is_empty() {
            writeln!(w, "<h2>Lump sums</h2>\n<ul>")?;
            for note in notes {
                writeln!(w, "<li>{}</li>", escape(&note))?;
            }
            writeln!(w, "</ul>")?;
        }

        writeln!(w, "</body>\n</html>")?;
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
