//! Renderers that turn report sections into terminal, CSV, JSON or PDF output.

mod typst;

pub use typst::{generate_report_pdf, PdfReport};

use std::io::Write;
use tabled::{builder::Builder, settings::Style};

use crate::error::Result;
use crate::report::ReportSection;

/// One rounded table per section, each preceded by its title.
pub fn render_table(sections: &[ReportSection]) -> String {
    let mut out = String::new();
    for (idx, section) in sections.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&section.title);
        out.push('\n');

        let mut builder = Builder::default();
        builder.push_record(section.columns.iter().map(|c| c.to_uppercase()));
        for row in &section.rows {
            builder.push_record(row.iter().cloned());
        }
        let table = builder.build().with(Style::rounded()).to_string();
        out.push_str(&table);
        out.push('\n');
    }
    out
}

/// Sections separated by a blank line: a title record, the header record,
/// then rows.
pub fn write_csv<W: Write>(sections: &[ReportSection], writer: W) -> Result<()> {
    let mut builder = csv::WriterBuilder::new();
    builder.flexible(true);
    let mut wtr = builder.from_writer(writer);
    for (idx, section) in sections.iter().enumerate() {
        if idx > 0 {
            // An empty csv record is written as `""`, so go around the encoder.
            wtr.flush()?;
            let mut inner = wtr.into_inner().map_err(|e| e.into_error())?;
            inner.write_all(b"\n")?;
            wtr = builder.from_writer(inner);
        }
        wtr.write_record([section.title.as_str()])?;
        wtr.write_record(&section.columns)?;
        for row in &section.rows {
            wtr.write_record(row)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn render_json(sections: &[ReportSection]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sections)?)
}
