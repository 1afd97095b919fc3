use serde::Serialize;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use crate::error::{ReportError, Result};
use crate::report::ReportSection;

/// Everything the PDF template reads.
#[derive(Debug, Serialize)]
pub struct PdfReport<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub generated_date: String,
    pub sections: &'a [ReportSection],
}

/// Embedded Typst template; the first section is drawn as a summary block
/// and the rest as full-width tables.
const REPORT_TEMPLATE: &str = r##"// Receivables Report Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "us-letter",
  flipped: true,
  margin: (top: 0.75in, bottom: 0.75in, left: 0.75in, right: 0.75in),
)

#set text(font: "Helvetica", size: 9pt)

#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 18pt, weight: "bold")[#data.company]
  ],
  [
    #text(size: 20pt, weight: "bold")[#upper(data.title)]
    #v(0.5em)
    #text(size: 10pt, fill: gray)[Generated #data.generated_date]
  ]
)

#v(1em)
#line(length: 100%, stroke: 0.5pt + gray)
#v(1em)

#let summary = data.sections.at(0)

#table(
  columns: (auto, auto),
  stroke: none,
  align: (left, right),
  inset: 4pt,
  ..summary.rows.map(row => ([*#row.at(0)*], row.at(1))).flatten()
)

#for section in data.sections.slice(1) [
  #v(1.5em)
  #text(weight: "bold", size: 11pt)[#section.title]
  #v(0.3em)
  #table(
    columns: section.columns.len(),
    align: (x, y) => if x == 0 { left } else { right },
    stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else if y > 0 { (bottom: 0.5pt + gray) },
    inset: 6pt,
    fill: (x, y) => if y == 0 { luma(240) } else { none },

    ..section.columns.map(c => [*#c*]),
    ..section.rows.flatten()
  )
  #if section.rows.len() == 0 [
    #text(fill: gray)[No entries.]
  ]
]
"##;

const DATA_FILE: &str = "report_data.json";
const TEMPLATE_FILE: &str = "report.typ";

/// Write the data and template into a fresh directory removed on drop.
fn stage_report(report: &PdfReport<'_>) -> Result<TempDir> {
    let dir = tempfile::Builder::new().prefix("receivables-").tempdir()?;
    std::fs::write(dir.path().join(DATA_FILE), serde_json::to_string(report)?)?;
    std::fs::write(
        dir.path().join(TEMPLATE_FILE),
        REPORT_TEMPLATE.replace("DATA_JSON_PATH", DATA_FILE),
    )?;
    Ok(dir)
}

/// Generate a report PDF using the Typst CLI
pub fn generate_report_pdf(report: &PdfReport<'_>, output_path: &Path) -> Result<()> {
    // Check if typst is available
    let typst_check = Command::new("typst").arg("--version").output();

    if typst_check.is_err() {
        return Err(ReportError::TypstNotFound);
    }

    let staging = stage_report(report)?;

    tracing::debug!(path = %output_path.display(), "compiling report with typst");
    let output = Command::new("typst")
        .arg("compile")
        .arg("--root")
        .arg(staging.path())
        .arg(staging.path().join(TEMPLATE_FILE))
        .arg(output_path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReportError::PdfGeneration(stderr.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_placeholder_is_replaced() {
        let content = REPORT_TEMPLATE.replace("DATA_JSON_PATH", "report_data.json");
        assert!(content.contains("json(\"report_data.json\")"));
        assert!(!content.contains("DATA_JSON_PATH"));
    }

    #[test]
    fn test_staging_dirs_are_private_and_cleaned_up() {
        let sections = vec![ReportSection::new("Summary", &["Field", "Value"])];
        let report = PdfReport {
            title: "Aging",
            company: "Acme",
            generated_date: "October 01, 2026".to_string(),
            sections: &sections,
        };

        let first = stage_report(&report).unwrap();
        let second = stage_report(&report).unwrap();
        assert_ne!(first.path(), second.path());

        let data = std::fs::read_to_string(first.path().join(DATA_FILE)).unwrap();
        assert!(data.contains("\"company\":\"Acme\""));
        let template = std::fs::read_to_string(first.path().join(TEMPLATE_FILE)).unwrap();
        assert!(template.contains("json(\"report_data.json\")"));

        let path = first.path().to_path_buf();
        drop(first);
        assert!(!path.exists());
    }

    #[test]
    fn test_pdf_payload_shape() {
        let sections = vec![ReportSection::new("Summary", &["Field", "Value"])];
        let report = PdfReport {
            title: "Customer Balances",
            company: "Acme",
            generated_date: "October 01, 2026".to_string(),
            sections: &sections,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["title"], "Customer Balances");
        assert_eq!(value["sections"][0]["columns"][1], "Value");
    }
}
