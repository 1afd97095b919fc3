mod data;
mod settings;

pub use data::{days_overdue, FileDataProvider, CUSTOMERS_FILE, INVOICES_FILE, PAYMENTS_FILE};
pub use settings::{CompanySettings, Config, OutputSettings, ReportSettings};

use crate::error::{ReportError, Result};
use crate::report::is_valid_date_format;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

/// Get the config directory path (XDG config dir or ~/.receivables/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "receivables") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".receivables"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Output directory from config; relative paths hang off the config dir.
pub fn resolve_output_dir(output_dir: &str, cfg_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        cfg_dir.join(expanded)
    }
}

/// Load the main config.toml
pub fn load_config(cfg_dir: &Path) -> Result<Config> {
    let path = cfg_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Err(ReportError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    let config: Config =
        toml::from_str(&content).map_err(|e| ReportError::ConfigParse { path, source: e })?;
    if !is_valid_date_format(&config.report.date_format) {
        return Err(ReportError::InvalidDateFormat(config.report.date_format));
    }
    Ok(config)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "Your Company Name"

[report]
currency_symbol = "$"
date_format = "%B %d, %Y"   # e.g., October 17, 2026

[output]
dir = "output"              # relative to this directory, or an absolute path
"#;

/// Template content for customers.toml
pub const CUSTOMERS_TEMPLATE: &str = r#"# Customers appear in reports in the order listed here.
# status is one of: active, inactive, blocked

[[customers]]
id = "C001"
name = "Acme Corp"
credit_limit = 200000.0
current_balance = 45000.0
status = "active"

[[customers]]
id = "C002"
name = "Globex Ltd"
credit_limit = 50000.0
current_balance = 12500.0
status = "active"

[[customers]]
id = "C003"
name = "Initech"
credit_limit = 0.0
current_balance = 0.0
status = "inactive"
"#;

/// Template content for invoices.toml
pub const INVOICES_TEMPLATE: &str = r#"# customer_id must match an id in customers.toml.
# days_overdue is optional; when omitted it is derived from due_date
# and the --as-of date (default: today).

[[invoices]]
id = "INV-1001"
customer_id = "C001"
amount = 30000.0
balance = 20000.0
due_date = "2026-10-31"
days_overdue = 0

[[invoices]]
id = "INV-1002"
customer_id = "C001"
amount = 15000.0
balance = 15000.0
due_date = "2026-10-02"
days_overdue = 15

[[invoices]]
id = "INV-1003"
customer_id = "C001"
amount = 10000.0
balance = 10000.0
due_date = "2026-09-02"
days_overdue = 45

[[invoices]]
id = "INV-2001"
customer_id = "C002"
amount = 5000.0
balance = 5000.0
due_date = "2026-08-03"
days_overdue = 75

[[invoices]]
id = "INV-2002"
customer_id = "C002"
amount = 7500.0
balance = 7500.0
due_date = "2026-06-19"
days_overdue = 120

[[invoices]]
id = "INV-2003"
customer_id = "C002"
amount = 3000.0
balance = 0.0
due_date = "2026-03-31"
days_overdue = 200
"#;

/// Template content for payments.toml
pub const PAYMENTS_TEMPLATE: &str = r#"# customer is the customer's display name from customers.toml.
# method is one of: cash, check, transfer, card

[[payments]]
id = "PAY-001"
customer = "Acme Corp"
amount = 10000.0
method = "transfer"
date = "2026-09-01"
invoice_id = "INV-1001"

[[payments]]
id = "PAY-002"
customer = "Acme Corp"
amount = 5000.0
method = "transfer"
date = "2026-09-15"

[[payments]]
id = "PAY-003"
customer = "Acme Corp"
amount = 2000.0
method = "check"
date = "2026-10-01"

[[payments]]
id = "PAY-004"
customer = "Globex Ltd"
amount = 3000.0
method = "card"
date = "2026-09-20"
invoice_id = "INV-2003"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::DataProvider;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_templates_parse() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), CONFIG_TEMPLATE).unwrap();
        fs::write(dir.path().join(CUSTOMERS_FILE), CUSTOMERS_TEMPLATE).unwrap();
        fs::write(dir.path().join(INVOICES_FILE), INVOICES_TEMPLATE).unwrap();
        fs::write(dir.path().join(PAYMENTS_FILE), PAYMENTS_TEMPLATE).unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.report.currency_symbol, "$");

        let as_of = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let records = FileDataProvider::new(dir.path(), as_of).snapshot().unwrap();
        assert_eq!(records.customers.len(), 3);
        assert_eq!(records.invoices.len(), 6);
        assert_eq!(records.payments.len(), 4);
        assert!(records.integrity_issues().is_empty());
    }

    #[test]
    fn test_config_sections_are_optional() {
        let config: Config = toml::from_str("[company]\nname = \"Acme\"\n").unwrap();
        assert_eq!(config.company.name, "Acme");
        assert_eq!(config.report.date_format, "%B %d, %Y");
        assert_eq!(config.output.dir, "output");
    }

    #[test]
    fn test_invalid_date_format_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[report]\ndate_format = \"%Q\"\n",
        )
        .unwrap();

        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::InvalidDateFormat(ref f) if f == "%Q"));
        assert!(err.to_string().contains("Invalid date_format '%Q'"));
    }

    #[test]
    fn test_resolve_output_dir() {
        let cfg = Path::new("/tmp/receivables");
        assert_eq!(
            resolve_output_dir("output", cfg),
            PathBuf::from("/tmp/receivables/output")
        );
        assert_eq!(
            resolve_output_dir("/var/reports", cfg),
            PathBuf::from("/var/reports")
        );
    }
}
