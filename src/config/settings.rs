use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::{ReportContext, DEFAULT_DATE_FORMAT};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub company: CompanySettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompanySettings {
    pub name: String,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            name: "Your Company Name".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReportSettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputSettings {
    /// Relative paths resolve against the config directory.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Config {
    pub fn report_context(&self, generated_on: NaiveDate) -> ReportContext {
        ReportContext {
            company: self.company.name.clone(),
            currency_symbol: self.report.currency_symbol.clone(),
            date_format: self.report.date_format.clone(),
            generated_on,
        }
    }
}
