use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::records::{Customer, DataProvider, Invoice, Payment};

pub const CUSTOMERS_FILE: &str = "customers.toml";
pub const INVOICES_FILE: &str = "invoices.toml";
pub const PAYMENTS_FILE: &str = "payments.toml";

#[derive(Debug, Deserialize)]
struct CustomersFile {
    #[serde(default)]
    customers: Vec<Customer>,
}

#[derive(Debug, Default, Deserialize)]
struct InvoicesFile {
    #[serde(default)]
    invoices: Vec<InvoiceEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct PaymentsFile {
    #[serde(default)]
    payments: Vec<Payment>,
}

/// Invoice as stored on disk; `days_overdue` may be left for us to derive.
#[derive(Debug, Deserialize)]
struct InvoiceEntry {
    id: String,
    customer_id: String,
    amount: f64,
    balance: f64,
    due_date: NaiveDate,
    #[serde(default)]
    days_overdue: Option<u32>,
}

impl InvoiceEntry {
    fn into_invoice(self, as_of: NaiveDate) -> Invoice {
        let days_overdue = self
            .days_overdue
            .unwrap_or_else(|| days_overdue(self.due_date, as_of));
        Invoice {
            id: self.id,
            customer_id: self.customer_id,
            amount: self.amount,
            balance: self.balance,
            due_date: self.due_date,
            days_overdue,
        }
    }
}

/// Whole days past due as of `as_of`, zero when not yet due.
pub fn days_overdue(due_date: NaiveDate, as_of: NaiveDate) -> u32 {
    let days = (as_of - due_date).num_days();
    days.clamp(0, i64::from(u32::MAX)) as u32
}

fn read_toml<T: DeserializeOwned>(path: PathBuf) -> Result<T> {
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ReportError::ConfigParse { path, source: e })
}

/// Reads record collections from TOML files in the config directory.
#[derive(Debug, Clone)]
pub struct FileDataProvider {
    dir: PathBuf,
    as_of: NaiveDate,
}

impl FileDataProvider {
    pub fn new(dir: &Path, as_of: NaiveDate) -> Self {
        Self {
            dir: dir.to_path_buf(),
            as_of,
        }
    }

    /// Missing optional files read as empty collections.
    fn optional<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "record file missing, using empty collection");
            return Ok(T::default());
        }
        read_toml(path)
    }
}

impl DataProvider for FileDataProvider {
    fn list_customers(&self) -> Result<Vec<Customer>> {
        let path = self.dir.join(CUSTOMERS_FILE);
        if !path.exists() {
            return Err(ReportError::ConfigFileNotFound(path));
        }
        let file: CustomersFile = read_toml(path)?;
        Ok(file.customers)
    }

    fn list_invoices(&self) -> Result<Vec<Invoice>> {
        let file: InvoicesFile = self.optional(INVOICES_FILE)?;
        Ok(file
            .invoices
            .into_iter()
            .map(|entry| entry.into_invoice(self.as_of))
            .collect())
    }

    fn list_payments(&self) -> Result<Vec<Payment>> {
        let file: PaymentsFile = self.optional(PAYMENTS_FILE)?;
        Ok(file.payments)
    }
}
