//! Read-only record snapshots consumed by the reporting engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Blocked,
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerStatus::Active => write!(f, "active"),
            CustomerStatus::Inactive => write!(f, "inactive"),
            CustomerStatus::Blocked => write!(f, "blocked"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Check,
    Transfer,
    Card,
}

impl PaymentMethod {
    /// Fixed display order used by every per-method breakdown.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Check,
        PaymentMethod::Transfer,
        PaymentMethod::Card,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Check => "check",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Card => "card",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PaymentMethod::Cash => 0,
            PaymentMethod::Check => 1,
            PaymentMethod::Transfer => 2,
            PaymentMethod::Card => 3,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub credit_limit: f64,
    #[serde(default)]
    pub current_balance: f64,
    pub status: CustomerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    pub amount: f64,
    /// Outstanding balance; zero means fully settled.
    pub balance: f64,
    pub due_date: NaiveDate,
    pub days_overdue: u32,
}

impl Invoice {
    pub fn is_open(&self) -> bool {
        self.balance > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    /// Customer display name, not identifier.
    pub customer: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    #[serde(default)]
    pub invoice_id: Option<String>,
}

/// Source of record collections for one report invocation.
pub trait DataProvider {
    fn list_customers(&self) -> Result<Vec<Customer>>;
    fn list_invoices(&self) -> Result<Vec<Invoice>>;
    fn list_payments(&self) -> Result<Vec<Payment>>;

    fn snapshot(&self) -> Result<RecordSet> {
        Ok(RecordSet::new(
            self.list_customers()?,
            self.list_invoices()?,
            self.list_payments()?,
        ))
    }
}

/// Immutable snapshot of every collection a report reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
    pub payments: Vec<Payment>,
}

impl RecordSet {
    pub fn new(customers: Vec<Customer>, invoices: Vec<Invoice>, payments: Vec<Payment>) -> Self {
        Self {
            customers,
            invoices,
            payments,
        }
    }

    /// Referential and naming problems in the snapshot, in discovery order.
    ///
    /// Reports never change because of these; they are surfaced so that an
    /// operator can fix the upstream data.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        let mut seen_ids = HashSet::new();
        for customer in &self.customers {
            if !seen_ids.insert(customer.id.as_str()) {
                issues.push(IntegrityIssue::DuplicateCustomerId {
                    id: customer.id.clone(),
                });
            }
        }

        let mut by_name: Vec<(&str, Vec<String>)> = Vec::new();
        for customer in &self.customers {
            match by_name.iter_mut().find(|(name, _)| *name == customer.name) {
                Some((_, ids)) => ids.push(customer.id.clone()),
                None => by_name.push((customer.name.as_str(), vec![customer.id.clone()])),
            }
        }
        for (name, ids) in by_name {
            if ids.len() > 1 {
                issues.push(IntegrityIssue::DuplicateCustomerName {
                    name: name.to_string(),
                    ids,
                });
            }
        }

        for invoice in &self.invoices {
            if !seen_ids.contains(invoice.customer_id.as_str()) {
                issues.push(IntegrityIssue::UnknownInvoiceCustomer {
                    invoice: invoice.id.clone(),
                    customer: invoice.customer_id.clone(),
                });
            }
        }

        let names: HashSet<&str> = self.customers.iter().map(|c| c.name.as_str()).collect();
        for payment in &self.payments {
            if !names.contains(payment.customer.as_str()) {
                issues.push(IntegrityIssue::UnknownPaymentCustomer {
                    payment: payment.id.clone(),
                    customer: payment.customer.clone(),
                });
            }
        }

        issues
    }
}

impl DataProvider for RecordSet {
    fn list_customers(&self) -> Result<Vec<Customer>> {
        Ok(self.customers.clone())
    }

    fn list_invoices(&self) -> Result<Vec<Invoice>> {
        Ok(self.invoices.clone())
    }

    fn list_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    DuplicateCustomerId { id: String },
    /// Payments are matched by display name, so these customers share payments.
    DuplicateCustomerName { name: String, ids: Vec<String> },
    UnknownInvoiceCustomer { invoice: String, customer: String },
    UnknownPaymentCustomer { payment: String, customer: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::DuplicateCustomerId { id } => {
                write!(f, "customer id '{id}' is used more than once")
            }
            IntegrityIssue::DuplicateCustomerName { name, ids } => write!(
                f,
                "customers {} share the name '{name}'; their payments are merged",
                ids.join(", ")
            ),
            IntegrityIssue::UnknownInvoiceCustomer { invoice, customer } => write!(
                f,
                "invoice '{invoice}' references unknown customer id '{customer}'"
            ),
            IntegrityIssue::UnknownPaymentCustomer { payment, customer } => write!(
                f,
                "payment '{payment}' references unknown customer '{customer}'"
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn customer(id: &str, name: &str, credit_limit: f64, current_balance: f64) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            credit_limit,
            current_balance,
            status: CustomerStatus::Active,
        }
    }

    pub fn invoice(id: &str, customer_id: &str, balance: f64, days_overdue: u32) -> Invoice {
        Invoice {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            amount: balance.max(1.0),
            balance,
            due_date: date(2026, 1, 1),
            days_overdue,
        }
    }

    pub fn payment(id: &str, customer: &str, amount: f64, method: PaymentMethod) -> Payment {
        Payment {
            id: id.to_string(),
            customer: customer.to_string(),
            amount,
            method,
            date: date(2026, 3, 1),
            invoice_id: None,
        }
    }
}
