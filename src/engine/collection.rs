use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::records::{Payment, PaymentMethod};

/// Inclusive date window applied to payment dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// A window only exists when both bounds are given; a single bound means
    /// no filtering at all.
    pub fn from_bounds(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<Self> {
        match (from, to) {
            (Some(from), Some(to)) => Some(Self { from, to }),
            (None, None) => None,
            _ => {
                tracing::debug!(?from, ?to, "single date bound given, not filtering payments");
                None
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedPayment {
    pub payment_id: String,
    pub date: NaiveDate,
    pub customer: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub invoice_id: Option<String>,
}

/// Payments collected from one customer, keyed by the payment's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerCollection {
    pub customer: String,
    pub count: usize,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub window: Option<DateWindow>,
    pub payments: Vec<CollectedPayment>,
    /// First-seen order within the window.
    pub by_customer: Vec<CustomerCollection>,
    pub count: usize,
    /// Sum of the per-method totals.
    pub total: f64,
    by_method: [f64; 4],
}

impl CollectionSummary {
    pub fn method_total(&self, method: PaymentMethod) -> f64 {
        self.by_method[method.index()]
    }

    /// All four methods in display order, zero when unused.
    pub fn by_method(&self) -> impl Iterator<Item = (PaymentMethod, f64)> + '_ {
        PaymentMethod::ALL
            .into_iter()
            .map(|m| (m, self.method_total(m)))
    }
}

pub fn collections(
    payments: &[Payment],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> CollectionSummary {
    let window = DateWindow::from_bounds(from, to);
    let mut by_method = [0.0; 4];
    let mut by_customer: Vec<CustomerCollection> = Vec::new();
    let mut customer_pos: HashMap<&str, usize> = HashMap::new();
    let mut rows = Vec::new();

    for payment in payments
        .iter()
        .filter(|p| window.map_or(true, |w| w.contains(p.date)))
    {
        by_method[payment.method.index()] += payment.amount;

        let pos = *customer_pos.entry(payment.customer.as_str()).or_insert_with(|| {
            by_customer.push(CustomerCollection {
                customer: payment.customer.clone(),
                count: 0,
                amount: 0.0,
            });
            by_customer.len() - 1
        });
        by_customer[pos].count += 1;
        by_customer[pos].amount += payment.amount;

        rows.push(CollectedPayment {
            payment_id: payment.id.clone(),
            date: payment.date,
            customer: payment.customer.clone(),
            amount: payment.amount,
            method: payment.method,
            invoice_id: payment.invoice_id.clone(),
        });
    }

    CollectionSummary {
        window,
        count: rows.len(),
        payments: rows,
        by_customer,
        total: by_method.iter().sum(),
        by_method,
    }
}
