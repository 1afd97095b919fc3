use serde::Serialize;

use super::CustomerIndex;
use crate::records::{Customer, Invoice};

/// Day ranges used to group outstanding balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AgingBucket {
    Current,
    Days1To30,
    Days31To60,
    Days61To90,
    Over90,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 5] = [
        AgingBucket::Current,
        AgingBucket::Days1To30,
        AgingBucket::Days31To60,
        AgingBucket::Days61To90,
        AgingBucket::Over90,
    ];

    /// Every bucket except `Current`.
    pub const OVERDUE: [AgingBucket; 4] = [
        AgingBucket::Days1To30,
        AgingBucket::Days31To60,
        AgingBucket::Days61To90,
        AgingBucket::Over90,
    ];

    /// Both ends of each range are inclusive: 30 is `Days1To30`, 31 is `Days31To60`.
    pub fn for_days_overdue(days: u32) -> Self {
        match days {
            0 => AgingBucket::Current,
            1..=30 => AgingBucket::Days1To30,
            31..=60 => AgingBucket::Days31To60,
            61..=90 => AgingBucket::Days61To90,
            _ => AgingBucket::Over90,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgingBucket::Current => "Current",
            AgingBucket::Days1To30 => "1-30 Days",
            AgingBucket::Days31To60 => "31-60 Days",
            AgingBucket::Days61To90 => "61-90 Days",
            AgingBucket::Over90 => "Over 90 Days",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            AgingBucket::Current => 0,
            AgingBucket::Days1To30 => 1,
            AgingBucket::Days31To60 => 2,
            AgingBucket::Days61To90 => 3,
            AgingBucket::Over90 => 4,
        }
    }
}

/// Outstanding balances of one customer split by bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingRow {
    pub customer_id: String,
    pub customer_name: String,
    buckets: [f64; 5],
    /// Taken from the customer record, not recomputed from the buckets.
    pub total_balance: f64,
}

impl AgingRow {
    pub fn bucket(&self, bucket: AgingBucket) -> f64 {
        self.buckets[bucket.index()]
    }

    pub fn bucket_sum(&self) -> f64 {
        self.buckets.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingSummary {
    pub rows: Vec<AgingRow>,
    totals: [f64; 5],
    pub total_balance: f64,
}

impl AgingSummary {
    pub fn total(&self, bucket: AgingBucket) -> f64 {
        self.totals[bucket.index()]
    }
}

/// Bucket every open invoice under its customer.
///
/// One row per customer in input order, including customers with nothing
/// outstanding. Invoices naming an unknown customer id are skipped.
pub fn aging(customers: &[Customer], invoices: &[Invoice]) -> AgingSummary {
    let index = CustomerIndex::new(customers);

    let mut rows: Vec<AgingRow> = customers
        .iter()
        .map(|c| AgingRow {
            customer_id: c.id.clone(),
            customer_name: c.name.clone(),
            buckets: [0.0; 5],
            total_balance: c.current_balance,
        })
        .collect();

    for invoice in invoices.iter().filter(|i| i.is_open()) {
        let Some(pos) = index.position(&invoice.customer_id) else {
            tracing::debug!(
                invoice = %invoice.id,
                customer = %invoice.customer_id,
                "skipping invoice for unknown customer"
            );
            continue;
        };
        let bucket = AgingBucket::for_days_overdue(invoice.days_overdue);
        rows[pos].buckets[bucket.index()] += invoice.balance;
    }

    let mut totals = [0.0; 5];
    for row in &rows {
        for (total, amount) in totals.iter_mut().zip(row.buckets.iter()) {
            *total += amount;
        }
    }
    let total_balance = customers.iter().map(|c| c.current_balance).sum();

    AgingSummary {
        rows,
        totals,
        total_balance,
    }
}
