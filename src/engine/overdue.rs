use chrono::NaiveDate;
use serde::Serialize;

use super::{AgingBucket, CustomerIndex};
use crate::records::{Customer, Invoice};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketTally {
    pub count: usize,
    pub balance: f64,
}

/// Ordering of the detail rows. Bucket tallies do not depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverdueOrder {
    /// Input order.
    #[default]
    Input,
    /// Most days overdue first; ties keep input order.
    DaysOverdue,
    /// Largest remaining balance first; ties keep input order.
    Balance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueInvoice {
    pub invoice_id: String,
    pub customer_id: String,
    /// `None` when the invoice names an unknown customer.
    pub customer_name: Option<String>,
    pub due_date: NaiveDate,
    pub days_overdue: u32,
    pub amount: f64,
    pub balance: f64,
    pub bucket: AgingBucket,
}

impl OverdueInvoice {
    pub fn customer_label(&self) -> &str {
        self.customer_name.as_deref().unwrap_or(&self.customer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueSummary {
    pub invoices: Vec<OverdueInvoice>,
    buckets: [BucketTally; 4],
    pub total: BucketTally,
}

impl OverdueSummary {
    /// Tally for one bucket; `Current` is never overdue and is always empty.
    pub fn bucket(&self, bucket: AgingBucket) -> BucketTally {
        match bucket {
            AgingBucket::Current => BucketTally::default(),
            other => self.buckets[other.index() - 1],
        }
    }
}

/// Collect open invoices past their due date.
///
/// Invoices for unknown customers stay in the listing and totals since
/// nothing here is aggregated per customer; they show the raw customer id.
pub fn overdue(customers: &[Customer], invoices: &[Invoice], order: OverdueOrder) -> OverdueSummary {
    let index = CustomerIndex::new(customers);
    let mut buckets = [BucketTally::default(); 4];
    let mut rows = Vec::new();

    for invoice in invoices
        .iter()
        .filter(|i| i.is_open() && i.days_overdue > 0)
    {
        let bucket = AgingBucket::for_days_overdue(invoice.days_overdue);
        let tally = &mut buckets[bucket.index() - 1];
        tally.count += 1;
        tally.balance += invoice.balance;

        rows.push(OverdueInvoice {
            invoice_id: invoice.id.clone(),
            customer_id: invoice.customer_id.clone(),
            customer_name: index.get(&invoice.customer_id).map(|c| c.name.clone()),
            due_date: invoice.due_date,
            days_overdue: invoice.days_overdue,
            amount: invoice.amount,
            balance: invoice.balance,
            bucket,
        });
    }

    // sort_by is stable, so ties keep input order
    match order {
        OverdueOrder::Input => {}
        OverdueOrder::DaysOverdue => rows.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue)),
        OverdueOrder::Balance => rows.sort_by(|a, b| b.balance.total_cmp(&a.balance)),
    }

    // Grand total is folded from the buckets so it always equals their sum.
    let total = buckets.iter().fold(BucketTally::default(), |acc, t| BucketTally {
        count: acc.count + t.count,
        balance: acc.balance + t.balance,
    });

    OverdueSummary {
        invoices: rows,
        buckets,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::*;

    fn spread() -> (Vec<Customer>, Vec<Invoice>) {
        let customers = vec![customer("C1", "Acme", 0.0, 0.0)];
        let invoices = [0, 15, 45, 75, 120]
            .iter()
            .enumerate()
            .map(|(i, days)| invoice(&format!("I{i}"), "C1", 1_000.0, *days))
            .collect();
        (customers, invoices)
    }

    #[test]
    fn test_overdue_bucket_counts() {
        let (customers, invoices) = spread();
        let summary = overdue(&customers, &invoices, OverdueOrder::Input);

        for bucket in AgingBucket::OVERDUE {
            assert_eq!(summary.bucket(bucket).count, 1, "{bucket:?}");
            assert_eq!(summary.bucket(bucket).balance, 1_000.0);
        }
        assert_eq!(summary.bucket(AgingBucket::Current), BucketTally::default());
        assert_eq!(summary.total.count, 4);
        assert_eq!(summary.total.balance, 4_000.0);
        assert_eq!(summary.invoices.len(), 4);
    }

    #[test]
    fn test_settled_and_current_invoices_are_excluded() {
        let customers = vec![customer("C1", "Acme", 0.0, 0.0)];
        let invoices = vec![invoice("I1", "C1", 0.0, 40), invoice("I2", "C1", 50.0, 0)];

        let summary = overdue(&customers, &invoices, OverdueOrder::Input);
        assert!(summary.invoices.is_empty());
        assert_eq!(summary.total, BucketTally::default());
    }

    #[test]
    fn test_rows_keep_input_order_by_default() {
        let customers = vec![customer("C1", "Acme", 0.0, 0.0)];
        let invoices = vec![
            invoice("I1", "C1", 10.0, 5),
            invoice("I2", "C1", 30.0, 100),
            invoice("I3", "C1", 20.0, 50),
        ];

        let ids = |order| -> Vec<String> {
            overdue(&customers, &invoices, order)
                .invoices
                .into_iter()
                .map(|r| r.invoice_id)
                .collect()
        };
        assert_eq!(ids(OverdueOrder::Input), ["I1", "I2", "I3"]);
        assert_eq!(ids(OverdueOrder::DaysOverdue), ["I2", "I3", "I1"]);
        assert_eq!(ids(OverdueOrder::Balance), ["I2", "I3", "I1"]);
    }

    #[test]
    fn test_sorting_is_stable_for_ties() {
        let customers = vec![customer("C1", "Acme", 0.0, 0.0)];
        let invoices = vec![
            invoice("I1", "C1", 10.0, 5),
            invoice("I2", "C1", 10.0, 5),
            invoice("I3", "C1", 10.0, 5),
        ];
        let rows = overdue(&customers, &invoices, OverdueOrder::Balance).invoices;
        let ids: Vec<&str> = rows.iter().map(|r| r.invoice_id.as_str()).collect();
        assert_eq!(ids, ["I1", "I2", "I3"]);
    }

    #[test]
    fn test_unknown_customer_shows_raw_id() {
        let invoices = vec![invoice("I1", "C404", 10.0, 5)];
        let summary = overdue(&[], &invoices, OverdueOrder::Input);
        assert_eq!(summary.invoices[0].customer_label(), "C404");
        assert_eq!(summary.total.count, 1);
    }
}
