//! Aggregations behind the accounts receivable reports.
//!
//! Every function here is a pure computation over borrowed record slices:
//! no clock, no I/O, no mutation of its inputs. Conditions that would be
//! errors elsewhere (unknown references, zero denominators, empty inputs)
//! are resolved locally so a report can always be produced.

mod aging;
mod balance;
mod collection;
mod overdue;
mod patterns;

pub use aging::{aging, AgingBucket, AgingRow, AgingSummary};
pub use balance::{balances, round_half_up, BalanceSummary, CustomerBalance};
pub use collection::{
    collections, CollectedPayment, CollectionSummary, CustomerCollection, DateWindow,
};
pub use overdue::{overdue, BucketTally, OverdueInvoice, OverdueOrder, OverdueSummary};
pub use patterns::{payment_patterns, PaymentPattern, NO_PREFERRED_METHOD};

use std::collections::HashMap;

use crate::records::Customer;

/// Customer lookup by identifier. The first customer wins on duplicate ids.
pub(crate) struct CustomerIndex<'a> {
    customers: &'a [Customer],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> CustomerIndex<'a> {
    pub(crate) fn new(customers: &'a [Customer]) -> Self {
        let mut by_id = HashMap::with_capacity(customers.len());
        for (pos, customer) in customers.iter().enumerate() {
            by_id.entry(customer.id.as_str()).or_insert(pos);
        }
        Self { customers, by_id }
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn get(&self, id: &str) -> Option<&'a Customer> {
        self.position(id).map(|pos| &self.customers[pos])
    }
}
