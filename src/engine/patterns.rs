use serde::Serialize;
use std::collections::HashMap;

use crate::records::{Customer, Payment, PaymentMethod};

/// Shown instead of a method for customers without payments.
pub const NO_PREFERRED_METHOD: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentPattern {
    pub customer_id: String,
    pub customer_name: String,
    pub total_paid: f64,
    pub payment_frequency: usize,
    pub avg_payment: f64,
    pub preferred_method: Option<PaymentMethod>,
    pub current_balance: f64,
}

impl PaymentPattern {
    pub fn preferred_method_label(&self) -> &'static str {
        self.preferred_method
            .map_or(NO_PREFERRED_METHOD, PaymentMethod::as_str)
    }
}

/// Most frequent method; on a tie the method seen first wins.
fn preferred_method(payments: &[&Payment]) -> Option<PaymentMethod> {
    let mut counts: Vec<(PaymentMethod, usize)> = Vec::with_capacity(4);
    for payment in payments {
        match counts.iter_mut().find(|(m, _)| *m == payment.method) {
            Some((_, n)) => *n += 1,
            None => counts.push((payment.method, 1)),
        }
    }

    let mut best: Option<(PaymentMethod, usize)> = None;
    for (method, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((method, count));
        }
    }
    best.map(|(method, _)| method)
}

/// Per-customer payment behaviour, one row per customer in input order.
///
/// Payments are matched to customers by display name. Customers sharing a
/// name each see the combined payments of all of them.
pub fn payment_patterns(customers: &[Customer], payments: &[Payment]) -> Vec<PaymentPattern> {
    let mut by_name: HashMap<&str, Vec<&Payment>> = HashMap::new();
    for payment in payments {
        by_name
            .entry(payment.customer.as_str())
            .or_default()
            .push(payment);
    }

    customers
        .iter()
        .map(|customer| {
            let paid = by_name
                .get(customer.name.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let total_paid: f64 = paid.iter().map(|p| p.amount).sum();
            let payment_frequency = paid.len();
            let avg_payment = if payment_frequency > 0 {
                total_paid / payment_frequency as f64
            } else {
                0.0
            };

            PaymentPattern {
                customer_id: customer.id.clone(),
                customer_name: customer.name.clone(),
                total_paid,
                payment_frequency,
                avg_payment,
                preferred_method: preferred_method(paid),
                current_balance: customer.current_balance,
            }
        })
        .collect()
}
