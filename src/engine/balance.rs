use serde::Serialize;

use crate::records::{Customer, CustomerStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerBalance {
    pub customer_id: String,
    pub customer_name: String,
    pub status: CustomerStatus,
    pub credit_limit: f64,
    pub current_balance: f64,
    /// Negative when the customer is over the limit.
    pub available_credit: f64,
    pub utilization_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub rows: Vec<CustomerBalance>,
    pub total_balance: f64,
    pub total_credit_limit: f64,
    pub active_customers: usize,
    pub customers_with_balance: usize,
    pub overall_utilization: f64,
}

/// Round to one decimal place, halves going up.
pub fn round_half_up(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

fn utilization(balance: f64, limit: f64) -> f64 {
    if limit > 0.0 {
        round_half_up(balance / limit * 100.0)
    } else {
        0.0
    }
}

pub fn balances(customers: &[Customer]) -> BalanceSummary {
    let rows: Vec<CustomerBalance> = customers
        .iter()
        .map(|c| CustomerBalance {
            customer_id: c.id.clone(),
            customer_name: c.name.clone(),
            status: c.status,
            credit_limit: c.credit_limit,
            current_balance: c.current_balance,
            available_credit: c.credit_limit - c.current_balance,
            utilization_percent: utilization(c.current_balance, c.credit_limit),
        })
        .collect();

    let total_balance: f64 = customers.iter().map(|c| c.current_balance).sum();
    let total_credit_limit: f64 = customers.iter().map(|c| c.credit_limit).sum();

    BalanceSummary {
        rows,
        total_balance,
        total_credit_limit,
        active_customers: customers
            .iter()
            .filter(|c| c.status == CustomerStatus::Active)
            .count(),
        customers_with_balance: customers.iter().filter(|c| c.current_balance > 0.0).count(),
        overall_utilization: utilization(total_balance, total_credit_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::*;

    #[test]
    fn test_available_credit_and_utilization() {
        let summary = balances(&[customer("C1", "Acme", 200_000.0, 45_000.0)]);
        let row = &summary.rows[0];
        assert_eq!(row.available_credit, 155_000.0);
        assert_eq!(row.utilization_percent, 22.5);
    }

    #[test]
    fn test_zero_limit_has_zero_utilization() {
        let summary = balances(&[customer("C1", "Acme", 0.0, 1_000.0)]);
        assert_eq!(summary.rows[0].utilization_percent, 0.0);
        assert_eq!(summary.rows[0].available_credit, -1_000.0);
        assert_eq!(summary.overall_utilization, 0.0);
    }

    #[test]
    fn test_over_limit_is_not_clamped() {
        let summary = balances(&[customer("C1", "Acme", 1_000.0, 1_500.0)]);
        assert_eq!(summary.rows[0].available_credit, -500.0);
        assert_eq!(summary.rows[0].utilization_percent, 150.0);
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(round_half_up(12.25), 12.3);
        assert_eq!(round_half_up(12.24), 12.2);
        assert_eq!(round_half_up(0.0), 0.0);
        // 1 / 3 = 33.333...%
        let summary = balances(&[customer("C1", "Acme", 3.0, 1.0)]);
        assert_eq!(summary.rows[0].utilization_percent, 33.3);
    }

    #[test]
    fn test_aggregate_totals() {
        let mut blocked = customer("C3", "Initech", 10_000.0, 0.0);
        blocked.status = CustomerStatus::Blocked;
        let summary = balances(&[
            customer("C1", "Acme", 200_000.0, 45_000.0),
            customer("C2", "Globex", 50_000.0, 5_000.0),
            blocked,
        ]);

        assert_eq!(summary.total_balance, 50_000.0);
        assert_eq!(summary.total_credit_limit, 260_000.0);
        assert_eq!(summary.active_customers, 2);
        assert_eq!(summary.customers_with_balance, 2);
        // 50,000 / 260,000 = 19.23%
        assert_eq!(summary.overall_utilization, 19.2);
    }

    #[test]
    fn test_empty_customer_list() {
        let summary = balances(&[]);
        assert!(summary.rows.is_empty());
        assert_eq!(summary.overall_utilization, 0.0);
    }
}
