//! Turns engine results into titled tables for a renderer.
//!
//! Every report is a leading header section (field/value pairs) followed by
//! one or more detail sections. Rows keep the order the engine produced and
//! a section is emitted even when it has no rows.

mod format;

pub use format::{
    format_date, format_grouped_int, format_money, format_percent, is_valid_date_format,
    DEFAULT_DATE_FORMAT,
};

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::{self, AgingBucket, OverdueOrder};
use crate::records::{PaymentMethod, RecordSet};

/// A titled table of pre-formatted cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportSection {
    pub fn new(title: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    fn push_field(&mut self, field: &str, value: impl Into<String>) {
        self.push_row(vec![field.to_string(), value.into()]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Aging,
    Overdue,
    Collections,
    Balances,
    Patterns,
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Aging => "Accounts Receivable Aging",
            ReportKind::Overdue => "Overdue Invoices",
            ReportKind::Collections => "Collection Summary",
            ReportKind::Balances => "Customer Balances",
            ReportKind::Patterns => "Payment Patterns",
        }
    }

    /// Short name used in file names.
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::Aging => "aging",
            ReportKind::Overdue => "overdue",
            ReportKind::Collections => "collections",
            ReportKind::Balances => "balances",
            ReportKind::Patterns => "patterns",
        }
    }
}

/// A report kind together with its filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRequest {
    Aging,
    Overdue {
        order: OverdueOrder,
    },
    Collections {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Balances,
    Patterns,
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRequest::Aging => ReportKind::Aging,
            ReportRequest::Overdue { .. } => ReportKind::Overdue,
            ReportRequest::Collections { .. } => ReportKind::Collections,
            ReportRequest::Balances => ReportKind::Balances,
            ReportRequest::Patterns => ReportKind::Patterns,
        }
    }
}

/// Values that appear in report headers and drive cell formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub company: String,
    pub currency_symbol: String,
    pub date_format: String,
    pub generated_on: NaiveDate,
}

impl ReportContext {
    pub fn new(company: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            company: company.into(),
            currency_symbol: "$".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            generated_on,
        }
    }

    pub fn money(&self, value: f64) -> String {
        format_money(value, &self.currency_symbol)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        format_date(date, &self.date_format)
    }

    fn header(&self, kind: ReportKind) -> ReportSection {
        let mut section = ReportSection::new(kind.title(), &["Field", "Value"]);
        section.push_field("Company", self.company.clone());
        section.push_field("Generated", self.date(self.generated_on));
        section
    }
}

pub fn build_report(records: &RecordSet, request: &ReportRequest, ctx: &ReportContext) -> Vec<ReportSection> {
    tracing::debug!(
        kind = request.kind().slug(),
        customers = records.customers.len(),
        invoices = records.invoices.len(),
        payments = records.payments.len(),
        "building report"
    );

    match request {
        ReportRequest::Aging => aging_report(records, ctx),
        ReportRequest::Overdue { order } => overdue_report_ordered(records, ctx, *order),
        ReportRequest::Collections { from, to } => collection_report(records, ctx, *from, *to),
        ReportRequest::Balances => customer_balance_report(records, ctx),
        ReportRequest::Patterns => payment_pattern_report(records, ctx),
    }
}

pub fn aging_report(records: &RecordSet, ctx: &ReportContext) -> Vec<ReportSection> {
    let summary = engine::aging(&records.customers, &records.invoices);

    let mut header = ctx.header(ReportKind::Aging);
    header.push_field("Customers", summary.rows.len().to_string());
    for bucket in AgingBucket::ALL {
        header.push_field(bucket.label(), ctx.money(summary.total(bucket)));
    }
    header.push_field("Total Balance", ctx.money(summary.total_balance));

    let mut columns = vec!["Customer"];
    columns.extend(AgingBucket::ALL.iter().map(|b| b.label()));
    columns.push("Total Balance");
    let mut detail = ReportSection::new("Aging by Customer", &columns);
    for row in &summary.rows {
        let mut cells = vec![row.customer_name.clone()];
        cells.extend(AgingBucket::ALL.iter().map(|b| ctx.money(row.bucket(*b))));
        cells.push(ctx.money(row.total_balance));
        detail.push_row(cells);
    }

    vec![header, detail]
}

pub fn overdue_report(records: &RecordSet, ctx: &ReportContext) -> Vec<ReportSection> {
    overdue_report_ordered(records, ctx, OverdueOrder::Input)
}

pub fn overdue_report_ordered(
    records: &RecordSet,
    ctx: &ReportContext,
    order: OverdueOrder,
) -> Vec<ReportSection> {
    let summary = engine::overdue(&records.customers, &records.invoices, order);

    let mut header = ctx.header(ReportKind::Overdue);
    header.push_field("Overdue Invoices", summary.total.count.to_string());
    header.push_field("Total Overdue", ctx.money(summary.total.balance));

    let mut buckets = ReportSection::new("Overdue by Bucket", &["Bucket", "Invoices", "Balance"]);
    for bucket in AgingBucket::OVERDUE {
        let tally = summary.bucket(bucket);
        buckets.push_row(vec![
            bucket.label().to_string(),
            tally.count.to_string(),
            ctx.money(tally.balance),
        ]);
    }

    let mut detail = ReportSection::new(
        "Overdue Invoices",
        &["Invoice", "Customer", "Due Date", "Days Overdue", "Amount", "Balance"],
    );
    for invoice in &summary.invoices {
        detail.push_row(vec![
            invoice.invoice_id.clone(),
            invoice.customer_label().to_string(),
            ctx.date(invoice.due_date),
            invoice.days_overdue.to_string(),
            ctx.money(invoice.amount),
            ctx.money(invoice.balance),
        ]);
    }

    vec![header, buckets, detail]
}

pub fn collection_report(
    records: &RecordSet,
    ctx: &ReportContext,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<ReportSection> {
    let summary = engine::collections(&records.payments, from, to);

    let mut header = ctx.header(ReportKind::Collections);
    let period = match summary.window {
        Some(w) => format!("{} - {}", ctx.date(w.from), ctx.date(w.to)),
        None => "All dates".to_string(),
    };
    header.push_field("Period", period);
    header.push_field("Payments", summary.count.to_string());
    header.push_field("Total Collected", ctx.money(summary.total));

    let mut methods = ReportSection::new("Collections by Method", &["Method", "Amount"]);
    for (method, amount) in summary.by_method() {
        methods.push_row(vec![method.to_string(), ctx.money(amount)]);
    }

    let mut customers = ReportSection::new(
        "Collections by Customer",
        &["Customer", "Payments", "Amount"],
    );
    for row in &summary.by_customer {
        customers.push_row(vec![
            row.customer.clone(),
            row.count.to_string(),
            ctx.money(row.amount),
        ]);
    }

    let mut detail = ReportSection::new("Payments", &["Date", "Customer", "Amount", "Method"]);
    for payment in &summary.payments {
        detail.push_row(vec![
            ctx.date(payment.date),
            payment.customer.clone(),
            ctx.money(payment.amount),
            payment.method.to_string(),
        ]);
    }

    vec![header, methods, customers, detail]
}

pub fn customer_balance_report(records: &RecordSet, ctx: &ReportContext) -> Vec<ReportSection> {
    let summary = engine::balances(&records.customers);

    let mut header = ctx.header(ReportKind::Balances);
    header.push_field("Customers", summary.rows.len().to_string());
    header.push_field("Active Customers", summary.active_customers.to_string());
    header.push_field("Customers with Balance", summary.customers_with_balance.to_string());
    header.push_field("Total Balance", ctx.money(summary.total_balance));
    header.push_field("Total Credit Limit", ctx.money(summary.total_credit_limit));
    header.push_field("Overall Utilization", format_percent(summary.overall_utilization));

    let mut detail = ReportSection::new(
        "Customer Balances",
        &[
            "Customer",
            "Status",
            "Credit Limit",
            "Current Balance",
            "Available Credit",
            "Utilization",
        ],
    );
    for row in &summary.rows {
        detail.push_row(vec![
            row.customer_name.clone(),
            row.status.to_string(),
            ctx.money(row.credit_limit),
            ctx.money(row.current_balance),
            ctx.money(row.available_credit),
            format_percent(row.utilization_percent),
        ]);
    }

    vec![header, detail]
}

pub fn payment_pattern_report(records: &RecordSet, ctx: &ReportContext) -> Vec<ReportSection> {
    let patterns = engine::payment_patterns(&records.customers, &records.payments);

    let mut header = ctx.header(ReportKind::Patterns);
    header.push_field("Customers", patterns.len().to_string());
    header.push_field(
        "Customers with Payments",
        patterns
            .iter()
            .filter(|p| p.payment_frequency > 0)
            .count()
            .to_string(),
    );
    for method in PaymentMethod::ALL {
        let preferring = patterns
            .iter()
            .filter(|p| p.preferred_method == Some(method))
            .count();
        header.push_field(&format!("Prefer {method}"), preferring.to_string());
    }

    let mut detail = ReportSection::new(
        "Payment Patterns",
        &[
            "Customer",
            "Total Paid",
            "Payments",
            "Average Payment",
            "Preferred Method",
            "Current Balance",
        ],
    );
    for pattern in &patterns {
        detail.push_row(vec![
            pattern.customer_name.clone(),
            ctx.money(pattern.total_paid),
            pattern.payment_frequency.to_string(),
            ctx.money(pattern.avg_payment),
            pattern.preferred_method_label().to_string(),
            ctx.money(pattern.current_balance),
        ]);
    }

    vec![header, detail]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::*;
    use crate::records::Payment;

    fn ctx() -> ReportContext {
        ReportContext::new("Test Co", date(2026, 10, 1))
    }

    fn records() -> RecordSet {
        RecordSet::new(
            vec![
                customer("C1", "Acme", 200_000.0, 45_000.0),
                customer("C2", "Globex", 0.0, 0.0),
            ],
            vec![
                invoice("I1", "C1", 20_000.0, 0),
                invoice("I2", "C1", 15_000.0, 15),
                invoice("I3", "C1", 10_000.0, 45),
            ],
            vec![
                payment("P1", "Acme", 100.0, PaymentMethod::Cash),
                Payment {
                    date: date(2026, 4, 2),
                    ..payment("P2", "Acme", 50.0, PaymentMethod::Card)
                },
            ],
        )
    }

    fn field<'a>(section: &'a ReportSection, name: &str) -> &'a str {
        section
            .rows
            .iter()
            .find(|r| r[0] == name)
            .map(|r| r[1].as_str())
            .unwrap_or_else(|| panic!("missing field {name}"))
    }

    #[test]
    fn test_header_section_leads() {
        let sections = aging_report(&records(), &ctx());
        assert_eq!(sections[0].title, "Accounts Receivable Aging");
        assert_eq!(field(&sections[0], "Company"), "Test Co");
        assert_eq!(field(&sections[0], "Generated"), "October 01, 2026");
    }

    #[test]
    fn test_aging_report_rows() {
        let sections = aging_report(&records(), &ctx());
        let detail = &sections[1];
        assert_eq!(detail.columns.len(), 7);
        assert_eq!(
            detail.rows[0],
            [
                "Acme",
                "$20,000.00",
                "$15,000.00",
                "$10,000.00",
                "$0.00",
                "$0.00",
                "$45,000.00"
            ]
        );
        assert_eq!(detail.rows[1][0], "Globex");
    }

    #[test]
    fn test_overdue_report_sections() {
        let sections = overdue_report(&records(), &ctx());
        assert_eq!(sections.len(), 3);
        assert_eq!(field(&sections[0], "Overdue Invoices"), "2");
        assert_eq!(field(&sections[0], "Total Overdue"), "$25,000.00");
        assert_eq!(sections[1].rows.len(), 4);
        assert_eq!(sections[2].rows[0][0], "I2");
        assert_eq!(sections[2].rows[0][2], "January 01, 2026");
    }

    #[test]
    fn test_collection_report_period() {
        let all = collection_report(&records(), &ctx(), None, None);
        assert_eq!(field(&all[0], "Period"), "All dates");
        assert_eq!(field(&all[0], "Total Collected"), "$150.00");
        assert_eq!(all[1].rows.len(), 4);

        let march = collection_report(
            &records(),
            &ctx(),
            Some(date(2026, 3, 1)),
            Some(date(2026, 3, 31)),
        );
        assert_eq!(field(&march[0], "Period"), "March 01, 2026 - March 31, 2026");
        assert_eq!(field(&march[0], "Total Collected"), "$100.00");
        assert_eq!(march[2].title, "Collections by Customer");
        assert_eq!(march[2].rows, vec![vec!["Acme", "1", "$100.00"]]);
        assert_eq!(march[3].rows, vec![vec!["March 01, 2026", "Acme", "$100.00", "cash"]]);
    }

    #[test]
    fn test_balance_report_formats_percent() {
        let sections = customer_balance_report(&records(), &ctx());
        assert_eq!(sections[1].rows[0][4], "$155,000.00");
        assert_eq!(sections[1].rows[0][5], "22.5%");
        assert_eq!(sections[1].rows[1][5], "0.0%");
        assert_eq!(field(&sections[0], "Overall Utilization"), "22.5%");
    }

    #[test]
    fn test_pattern_report_rows() {
        let sections = payment_pattern_report(&records(), &ctx());
        assert_eq!(sections[1].rows[0][4], "cash");
        assert_eq!(sections[1].rows[0][3], "$75.00");
        assert_eq!(sections[1].rows[1][4], "N/A");
        assert_eq!(field(&sections[0], "Prefer cash"), "1");
    }

    #[test]
    fn test_empty_records_still_emit_every_section() {
        let empty = RecordSet::default();
        let requests = [
            (ReportRequest::Aging, 2),
            (ReportRequest::Overdue { order: OverdueOrder::Input }, 3),
            (ReportRequest::Collections { from: None, to: None }, 3),
            (ReportRequest::Balances, 2),
            (ReportRequest::Patterns, 2),
        ];
        for (request, expected) in requests {
            let sections = build_report(&empty, &request, &ctx());
            assert_eq!(sections.len(), expected, "{request:?}");
            assert!(sections.iter().all(|s| !s.columns.is_empty()));
        }
    }

    #[test]
    fn test_reports_are_idempotent() {
        let records = records();
        let request = ReportRequest::Collections {
            from: Some(date(2026, 1, 1)),
            to: Some(date(2026, 12, 31)),
        };
        let first = build_report(&records, &request, &ctx());
        let second = build_report(&records, &request, &ctx());
        assert_eq!(first, second);
    }

    #[test]
    fn test_currency_symbol_comes_from_context() {
        let mut ctx = ctx();
        ctx.currency_symbol = "R$ ".to_string();
        let sections = customer_balance_report(&records(), &ctx);
        assert_eq!(sections[1].rows[0][2], "R$ 200,000.00");
    }
}
