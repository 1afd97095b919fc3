pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod records;
pub mod render;
pub mod report;

pub use config::{Config, FileDataProvider};
pub use error::{ReportError, Result};
pub use records::{
    Customer, CustomerStatus, DataProvider, IntegrityIssue, Invoice, Payment, PaymentMethod,
    RecordSet,
};
pub use report::{
    aging_report, build_report, collection_report, customer_balance_report, overdue_report,
    overdue_report_ordered, payment_pattern_report, ReportContext, ReportKind, ReportRequest,
    ReportSection,
};
