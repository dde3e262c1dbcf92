//! Report module
//!
//! Summarizes a user's transactions into totals for income, expenses and
//! each category.

mod aggregation;
mod handlers;
mod rows;

pub use aggregation::{Summary, summarize, totals_by_category};
pub use handlers::{get_summary_endpoint, get_totals_by_category_endpoint};
pub use rows::{ReportRow, get_report_rows_for_user};
