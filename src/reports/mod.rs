//! Reports module for Moneta
//!
//! Provides the dashboard overview and filtered period reports, each
//! printable to the terminal and exportable to CSV.

pub mod dashboard;
pub mod period;

pub use dashboard::{DashboardReport, GoalProgress};
pub use period::PeriodReport;
