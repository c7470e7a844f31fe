//! CLI commands for reports
//!
//! The dashboard and the filtered period report, printed or exported to CSV.

use clap::Args;
use std::path::PathBuf;

use crate::cli::{create_output, parse_date, parse_kind, parse_period, today};
use crate::config::settings::Settings;
use crate::error::{MonetaError, MonetaResult};
use crate::models::User;
use crate::reports::{DashboardReport, PeriodReport};
use crate::services::{CategoryService, TransactionFilter};
use crate::storage::Storage;

/// Options of the period report
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,

    /// A whole month (YYYY-MM), instead of start/end
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub month: Option<String>,

    /// Category name or ID
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only income or expense
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the dashboard command
pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    user: &User,
    months: Option<usize>,
    output: Option<PathBuf>,
) -> MonetaResult<()> {
    let report = DashboardReport::generate_with_recent(
        storage,
        user,
        today(),
        months.unwrap_or(settings.dashboard_months),
        settings.recent_transactions,
    )?;

    if let Some(path) = output {
        report.export_csv(create_output(&path)?)?;
        println!("Dashboard exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal());
    }

    Ok(())
}

/// Handle the report command
pub fn handle_report_command(storage: &Storage, user: &User, args: ReportArgs) -> MonetaResult<()> {
    let mut filter = TransactionFilter::for_user(user.id);

    if let Some(month) = args.month.as_deref() {
        filter = filter.period(parse_period(month)?);
    }
    if let Some(start) = args.start.as_deref() {
        filter = filter.start(parse_date(start)?);
    }
    if let Some(end) = args.end.as_deref() {
        filter = filter.end(parse_date(end)?);
    }
    if let (Some(start), Some(end)) = (filter.start, filter.end) {
        if start > end {
            return Err(MonetaError::Validation(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
    }
    if let Some(kind) = args.kind.as_deref() {
        filter = filter.kind(parse_kind(kind)?);
    }
    if let Some(category) = args.category.as_deref() {
        let category = CategoryService::new(storage).resolve(user.id, category, filter.kind)?;
        filter = filter.category(category.id);
    }

    let report = PeriodReport::generate(storage, user, &filter)?;

    if let Some(path) = args.output {
        report.export_csv(create_output(&path)?)?;
        println!("Report exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal());
    }

    Ok(())
}
