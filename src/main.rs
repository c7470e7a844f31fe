use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use moneta::cli::{
    current_user, handle_audit_command, handle_budget_command, handle_category_command,
    handle_dashboard_command, handle_export_command, handle_report_command,
    handle_transaction_command, handle_user_command,
};
use moneta::config::{paths::MonetaPaths, settings::Settings};
use moneta::services::demo;
use moneta::storage::Storage;

#[derive(Parser)]
#[command(
    name = "moneta",
    version,
    about = "Personal finance tracker with monthly budgets and alerts",
    long_about = "Moneta records income and expenses by category, keeps monthly \
                  budgets per expense category and warns when spending reaches \
                  a budget's alert threshold."
)]
struct Cli {
    /// User to act as, instead of the default user
    #[arg(short, long, global = true, env = "MONETA_USER")]
    user: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Create a demo user with three months of sample data
    Demo,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// User management commands
    #[command(subcommand)]
    User(moneta::cli::UserCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(moneta::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(moneta::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(moneta::cli::BudgetCommands),

    /// Monthly overview: totals, trend, spending and alerts
    Dashboard {
        /// Number of months in the trend
        #[arg(short, long)]
        months: Option<usize>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Income and expense report for a date range
    Report(moneta::cli::ReportArgs),

    /// Export the user's data
    #[command(subcommand)]
    Export(moneta::cli::ExportCommands),
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "moneta=debug" } else { "moneta=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = MonetaPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let requested = cli.user.as_deref();

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Moneta at: {}", paths.base_dir().display());
            moneta::storage::init::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  moneta user create <name>    create a user");
            println!("  moneta demo                  or load sample data");
        }
        Some(Commands::Config) => {
            println!("Moneta Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!(
                "  Default user:          {}",
                settings.default_user.as_deref().unwrap_or("(none)")
            );
            println!("  Alert threshold:       {}%", settings.default_alert_threshold);
            println!("  Dashboard months:      {}", settings.dashboard_months);
            println!("  Recent transactions:   {}", settings.recent_transactions);
        }
        Some(Commands::Demo) => {
            let summary = demo::seed(&storage, moneta::cli::today())?;
            if summary.created {
                println!("Created demo user '{}'", summary.user.username);
                println!("  {} categories", summary.categories);
                println!("  {} transactions", summary.transactions);
                println!("  {} budgets", summary.budgets);
            } else {
                println!("Demo user '{}' already exists", summary.user.username);
            }
            if settings.default_user.is_none() {
                settings.default_user = Some(summary.user.username.clone());
                settings.save(&paths)?;
                println!("Default user set to '{}'", summary.user.username);
            }
        }
        Some(Commands::Audit { limit }) => {
            handle_audit_command(&storage, limit)?;
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &mut settings, &paths, requested, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            let user = current_user(&storage, &settings, requested)?;
            handle_category_command(&storage, &user, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            let user = current_user(&storage, &settings, requested)?;
            handle_transaction_command(&storage, &user, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let user = current_user(&storage, &settings, requested)?;
            handle_budget_command(&storage, &settings, &user, cmd)?;
        }
        Some(Commands::Dashboard { months, output }) => {
            let user = current_user(&storage, &settings, requested)?;
            handle_dashboard_command(&storage, &settings, &user, months, output)?;
        }
        Some(Commands::Report(args)) => {
            let user = current_user(&storage, &settings, requested)?;
            handle_report_command(&storage, &user, args)?;
        }
        Some(Commands::Export(cmd)) => {
            let user = current_user(&storage, &settings, requested)?;
            handle_export_command(&storage, &user, cmd)?;
        }
        None => {
            println!("Moneta - personal finance tracker");
            println!();
            println!("Run 'moneta --help' for usage information.");
            println!("Run 'moneta demo' to explore with sample data.");
        }
    }

    Ok(())
}
