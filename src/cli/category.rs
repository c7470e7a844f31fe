//! Category CLI commands
//!
//! Implements CLI commands for income and expense categories.

use clap::Subcommand;

use crate::cli::parse_kind;
use crate::display::category::{format_category_details, format_category_list};
use crate::error::MonetaResult;
use crate::models::User;
use crate::services::{CategoryService, CategoryUpdate};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories, income first
    List {
        /// Only categories of this type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Entry type: income or expense
        #[arg(short = 't', long = "type")]
        kind: String,
        /// Icon, usually an emoji
        #[arg(short, long)]
        icon: Option<String>,
        /// Color as #RRGGBB
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category's name or style
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New icon
        #[arg(short, long)]
        icon: Option<String>,
        /// New color as #RRGGBB
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a category; its transactions become uncategorized
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    user: &User,
    cmd: CategoryCommands,
) -> MonetaResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let categories = service.list(user.id, kind)?;
            println!("{}", format_category_list(&categories));
        }

        CategoryCommands::Create {
            name,
            kind,
            icon,
            color,
        } => {
            let kind = parse_kind(&kind)?;
            let category =
                service.create(user.id, &name, kind, icon.as_deref(), color.as_deref())?;

            println!("Created category: {}", category.display_name());
            println!("  Type: {}", category.kind.label());
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = service.resolve(user.id, &category, None)?;
            let transactions = storage.transactions.get_by_category(category.id)?.len();
            let budgets = storage
                .budgets
                .get_by_user(user.id, None)?
                .iter()
                .filter(|b| b.category_id == category.id)
                .count();
            print!("{}", format_category_details(&category, transactions, budgets));
        }

        CategoryCommands::Edit {
            category,
            name,
            icon,
            color,
        } => {
            let category = service.resolve(user.id, &category, None)?;

            if name.is_none() && icon.is_none() && color.is_none() {
                println!("No changes specified. Use --name, --icon or --color.");
                return Ok(());
            }

            let updated = service.update(category.id, CategoryUpdate { name, icon, color })?;
            println!("Updated category: {}", updated.display_name());
        }

        CategoryCommands::Delete { category } => {
            let category = service.resolve(user.id, &category, None)?;
            let deletion = service.delete(category.id)?;

            println!("Deleted category: {}", deletion.category.name);
            if deletion.uncategorized > 0 {
                println!("  {} transaction(s) are now uncategorized", deletion.uncategorized);
            }
            if deletion.budgets_removed > 0 {
                println!("  {} budget(s) removed", deletion.budgets_removed);
            }
        }
    }

    Ok(())
}
