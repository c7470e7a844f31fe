//! User CLI commands
//!
//! Implements CLI commands for user profiles and the default user.

use clap::Subcommand;

use crate::cli::{current_user, parse_goal};
use crate::config::paths::MonetaPaths;
use crate::config::settings::Settings;
use crate::display::{format_user_details, format_user_list};
use crate::error::{MonetaError, MonetaResult};
use crate::models::Currency;
use crate::services::{ProfileUpdate, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a new user
    Create {
        /// Username (letters, digits and @.+-_)
        username: String,
        /// Currency code (EUR, USD, GBP, XOF)
        #[arg(short, long)]
        currency: Option<String>,
        /// Also make this the default user
        #[arg(long)]
        default: bool,
    },

    /// List all users
    List,

    /// Show a user's profile (defaults to the current user)
    Show {
        /// Username or ID
        user: Option<String>,
    },

    /// Edit the current user's profile
    Edit {
        /// Currency code
        #[arg(short, long)]
        currency: Option<String>,
        /// Monthly income goal, or "none" to clear it
        #[arg(long)]
        income_goal: Option<String>,
        /// Monthly savings goal, or "none" to clear it
        #[arg(long)]
        savings_goal: Option<String>,
    },

    /// Delete a user and everything they own
    Delete {
        /// Username or ID
        user: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Make a user the default for later commands
    Use {
        /// Username or ID
        user: String,
    },
}

fn parse_currency(s: &str) -> MonetaResult<Currency> {
    s.parse::<Currency>().map_err(MonetaError::Validation)
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    settings: &mut Settings,
    paths: &MonetaPaths,
    requested: Option<&str>,
    cmd: UserCommands,
) -> MonetaResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Create {
            username,
            currency,
            default,
        } => {
            let currency = currency.as_deref().map(parse_currency).transpose()?;
            let user = service.create(&username, currency)?;

            println!("Created user: {}", user.username);
            println!("  Currency: {}", user.currency);
            println!("  ID: {}", user.id);

            if default || settings.default_user.is_none() {
                settings.default_user = Some(user.username.clone());
                settings.save(paths)?;
                println!("  Now the default user");
            }
        }

        UserCommands::List => {
            let users = service.list()?;
            println!("{}", format_user_list(&users, settings.default_user.as_deref()));
        }

        UserCommands::Show { user } => {
            let user = match user {
                Some(identifier) => service.resolve(&identifier)?,
                None => current_user(storage, settings, requested)?,
            };
            print!("{}", format_user_details(&user));
        }

        UserCommands::Edit {
            currency,
            income_goal,
            savings_goal,
        } => {
            let user = current_user(storage, settings, requested)?;

            if currency.is_none() && income_goal.is_none() && savings_goal.is_none() {
                println!("No changes specified. Use --currency, --income-goal or --savings-goal.");
                return Ok(());
            }

            let update = ProfileUpdate {
                currency: currency.as_deref().map(parse_currency).transpose()?,
                monthly_income_goal: income_goal.as_deref().map(parse_goal).transpose()?,
                monthly_savings_goal: savings_goal.as_deref().map(parse_goal).transpose()?,
            };
            let updated = service.update_profile(user.id, update)?;
            println!("Updated user: {}", updated.username);
            print!("{}", format_user_details(&updated));
        }

        UserCommands::Delete { user, yes } => {
            let user = service.resolve(&user)?;

            if !yes {
                println!(
                    "This deletes '{}' with all of their categories, transactions and budgets.",
                    user.username
                );
                println!("Run again with --yes to confirm.");
                return Ok(());
            }

            let deletion = service.delete(user.id)?;
            println!("Deleted user: {}", deletion.user.username);
            println!(
                "  Removed {} categories, {} transactions, {} budgets",
                deletion.categories, deletion.transactions, deletion.budgets
            );

            let was_default = settings
                .default_user
                .as_deref()
                .is_some_and(|name| deletion.user.name_matches(name));
            if was_default {
                settings.default_user = None;
                settings.save(paths)?;
            }
        }

        UserCommands::Use { user } => {
            let user = service.resolve(&user)?;
            settings.default_user = Some(user.username.clone());
            settings.save(paths)?;
            println!("Default user is now: {}", user.username);
        }
    }

    Ok(())
}
