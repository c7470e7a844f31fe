//! User display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::User;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Income goal")]
    income_goal: String,
    #[tabled(rename = "Savings goal")]
    savings_goal: String,
}

fn goal(user: &User, goal: Option<crate::models::Money>) -> String {
    goal.map(|g| user.format_money(g)).unwrap_or_else(|| "-".to_string())
}

/// Format users as a table, marking the default user with `*`
pub fn format_user_list(users: &[User], default_user: Option<&str>) -> String {
    if users.is_empty() {
        return "No users found.\n\nCreate one with 'moneta user create <name>'.".to_string();
    }

    let rows = users.iter().map(|u| {
        let marker = match default_user {
            Some(name) if u.name_matches(name) => " *",
            _ => "",
        };
        UserRow {
            id: u.id.to_string(),
            username: format!("{}{}", u.username, marker),
            currency: u.currency.to_string(),
            income_goal: goal(u, u.monthly_income_goal),
            savings_goal: goal(u, u.monthly_savings_goal),
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Format a user's profile
pub fn format_user_details(user: &User) -> String {
    let mut output = String::new();

    output.push_str(&format!("User: {}\n", user.username));
    output.push_str(&format!("  ID:            {}\n", user.id));
    output.push_str(&format!("  Currency:      {}\n", user.currency));
    output.push_str(&format!(
        "  Income goal:   {}\n",
        goal(user, user.monthly_income_goal)
    ));
    output.push_str(&format!(
        "  Savings goal:  {}\n",
        goal(user, user.monthly_savings_goal)
    ));
    output.push_str(&format!(
        "  Created:       {}\n",
        user.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_format_empty_list() {
        assert!(format_user_list(&[], None).starts_with("No users found."));
    }

    #[test]
    fn test_format_user_list_marks_default() {
        let alice = User::new("alice");
        let mut bob = User::new("bob");
        bob.monthly_income_goal = Some(Money::from_cents(300000));

        let output = format_user_list(&[alice, bob], Some("alice"));
        assert!(output.contains("alice *"));
        assert!(output.contains("3000.00 EUR"));
        assert!(!output.contains("bob *"));
    }

    #[test]
    fn test_format_user_details() {
        let user = User::new("alice");
        let output = format_user_details(&user);
        assert!(output.contains("User: alice"));
        assert!(output.contains("Income goal:   -"));
    }
}
