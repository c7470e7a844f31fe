//! Category display formatting
//!
//! Formats categories grouped by entry type and as detail views.

use crate::models::{Category, EntryType};

/// Format categories in two sections, income then expense
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nCreate one with 'moneta category create <name> --type expense'."
            .to_string();
    }

    let name_width = categories
        .iter()
        .map(|c| c.display_name().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    for kind in EntryType::all() {
        let section: Vec<_> = categories.iter().filter(|c| c.kind == *kind).collect();
        if section.is_empty() {
            continue;
        }
        if !output.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!("{} ({})\n", kind.label(), section.len()));
        for (i, category) in section.iter().enumerate() {
            let prefix = if i == section.len() - 1 { "└── " } else { "├── " };
            output.push_str(&format!(
                "  {}{:<name_width$}  {}  {}\n",
                prefix,
                category.display_name(),
                category.color,
                category.id,
                name_width = name_width,
            ));
        }
    }

    output
}

/// Format a single category's details
pub fn format_category_details(
    category: &Category,
    transaction_count: usize,
    budget_count: usize,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.display_name()));
    output.push_str(&format!("  ID:           {}\n", category.id));
    output.push_str(&format!("  Type:         {}\n", category.kind.label()));
    output.push_str(&format!("  Color:        {}\n", category.color));
    output.push_str(&format!("  Transactions: {}\n", transaction_count));
    output.push_str(&format!("  Budgets:      {}\n", budget_count));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    #[test]
    fn test_format_empty_list() {
        assert!(format_category_list(&[]).starts_with("No categories found."));
    }

    #[test]
    fn test_format_category_list_sections() {
        let user = UserId::new();
        let categories = vec![
            Category::new(user, "Food", EntryType::Expense),
            Category::new(user, "Rent", EntryType::Expense),
            Category::new(user, "Salary", EntryType::Income),
        ];

        let output = format_category_list(&categories);
        let income = output.find("Income (1)").unwrap();
        let expense = output.find("Expense (2)").unwrap();
        assert!(income < expense);
        assert!(output.contains("└── 💰 Rent"));
    }

    #[test]
    fn test_format_category_details() {
        let category = Category::new(UserId::new(), "Food", EntryType::Expense);
        let output = format_category_details(&category, 3, 1);
        assert!(output.contains("Type:         Expense"));
        assert!(output.contains("Transactions: 3"));
    }
}
