//! Fee and expense display formatting

use crate::models::{Expense, FeeRecord, Member, Money};

/// Format fees as a table; members are used to print names
pub fn format_fee_list(fees: &[FeeRecord], members: &[Member]) -> String {
    if fees.is_empty() {
        return "No fees found.".to_string();
    }

    let name_of = |fee: &FeeRecord| {
        members
            .iter()
            .find(|m| m.id == fee.member_id)
            .map(|m| m.full_name.clone())
            .unwrap_or_else(|| fee.member_id.to_string())
    };
    let names: Vec<String> = fees.iter().map(name_of).collect();
    let name_width = names.iter().map(|n| n.len()).max().unwrap_or(6).max(6);

    let mut output = format!(
        "{:<12}  {:<10}  {:<name_width$}  {:<13}  {:>12}  {}\n",
        "ID",
        "Date",
        "Member",
        "Kind",
        "Amount",
        "Receipt",
        name_width = name_width,
    );
    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<name_width$}  {:-<13}  {:->12}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (fee, name) in fees.iter().zip(&names) {
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<name_width$}  {:<13}  {:>12}  {}\n",
            fee.id.to_string(),
            fee.date.to_string(),
            name,
            fee.kind.to_string(),
            fee.amount.to_string(),
            fee.receipt_number.as_deref().unwrap_or("-"),
            name_width = name_width,
        ));
    }

    let total: Money = fees.iter().map(|f| f.amount).sum();
    output.push_str(&format!("\n{} fee(s), total {}", fees.len(), total));
    output
}

/// Format expenses as a table with their total
pub fn format_expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let description_width = expenses
        .iter()
        .map(|e| e.description.len())
        .max()
        .unwrap_or(11)
        .max(11);

    let mut output = format!(
        "{:<12}  {:<10}  {:<description_width$}  {:<12}  {:>12}\n",
        "ID",
        "Date",
        "Description",
        "Category",
        "Amount",
        description_width = description_width,
    );
    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<description_width$}  {:-<12}  {:->12}\n",
        "",
        "",
        "",
        "",
        "",
        description_width = description_width,
    ));

    for expense in expenses {
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<description_width$}  {:<12}  {:>12}\n",
            expense.id.to_string(),
            expense.date.to_string(),
            expense.description,
            expense.category.as_deref().unwrap_or(""),
            expense.amount.to_string(),
            description_width = description_width,
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&format!("\n{} expense(s), total {}", expenses.len(), total));
    output
}
