//! Lodge expense commands

use chrono::Local;
use clap::Subcommand;

use crate::display::format_expense_list;
use crate::error::LodgeResult;
use crate::models::ReceiptRef;
use crate::services::{ExpenseInput, ExpenseService};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_window};

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record money paid out by the lodge
    Add {
        description: String,
        amount: String,
        /// Date paid (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        /// Invoice or voucher reference
        #[arg(short, long)]
        attachment: Option<String>,
    },
    /// List expenses
    List {
        /// Fiscal year ("2025" or "2025-2026")
        #[arg(short, long)]
        year: Option<String>,
        /// Include every year
        #[arg(long, conflicts_with = "year")]
        all: bool,
    },
}

pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> LodgeResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            date,
            category,
            note,
            attachment,
        } => {
            let recorded = service.record(ExpenseInput {
                description,
                amount: parse_money(&amount)?,
                date: match date {
                    Some(d) => parse_date(&d)?,
                    None => Local::now().date_naive(),
                },
                category,
                note,
                attachment: attachment.map(ReceiptRef::new),
            })?;

            println!(
                "Recorded expense '{}' of {} ({})",
                recorded.expense.description, recorded.expense.amount, recorded.expense.id
            );
            if let Some(e) = &recorded.audit_failure {
                println!("  Warning: audit log not written: {}", e);
            }
        }

        ExpenseCommands::List { year, all } => {
            let window = if all {
                None
            } else {
                Some(parse_window(year.as_deref())?)
            };
            println!("{}", format_expense_list(&service.list(window)?));
        }
    }

    Ok(())
}
