//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Each area has its
//! own subcommand enum and `handle_*` function.

pub mod audit;
pub mod dues;
pub mod expense;
pub mod export;
pub mod fee;
pub mod member;
pub mod receipt;

pub use audit::handle_audit_command;
pub use dues::{handle_dues_command, DuesCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use fee::{handle_fee_command, FeeCommands};
pub use member::{handle_member_command, MemberCommands};
pub use receipt::{handle_receipt_command, ReceiptCommands};

use chrono::NaiveDate;

use crate::error::{LodgeError, LodgeResult};
use crate::models::{DuesMonth, FiscalYearWindow, Money};

pub(crate) fn parse_date(input: &str) -> LodgeResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        LodgeError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", input))
    })
}

pub(crate) fn parse_money(input: &str) -> LodgeResult<Money> {
    Money::parse(input).map_err(|e| {
        LodgeError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '50' or '50.00' ({})",
            input, e
        ))
    })
}

pub(crate) fn parse_month(input: &str) -> LodgeResult<DuesMonth> {
    DuesMonth::parse(input).map_err(|e| LodgeError::Validation(e.to_string()))
}

/// Explicit fiscal year, or the one containing today
pub(crate) fn parse_window(input: Option<&str>) -> LodgeResult<FiscalYearWindow> {
    match input {
        Some(s) => FiscalYearWindow::parse(s).map_err(|e| LodgeError::Validation(e.to_string())),
        None => Ok(FiscalYearWindow::current()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers() {
        assert_eq!(
            parse_date("2025-09-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
        );
        assert!(parse_date("09/01/2025").unwrap_err().is_validation());
        assert_eq!(parse_money("$50").unwrap(), Money::from_units(50));
        assert!(parse_money("fifty").unwrap_err().is_validation());
        assert_eq!(parse_month("2026-01").unwrap(), DuesMonth::new(2026, 1));
        assert_eq!(
            parse_window(Some("2025-2026")).unwrap(),
            FiscalYearWindow::starting(2025)
        );
    }
}
