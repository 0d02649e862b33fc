//! Display formatting for terminal output
//!
//! Plain aligned-column text; the CLI prints whatever these return.

pub mod fee;
pub mod ledger;
pub mod member;
pub mod payment;
pub mod receipt;

pub use fee::{format_expense_list, format_fee_list};
pub use ledger::{format_balance, format_ledger};
pub use member::{format_member_details, format_member_list};
pub use payment::{format_allocation_plan, format_apply_report, format_bulk_plan, format_entry_edit};
pub use receipt::format_receipt;
