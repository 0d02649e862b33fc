//! Core data models for lodge-dues
//!
//! This module contains the data structures that represent the dues domain:
//! members, dues entries, the fiscal calendar, money, receipts, and the
//! one-off fees and expenses kept beside the ledger.

pub mod dues;
pub mod fee;
pub mod fiscal;
pub mod ids;
pub mod member;
pub mod money;
pub mod receipt;

pub use dues::{DuesEntry, EntryChanges, PaymentKind, ReceiptRef, SlotKey};
pub use fee::{Expense, FeeKind, FeeRecord, RecordValidationError};
pub use fiscal::{month_year_for_index, DuesMonth, FiscalYearWindow, FISCAL_MONTHS};
pub use ids::{DuesEntryId, ExpenseId, FeeRecordId, MemberId, PaymentGroupId};
pub use member::{Member, MemberStatus};
pub use money::Money;
pub use receipt::{PaymentReceipt, ReceiptLine, ReceiptModule};
