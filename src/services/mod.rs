//! Service layer for lodge-dues
//!
//! Business rules on top of the storage layer. The allocator, bulk
//! strategies and ledger views are pure functions over a snapshot; the
//! `*Service` types wire them to storage, settings and the audit log.

pub mod allocator;
pub mod apply;
pub mod bulk;
pub mod dues;
pub mod expense;
pub mod fee;
pub mod ledger;
pub mod member;
pub mod payment;
pub mod receipt;

pub use allocator::{allocate, AllocationPlan, PlannedSlot, SlotChange};
pub use apply::{apply_bulk, apply_plan, AppliedSlot, ApplyReport, SlotFailure};
pub use bulk::{plan_advance_pay, plan_quick_pay, BulkKind, BulkPlan, PaymentDetails};
pub use dues::{DuesService, EntryEdit, MemberBalance};
pub use expense::{ExpenseInput, ExpenseService, RecordedExpense};
pub use fee::{FeeInput, FeeService, RecordedFee};
pub use ledger::{LedgerSlot, LedgerSnapshot, SlotStatus};
pub use member::{CreateMemberInput, MemberService, UpdateMemberInput};
pub use payment::{
    AdvancePayInput, PaymentInput, PaymentOutcome, PaymentPreview, PaymentService, QuickPayInput,
};
pub use receipt::{line_for_edit, lines_from_report, ReceiptService};
