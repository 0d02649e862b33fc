//! Fiscal-year ledger grid

use crate::models::{FiscalYearWindow, Member, Money};
use crate::services::{LedgerSlot, MemberBalance, SlotStatus};

fn status_label(status: &SlotStatus) -> String {
    match status {
        SlotStatus::Empty => "unpaid".to_string(),
        SlotStatus::Partial { deficit, .. } => format!("owes {}", deficit),
        SlotStatus::Paid => "paid".to_string(),
        SlotStatus::Benefit => "free".to_string(),
    }
}

/// Twelve rows, July first
pub fn format_ledger(
    member: &Member,
    window: FiscalYearWindow,
    slots: &[LedgerSlot],
    monthly_fee: Money,
) -> String {
    let mut output = format!(
        "{}: fiscal year {} (fee {})\n\n",
        member.full_name, window, monthly_fee
    );
    output.push_str(&format!(
        "{:>3}  {:<8}  {:>10}  {:<17}  {:<12}  {:<10}  {}\n",
        "#", "Month", "Amount", "Type", "Status", "Paid on", "Entry"
    ));
    output.push_str(&format!(
        "{:->3}  {:-<8}  {:->10}  {:-<17}  {:-<12}  {:-<10}  {:-<12}\n",
        "", "", "", "", "", "", ""
    ));

    for slot in slots {
        let (amount, kind, date, id) = match &slot.entry {
            Some(entry) => (
                entry.amount.to_string(),
                entry.kind.tag().to_string(),
                entry
                    .payment_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                entry.id.to_string(),
            ),
            None => ("-".to_string(), String::new(), String::new(), String::new()),
        };

        output.push_str(&format!(
            "{:>3}  {:<8}  {:>10}  {:<17}  {:<12}  {:<10}  {}\n",
            slot.index,
            format!("{} {}", slot.month.short_name(), slot.month.year),
            amount,
            kind,
            status_label(&slot.status),
            date,
            id,
        ));
    }

    output
}

pub fn format_balance(member: &Member, balance: &MemberBalance) -> String {
    format!(
        "{}: fiscal year {}\n  Monthly fee:      {}\n  Paid this year:   {}\n  Outstanding:      {}\n  Paid (all years): {}",
        member.full_name,
        balance.window,
        balance.monthly_fee,
        balance.paid_in_window,
        balance.outstanding,
        balance.accumulated_paid,
    )
}
