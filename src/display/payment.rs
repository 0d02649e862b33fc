//! Payment plan and result formatting

use crate::models::{DuesEntry, Money};
use crate::services::{AllocationPlan, ApplyReport, BulkPlan, SlotChange};

/// Show how a lump sum will be spread
pub fn format_allocation_plan(plan: &AllocationPlan) -> String {
    let mut output = format!(
        "Payment of {} against {} (fiscal year {})\n",
        plan.lump_sum, plan.target, plan.window
    );

    if plan.is_empty() {
        output.push_str("  Nothing to allocate: every month is already settled.\n");
    }

    for slot in &plan.slots {
        let action = match slot.change() {
            SlotChange::Create => "new".to_string(),
            SlotChange::TopUp => format!(
                "top-up from {}",
                slot.existing
                    .as_ref()
                    .map(|e| e.amount)
                    .unwrap_or_default()
            ),
        };
        let marker = if slot.month == plan.target { " <- target" } else { "" };
        output.push_str(&format!(
            "  [{:>2}] {}  +{:<10} -> {:<10} ({}){}\n",
            slot.index,
            slot.month,
            slot.delta.to_string(),
            slot.amount.to_string(),
            action,
            marker
        ));
    }

    output.push_str(&format!("  Allocated:   {}\n", plan.total_allocated()));
    if plan.unallocated.is_positive() {
        output.push_str(&format!(
            "  Unallocated: {} (exceeds what this fiscal year still owes)\n",
            plan.unallocated
        ));
    }
    if plan.needs_additional_receipt() {
        output.push_str("  Covers several months: attach the receipt to each entry.\n");
    }
    output
}

/// Show the entries a bulk payment will create
pub fn format_bulk_plan(plan: &BulkPlan) -> String {
    let mut output = format!(
        "{} {} for {} month(s), total {}\n",
        plan.kind,
        plan.group_id,
        plan.entries.len(),
        plan.total
    );
    for entry in &plan.entries {
        output.push_str(&format!(
            "  {}  {:>10}  {}\n",
            entry.dues_month(),
            entry.amount.to_string(),
            entry.kind.tag()
        ));
    }
    output
}

/// "k of N slots applied" plus one line per failure
pub fn format_apply_report(report: &ApplyReport) -> String {
    let mut output = format!(
        "{} ({} recorded)",
        report.summary(),
        report.amount_applied()
    );
    for failure in &report.failures {
        output.push_str(&format!("\n  {} failed: {}", failure.month, failure.error));
    }
    if report.was_abandoned() {
        let months: Vec<String> = report.abandoned.iter().map(|m| m.to_string()).collect();
        output.push_str(&format!("\n  Not attempted: {}", months.join(", ")));
    }
    if let Some(error) = &report.audit_failure {
        output.push_str(&format!("\n  Warning: audit log not written: {}", error));
    }
    output
}

pub fn format_entry_edit(before: &DuesEntry, after: &DuesEntry) -> String {
    let delta: Money = after.amount - before.amount;
    format!(
        "Updated {} ({}): {} -> {} ({}{})",
        after.dues_month(),
        after.id,
        before.amount,
        after.amount,
        if delta.is_negative() { "" } else { "+" },
        delta
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FiscalYearWindow, MemberId};
    use crate::services::{allocate, LedgerSnapshot};

    #[test]
    fn test_plan_marks_target_and_unallocated() {
        let member = MemberId::new();
        let window = FiscalYearWindow::starting(2025);
        let fee = Money::from_units(50);
        let paid: Vec<_> = (1..12)
            .map(|i| DuesEntry::regular(member, window.month_at(i), fee))
            .collect();
        let snapshot = LedgerSnapshot::new(member, window, paid);

        let plan = allocate(&snapshot, window.month_at(0), Money::from_units(70), fee).unwrap();
        let output = format_allocation_plan(&plan);

        assert!(output.contains("<- target"));
        assert!(output.contains("Unallocated: $20.00"));
        assert!(!output.contains("several months"));
    }
}
