//! Dues CLI commands
//!
//! Ledger views, payments, bulk payments and direct entry maintenance.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{
    format_allocation_plan, format_apply_report, format_balance, format_bulk_plan,
    format_entry_edit, format_ledger, format_receipt,
};
use crate::error::LodgeResult;
use crate::models::{EntryChanges, Member, ReceiptLine, ReceiptRef};
use crate::services::{
    line_for_edit, lines_from_report, AdvancePayInput, ApplyReport, DuesService, MemberService,
    PaymentInput, PaymentOutcome, PaymentPreview, PaymentService, QuickPayInput, ReceiptService,
};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_month, parse_window};

#[derive(Subcommand)]
pub enum DuesCommands {
    /// Show a member's fiscal-year ledger
    Ledger {
        /// Member name or ID
        member: String,
        /// Fiscal year ("2025" or "2025-2026"); defaults to the current one
        #[arg(short, long)]
        year: Option<String>,
    },
    /// Record a payment against a month
    ///
    /// An empty month spreads the money over unpaid months, earlier ones
    /// first. A month that already has an entry is edited in place.
    Pay {
        member: String,
        /// Month paid against (YYYY-MM)
        month: String,
        amount: String,
        /// Payment date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        /// Reference to an uploaded receipt image
        #[arg(short, long)]
        attachment: Option<String>,
        /// Show the plan without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Do not issue a receipt number
        #[arg(long)]
        no_receipt: bool,
    },
    /// Edit a single entry in place
    Edit {
        /// Entry ID
        entry: String,
        #[arg(long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        #[arg(short, long)]
        attachment: Option<String>,
    },
    /// Delete a single entry
    Delete { entry: String },
    /// Pay every empty month of a fiscal year at a flat rate; 12th month free
    QuickPay {
        member: String,
        /// Amount per month
        amount: String,
        /// Payment date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        year: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        #[arg(short, long)]
        attachment: Option<String>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        no_receipt: bool,
    },
    /// Pay selected months ahead at the full fee
    AdvancePay {
        member: String,
        /// Months to pay (YYYY-MM ...)
        #[arg(required = true, num_args = 1..)]
        months: Vec<String>,
        /// Payment date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        #[arg(short, long)]
        attachment: Option<String>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        no_receipt: bool,
    },
    /// Show what a member has paid and still owes
    Balance {
        member: String,
        #[arg(short, long)]
        year: Option<String>,
    },
}

pub fn handle_dues_command(
    storage: &Storage,
    settings: &Settings,
    cmd: DuesCommands,
) -> LodgeResult<()> {
    let members = MemberService::new(storage);
    let dues = DuesService::new(storage, settings);
    let payments = PaymentService::new(storage, settings);

    match cmd {
        DuesCommands::Ledger { member, year } => {
            let member = members.resolve(&member)?;
            let window = parse_window(year.as_deref())?;
            let slots = dues.ledger(member.id, window)?;
            print!(
                "{}",
                format_ledger(&member, window, &slots, settings.monthly_fee_base)
            );
            println!("{}", format_balance(&member, &dues.balance(member.id, window)?));
        }

        DuesCommands::Pay {
            member,
            month,
            amount,
            date,
            note,
            attachment,
            dry_run,
            no_receipt,
        } => {
            let member = members.resolve(&member)?;
            let month = parse_month(&month)?;
            let amount = parse_money(&amount)?;
            let payment_date = date.as_deref().map(parse_date).transpose()?;

            if dry_run {
                match payments.preview(member.id, month, amount)? {
                    PaymentPreview::Edit {
                        existing,
                        new_amount,
                    } => println!(
                        "{} already has an entry ({}); it would be set to {}",
                        month, existing.amount, new_amount
                    ),
                    PaymentPreview::Allocate(plan) => print!("{}", format_allocation_plan(&plan)),
                }
                println!("Dry run: nothing was written.");
                return Ok(());
            }

            let attachment = attachment.map(ReceiptRef::new);
            let outcome = payments.pay_month(PaymentInput {
                member_id: member.id,
                month,
                amount,
                payment_date,
                note,
                receipt: attachment.clone(),
            })?;

            let lines = match &outcome {
                PaymentOutcome::Edited(edit) => {
                    println!("{}", format_entry_edit(&edit.before, &edit.after));
                    if let Some(e) = &edit.audit_failure {
                        println!("  Warning: audit log not written: {}", e);
                    }
                    vec![line_for_edit(&edit.before, &edit.after)]
                }
                PaymentOutcome::Allocated { plan, report } => {
                    print!("{}", format_allocation_plan(plan));
                    println!("{}", format_apply_report(report));
                    lines_from_report(report)
                }
            };

            if !no_receipt && outcome.amount_recorded().is_positive() {
                print_receipt(storage, settings, &member, payment_date, lines, attachment)?;
            }
        }

        DuesCommands::Edit {
            entry,
            amount,
            date,
            note,
            attachment,
        } => {
            let found = dues.resolve(&entry)?;
            let mut changes = EntryChanges::new();
            if let Some(amount) = amount {
                changes = changes.amount(parse_money(&amount)?);
            }
            if let Some(date) = date {
                changes = changes.payment_date(parse_date(&date)?);
            }
            if let Some(note) = note {
                changes = changes.note(Some(note));
            }
            if let Some(attachment) = attachment {
                changes = changes.receipt(ReceiptRef::new(attachment));
            }

            if changes.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let edit = dues.edit_entry(found.id, &changes)?;
            println!("{}", format_entry_edit(&edit.before, &edit.after));
            if let Some(e) = &edit.audit_failure {
                println!("  Warning: audit log not written: {}", e);
            }
        }

        DuesCommands::Delete { entry } => {
            let found = dues.resolve(&entry)?;
            let deleted = dues.delete_entry(found.id)?;
            println!(
                "Deleted {} entry for {} ({})",
                deleted.kind.tag(),
                deleted.dues_month(),
                deleted.amount
            );
        }

        DuesCommands::QuickPay {
            member,
            amount,
            date,
            year,
            note,
            attachment,
            dry_run,
            no_receipt,
        } => {
            let member = members.resolve(&member)?;
            let attachment = attachment.map(ReceiptRef::new);
            let input = QuickPayInput {
                member_id: member.id,
                window: parse_window(year.as_deref())?,
                monthly_amount: parse_money(&amount)?,
                payment_date: date.as_deref().map(parse_date).transpose()?,
                note,
                receipt: attachment.clone(),
            };

            if dry_run {
                print!("{}", format_bulk_plan(&payments.preview_quick_pay(&input)?));
                println!("Dry run: nothing was written.");
                return Ok(());
            }

            let (plan, report) = payments.quick_pay(&input)?;
            print!("{}", format_bulk_plan(&plan));
            finish_bulk(
                storage,
                settings,
                &member,
                input.payment_date,
                &report,
                attachment,
                no_receipt,
            )?;
        }

        DuesCommands::AdvancePay {
            member,
            months,
            date,
            note,
            attachment,
            dry_run,
            no_receipt,
        } => {
            let member = members.resolve(&member)?;
            let attachment = attachment.map(ReceiptRef::new);
            let input = AdvancePayInput {
                member_id: member.id,
                months: months
                    .iter()
                    .map(|m| parse_month(m))
                    .collect::<LodgeResult<Vec<_>>>()?,
                payment_date: date.as_deref().map(parse_date).transpose()?,
                note,
                receipt: attachment.clone(),
            };

            if dry_run {
                print!("{}", format_bulk_plan(&payments.preview_advance_pay(&input)?));
                println!("Dry run: nothing was written.");
                return Ok(());
            }

            let (plan, report) = payments.advance_pay(&input)?;
            print!("{}", format_bulk_plan(&plan));
            finish_bulk(
                storage,
                settings,
                &member,
                input.payment_date,
                &report,
                attachment,
                no_receipt,
            )?;
        }

        DuesCommands::Balance { member, year } => {
            let member = members.resolve(&member)?;
            let window = parse_window(year.as_deref())?;
            println!("{}", format_balance(&member, &dues.balance(member.id, window)?));
        }
    }

    Ok(())
}

fn finish_bulk(
    storage: &Storage,
    settings: &Settings,
    member: &Member,
    payment_date: Option<NaiveDate>,
    report: &ApplyReport,
    attachment: Option<ReceiptRef>,
    no_receipt: bool,
) -> LodgeResult<()> {
    println!("{}", format_apply_report(report));
    if !no_receipt && report.amount_applied().is_positive() {
        print_receipt(
            storage,
            settings,
            member,
            payment_date,
            lines_from_report(report),
            attachment,
        )?;
    }
    Ok(())
}

fn print_receipt(
    storage: &Storage,
    settings: &Settings,
    member: &Member,
    payment_date: Option<NaiveDate>,
    lines: Vec<ReceiptLine>,
    attachment: Option<ReceiptRef>,
) -> LodgeResult<()> {
    let issued_on = payment_date.unwrap_or_else(|| Local::now().date_naive());
    let receipt =
        ReceiptService::new(storage, settings).issue(issued_on, member, lines, attachment)?;
    println!();
    println!("{}", format_receipt(&receipt, settings));
    Ok(())
}
