//! Extraordinary and degree fee commands

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_fee_list, format_receipt};
use crate::error::{LodgeError, LodgeResult};
use crate::models::{FeeKind, ReceiptRef};
use crate::services::{FeeInput, FeeService, MemberService};
use crate::storage::Storage;

use super::{parse_date, parse_money};

#[derive(Subcommand)]
pub enum FeeCommands {
    /// Record a fee paid by a member
    Add {
        member: String,
        /// extraordinary or degree
        kind: String,
        amount: String,
        /// Payment date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        /// Reference to an uploaded receipt image
        #[arg(short, long)]
        attachment: Option<String>,
        /// Do not issue a receipt number
        #[arg(long)]
        no_receipt: bool,
    },
    /// List recorded fees
    List {
        /// Only this member's fees
        member: Option<String>,
        /// Only fees of this kind
        #[arg(short, long)]
        kind: Option<String>,
    },
}

fn parse_kind(input: &str) -> LodgeResult<FeeKind> {
    FeeKind::parse(input).ok_or_else(|| {
        LodgeError::Validation(format!(
            "Unknown fee kind '{}'. Use extraordinary or degree",
            input
        ))
    })
}

pub fn handle_fee_command(
    storage: &Storage,
    settings: &Settings,
    cmd: FeeCommands,
) -> LodgeResult<()> {
    let members = MemberService::new(storage);
    let fees = FeeService::new(storage, settings);

    match cmd {
        FeeCommands::Add {
            member,
            kind,
            amount,
            date,
            note,
            attachment,
            no_receipt,
        } => {
            let member = members.resolve(&member)?;
            let recorded = fees.record(FeeInput {
                member_id: member.id,
                kind: parse_kind(&kind)?,
                amount: parse_money(&amount)?,
                date: match date {
                    Some(d) => parse_date(&d)?,
                    None => Local::now().date_naive(),
                },
                note,
                attachment: attachment.map(ReceiptRef::new),
                issue_receipt: !no_receipt,
            })?;

            println!(
                "Recorded {} fee of {} for {} ({})",
                recorded.fee.kind, recorded.fee.amount, member.full_name, recorded.fee.id
            );
            if let Some(e) = &recorded.audit_failure {
                println!("  Warning: audit log not written: {}", e);
            }
            if let Some(receipt) = &recorded.receipt {
                println!();
                println!("{}", format_receipt(receipt, settings));
            }
        }

        FeeCommands::List { member, kind } => {
            let member_id = member
                .as_deref()
                .map(|m| members.resolve(m))
                .transpose()?
                .map(|m| m.id);
            let kind = kind.as_deref().map(parse_kind).transpose()?;

            let listed = fees.list(member_id, kind)?;
            let roll = members.list(true)?;
            println!("{}", format_fee_list(&listed, &roll));
        }
    }

    Ok(())
}
