//! CSV export of dues entries

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::LodgeResult;
use crate::models::{DuesEntry, Member, MemberId};

#[derive(Debug, Serialize)]
struct DuesRow<'a> {
    id: String,
    member: &'a str,
    month: u32,
    year: i32,
    amount: String,
    kind: &'static str,
    group: String,
    payment_date: String,
    note: &'a str,
    receipt: &'a str,
}

/// Write one row per entry, grouped by member then month
pub fn export_dues_csv<W: Write>(
    entries: &[DuesEntry],
    members: &[Member],
    writer: W,
) -> LodgeResult<usize> {
    let names: HashMap<MemberId, &str> = members
        .iter()
        .map(|m| (m.id, m.full_name.as_str()))
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer.serialize(DuesRow {
            id: entry.id.as_uuid().to_string(),
            member: names.get(&entry.member_id).copied().unwrap_or("Unknown"),
            month: entry.month,
            year: entry.year,
            amount: format!("{}.{:02}", entry.amount.units(), entry.amount.cents_part()),
            kind: entry.kind.tag(),
            group: entry
                .group_id()
                .map(|g| g.as_uuid().to_string())
                .unwrap_or_default(),
            payment_date: entry
                .payment_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            note: entry.note.as_deref().unwrap_or(""),
            receipt: entry.receipt.as_ref().map(|r| r.as_str()).unwrap_or(""),
        })?;
    }
    csv_writer.flush()?;

    Ok(entries.len())
}
