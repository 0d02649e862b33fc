//! Member display formatting

use crate::models::Member;

/// Format the member roll as a table
pub fn format_member_list(members: &[Member]) -> String {
    if members.is_empty() {
        return "No members found.".to_string();
    }

    let name_width = members
        .iter()
        .map(|m| m.full_name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let category_width = members
        .iter()
        .map(|m| m.dues_category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = format!(
        "{:<12}  {:<name_width$}  {:<category_width$}  {:<8}  {}\n",
        "ID",
        "Name",
        "Category",
        "Status",
        "Joined",
        name_width = name_width,
        category_width = category_width,
    );
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<category_width$}  {:-<8}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        category_width = category_width,
    ));

    for member in members {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<category_width$}  {:<8}  {}\n",
            member.id.to_string(),
            member.full_name,
            member.dues_category,
            member.status.to_string(),
            member
                .joined_on
                .map(|d| d.to_string())
                .unwrap_or_default(),
            name_width = name_width,
            category_width = category_width,
        ));
    }

    output.push_str(&format!("\n{} member(s)", members.len()));
    output
}

pub fn format_member_details(member: &Member) -> String {
    let mut output = format!("Member: {}\n", member.full_name);
    output.push_str(&format!("  ID:       {}\n", member.id));
    output.push_str(&format!("  Category: {}\n", member.dues_category));
    output.push_str(&format!("  Status:   {}\n", member.status));
    if let Some(phone) = &member.phone {
        output.push_str(&format!("  Phone:    {}\n", phone));
    }
    if let Some(joined) = member.joined_on {
        output.push_str(&format!("  Joined:   {}\n", joined));
    }
    output.push_str(&format!(
        "  Created:  {}",
        member.created_at.format("%Y-%m-%d %H:%M")
    ));
    output
}
