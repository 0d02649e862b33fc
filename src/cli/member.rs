//! Member CLI commands

use clap::Subcommand;

use crate::display::{format_member_details, format_member_list};
use crate::error::LodgeResult;
use crate::models::MemberStatus;
use crate::services::{CreateMemberInput, MemberService, UpdateMemberInput};
use crate::storage::Storage;

use super::parse_date;

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a member to the roll
    Add {
        /// Full name
        name: String,
        /// Monthly-dues category
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        /// Date joined (YYYY-MM-DD)
        #[arg(short, long)]
        joined: Option<String>,
    },
    /// List members
    List {
        /// Include inactive members
        #[arg(short, long)]
        all: bool,
    },
    /// Show member details
    Show {
        /// Member name or ID
        member: String,
    },
    /// Edit a member
    Edit {
        /// Member name or ID
        member: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        joined: Option<String>,
    },
    /// Take a member off the active roll
    Deactivate { member: String },
    /// Put a member back on the active roll
    Activate { member: String },
}

pub fn handle_member_command(storage: &Storage, cmd: MemberCommands) -> LodgeResult<()> {
    let service = MemberService::new(storage);

    match cmd {
        MemberCommands::Add {
            name,
            category,
            phone,
            joined,
        } => {
            let member = service.create(CreateMemberInput {
                full_name: name,
                dues_category: category,
                phone,
                joined_on: joined.as_deref().map(parse_date).transpose()?,
            })?;
            println!("Added member: {}", member.full_name);
            println!("  Category: {}", member.dues_category);
            println!("  ID: {}", member.id);
        }

        MemberCommands::List { all } => {
            println!("{}", format_member_list(&service.list(all)?));
        }

        MemberCommands::Show { member } => {
            let found = service.resolve(&member)?;
            println!("{}", format_member_details(&found));
        }

        MemberCommands::Edit {
            member,
            name,
            category,
            phone,
            joined,
        } => {
            let found = service.resolve(&member)?;
            let updated = service.update(
                found.id,
                UpdateMemberInput {
                    full_name: name,
                    dues_category: category,
                    phone,
                    joined_on: joined.as_deref().map(parse_date).transpose()?,
                },
            )?;
            println!("Updated member: {}", updated.full_name);
        }

        MemberCommands::Deactivate { member } => {
            let found = service.resolve(&member)?;
            let updated = service.set_status(found.id, MemberStatus::Inactive)?;
            println!("{} is now inactive", updated.full_name);
        }

        MemberCommands::Activate { member } => {
            let found = service.resolve(&member)?;
            let updated = service.set_status(found.id, MemberStatus::Active)?;
            println!("{} is now active", updated.full_name);
        }
    }

    Ok(())
}
