//! Receipt numbering commands

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{LodgeError, LodgeResult};
use crate::models::ReceiptModule;
use crate::services::ReceiptService;
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum ReceiptCommands {
    /// Take the next receipt number of a module
    Next {
        /// treasury, extraordinary or degree
        #[arg(default_value = "treasury")]
        module: String,
    },
    /// Show the last number issued per module
    Status,
}

pub fn handle_receipt_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReceiptCommands,
) -> LodgeResult<()> {
    let service = ReceiptService::new(storage, settings);

    match cmd {
        ReceiptCommands::Next { module } => {
            let module = ReceiptModule::parse(&module).ok_or_else(|| {
                LodgeError::Validation(format!(
                    "Unknown receipt module '{}'. Use treasury, extraordinary or degree",
                    module
                ))
            })?;
            println!("{}", service.next_number(module)?);
        }

        ReceiptCommands::Status => {
            for module in ReceiptModule::all() {
                let last = service
                    .last_number(*module)?
                    .unwrap_or_else(|| "none issued".to_string());
                println!("{:<14} {}", module.to_string(), last);
            }
        }
    }

    Ok(())
}
