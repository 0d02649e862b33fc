//! Export commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{LodgeError, LodgeResult};
use crate::export::export_dues_csv;
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export every dues entry to CSV
    Dues {
        /// Output file; stdout when omitted
        output: Option<PathBuf>,
    },
}

pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> LodgeResult<()> {
    match cmd {
        ExportCommands::Dues { output } => {
            let entries = storage.dues.get_all()?;
            let members = storage.members.get_all()?;

            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        LodgeError::Export(format!("Failed to create {}: {}", path.display(), e))
                    })?;
                    let count = export_dues_csv(&entries, &members, BufWriter::new(file))?;
                    println!("Exported {} dues entries to {}", count, path.display());
                }
                None => {
                    export_dues_csv(&entries, &members, std::io::stdout().lock())?;
                }
            }
        }
    }

    Ok(())
}
