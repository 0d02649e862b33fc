use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use lodge_dues::cli::{
    handle_audit_command, handle_dues_command, handle_expense_command, handle_export_command,
    handle_fee_command, handle_member_command, handle_receipt_command, DuesCommands,
    ExpenseCommands, ExportCommands, FeeCommands, MemberCommands, ReceiptCommands,
};
use lodge_dues::config::{paths::LodgePaths, settings::Settings};
use lodge_dues::models::Money;
use lodge_dues::storage::Storage;

#[derive(Parser)]
#[command(
    name = "lodge",
    version,
    about = "Lodge treasury: members, monthly dues, fees and receipts",
    long_about = "Keeps the member roll and each member's fiscal-year dues ledger \
                  (July to June). Payments against an empty month settle earlier \
                  unpaid months first; quick-pay and advance-pay cover many months \
                  at once."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and settings
    Init {
        /// Monthly dues owed by every member
        #[arg(long)]
        monthly_fee: Option<String>,
        /// Lodge name printed on receipts
        #[arg(long)]
        institution: Option<String>,
        /// Treasurer name printed on receipts
        #[arg(long)]
        treasurer: Option<String>,
    },

    /// Show configuration and paths
    Config,

    /// Member roll
    #[command(subcommand)]
    Member(MemberCommands),

    /// Ledgers and payments
    #[command(subcommand)]
    Dues(DuesCommands),

    /// Extraordinary and degree fees
    #[command(subcommand)]
    Fee(FeeCommands),

    /// Lodge expenses
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Receipt numbering
    #[command(subcommand)]
    Receipt(ReceiptCommands),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent audit records
    Audit {
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// member, dues, receipt, fee or expense
        #[arg(short, long)]
        entity: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let paths = LodgePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("lodge - treasury for monthly lodge dues");
        println!();
        println!("Run 'lodge init' to get started, or 'lodge --help' for usage.");
        return Ok(());
    };

    match command {
        Commands::Init {
            monthly_fee,
            institution,
            treasurer,
        } => {
            if let Some(fee) = monthly_fee {
                settings.monthly_fee_base = Money::parse(&fee)
                    .with_context(|| format!("Invalid monthly fee '{}'", fee))?;
            }
            if let Some(name) = institution {
                settings.institution_name = name;
            }
            if let Some(name) = treasurer {
                settings.treasurer_name = name;
            }

            let storage = Storage::new(paths.clone())?;
            settings.save(&paths)?;
            storage.load_all()?;

            println!("Initialized lodge-dues at: {}", paths.base_dir().display());
            println!("  Institution: {}", settings.institution_name);
            println!("  Monthly fee: {}", settings.format_money(settings.monthly_fee_base));
        }

        Commands::Config => {
            println!("lodge-dues configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!("Initialized:    {}", paths.is_initialized());
            println!();
            println!("Institution:    {}", settings.institution_name);
            println!("Treasurer:      {}", settings.treasurer_name);
            println!("Monthly fee:    {}", settings.format_money(settings.monthly_fee_base));
        }

        command => {
            if !paths.is_initialized() {
                bail!("lodge-dues is not initialized here; run 'lodge init' first");
            }

            let storage = Storage::new(paths)?;
            storage.load_all()?;

            match command {
                Commands::Member(cmd) => handle_member_command(&storage, cmd)?,
                Commands::Dues(cmd) => handle_dues_command(&storage, &settings, cmd)?,
                Commands::Fee(cmd) => handle_fee_command(&storage, &settings, cmd)?,
                Commands::Expense(cmd) => handle_expense_command(&storage, cmd)?,
                Commands::Receipt(cmd) => handle_receipt_command(&storage, &settings, cmd)?,
                Commands::Export(cmd) => handle_export_command(&storage, cmd)?,
                Commands::Audit { limit, entity } => handle_audit_command(&storage, limit, entity)?,
                Commands::Init { .. } | Commands::Config => {}
            }
        }
    }

    Ok(())
}
