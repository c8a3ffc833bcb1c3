use anyhow::Result;
use clap::{Parser, Subcommand};

use bimil::cli::{handle_backup_command, BackupCommands};
use bimil::config::{paths::BimilPaths, settings::Settings};
use bimil::storage::{init::initialize_storage, Storage};
use bimil::BimilError;

#[derive(Parser)]
#[command(
    name = "bimil",
    version,
    about = "Password-hint manager with encrypted backups",
    long_about = "Bimil remembers how you log in to each account (which SSO \
                  provider, which password rules) without storing passwords. \
                  Its data can be moved between devices as a password-encrypted \
                  backup file."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypted backup commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BimilPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    bimil::logging::init_logging(&settings.log_filter);

    match cli.command {
        Some(Commands::Backup(cmd)) => {
            if !paths.is_initialized() {
                return Err(BimilError::Config(
                    "Bimil is not initialized. Run 'bimil init' first.".into(),
                )
                .into());
            }
            let storage = Storage::open(paths)?;
            handle_backup_command(&storage, &settings, cmd).await?;
        }
        Some(Commands::Init) => {
            println!("Initializing Bimil at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;

            let storage = Storage::open(paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default categories:");
            for category in storage.categories.get_all()? {
                println!("  - {}", category.name);
            }
            println!();
            println!("Run 'bimil backup create' to make your first backup.");
        }
        Some(Commands::Config) => {
            println!("Bimil Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!(
                "  Backups kept:     {}",
                settings.backup_retention.max_backups
            );
            println!("  Merge by default: {}", settings.merge_by_default);
            println!("  Log filter:       {}", settings.log_filter);
        }
        None => {
            println!("Bimil - password hints, never passwords");
            println!();
            println!("Run 'bimil --help' for usage information.");
        }
    }

    Ok(())
}
