//! netcfg - netplan and udev configuration CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use netcfg::commands::{ConfigureCommand, ConfigureOptions, RestartCommand, ValidateCommand};
use netcfg_config::NetcfgSettings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netcfg")]
#[command(about = "Netplan and udev network configuration CLI")]
#[command(version, disable_version_flag = true)]
#[command(long_about = "
Netplan and udev network configuration CLI

Reads interface descriptors (a JSON object or a JSON array of objects),
checks them for conflicts, writes the netplan YAML document and udev
naming rules, and optionally restarts the network service.

Examples:
  netcfg validate interfaces.json                   # Check descriptors
  netcfg configure interfaces.json --dry-run        # Print the document
  netcfg configure interfaces.json                  # Write configuration
  netcfg configure interfaces.json --restart        # Write and restart
  netcfg configure interfaces.json -b NetworkManager
  netcfg restart                                    # Restart network service
")]
struct Cli {
    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Settings file (defaults to /etc/netcfg/netcfg.toml or ./netcfg.toml)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'V', long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate interface descriptors and show the processing order
    Validate {
        /// JSON descriptor file
        file: PathBuf,
    },

    /// Write netplan configuration and udev rules
    Configure {
        /// JSON descriptor file
        file: PathBuf,

        /// Renderer token (networkd, NetworkManager)
        #[arg(short, long)]
        backend: Option<String>,

        /// Restart the network service after writing
        #[arg(short, long)]
        restart: bool,

        /// Print the configuration instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Restart the network service
    Restart,
}

fn load_settings(path: Option<&PathBuf>) -> Result<NetcfgSettings> {
    match path {
        Some(path) => NetcfgSettings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => NetcfgSettings::load_with_defaults().with_context(|| "Failed to load settings"),
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli.settings.as_ref())?;

    match &cli.command {
        Commands::Validate { file } => ValidateCommand::new().execute(file),

        Commands::Configure {
            file,
            backend,
            restart,
            dry_run,
        } => {
            let options = ConfigureOptions {
                backend: backend.clone(),
                restart: *restart,
                dry_run: *dry_run,
            };
            ConfigureCommand::new(settings)
                .execute(file, &options)
                .await
        }

        Commands::Restart => RestartCommand::new(&settings).execute().await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(&cli).await {
        Ok(()) => {
            if !cli.quiet {
                log::info!("Command completed successfully");
            }
            std::process::exit(0);
        }
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);

                // Print error chain if in verbose mode
                if cli.verbose || cli.debug {
                    for cause in e.chain().skip(1) {
                        eprintln!("  Caused by: {}", cause);
                    }
                }
            }
            std::process::exit(1);
        }
    }
}
