use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod commands;

use cli::Cli;
use cli::Commands;
use cli::commands::{MetadataSubcommands, ServicesSubcommands};
use odata_metadata_sync::config::ServiceEntry;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("odata-metadata-sync.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    // Credentials may live in a local .env file
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {:?}", path);
    }

    let cli = Cli::parse();
    info!("Starting odata-metadata-sync");

    match cli.command {
        Commands::Metadata(metadata) => match metadata.command {
            MetadataSubcommands::Fetch {
                target,
                output,
                normalized,
            } => commands::metadata::fetch_command(target, output, normalized).await,
            MetadataSubcommands::Parse { path, pretty } => {
                commands::metadata::parse_command(&path, pretty)
            }
            MetadataSubcommands::Version { path } => commands::metadata::version_command(&path),
            MetadataSubcommands::Fingerprint { path, normalized } => {
                commands::metadata::fingerprint_command(&path, normalized)
            }
        },
        Commands::Refresh(args) => commands::refresh::refresh_command(args).await,
        Commands::Services(services) => match services.command {
            ServicesSubcommands::List => commands::services::list_command(),
            ServicesSubcommands::Add {
                name,
                base_url,
                service_name,
                url,
            } => commands::services::add_command(
                name,
                ServiceEntry {
                    base_url,
                    service_name,
                    url,
                },
            ),
            ServicesSubcommands::Remove { name } => commands::services::remove_command(&name),
        },
    }
}
