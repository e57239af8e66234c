use super::commands::{MetadataCommands, RefreshArgs, ServicesCommands};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "odata-metadata-sync")]
#[command(about = "Fetch, normalize and fingerprint OData service metadata")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and inspect metadata documents
    Metadata(MetadataCommands),
    /// Refresh a service descriptor file in place
    Refresh(RefreshArgs),
    /// Manage services registered in the config file
    Services(ServicesCommands),
}
