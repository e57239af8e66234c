use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct MetadataCommands {
    #[command(subcommand)]
    pub command: MetadataSubcommands,
}

/// Where to fetch from: a configured service, a base URL + service name pair, or a URL
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Name of a service registered in the config file
    #[arg(long, conflicts_with_all = ["base_url", "url"])]
    pub service: Option<String>,
    /// Base URL of the OData gateway
    #[arg(long, requires = "service_name", conflicts_with = "url")]
    pub base_url: Option<String>,
    /// Service path below the base URL
    #[arg(long, requires = "base_url")]
    pub service_name: Option<String>,
    /// Service root or full $metadata URL
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum MetadataSubcommands {
    /// Download a $metadata document
    Fetch {
        #[command(flatten)]
        target: TargetArgs,
        /// Write the document to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the normalized schema instead of the raw document
        #[arg(long)]
        normalized: bool,
    },
    /// Print the normalized schema of a local EDMX file as JSON
    Parse {
        /// Path to the EDMX document
        path: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Detect the OData version of a local EDMX file
    Version {
        /// Path to the EDMX document
        path: PathBuf,
    },
    /// Print the content fingerprint of a local EDMX file
    Fingerprint {
        /// Path to the EDMX document
        path: PathBuf,
        /// Hash the normalized schema instead of the raw bytes
        #[arg(long)]
        normalized: bool,
    },
}
