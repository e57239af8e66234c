use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ServicesCommands {
    #[command(subcommand)]
    pub command: ServicesSubcommands,
}

#[derive(Subcommand)]
pub enum ServicesSubcommands {
    /// List registered services
    List,
    /// Register a service
    Add {
        /// Name to refer to the service by
        name: String,
        /// Base URL of the OData gateway
        #[arg(long, requires = "service_name", conflicts_with = "url")]
        base_url: Option<String>,
        /// Service path below the base URL
        #[arg(long, requires = "base_url")]
        service_name: Option<String>,
        /// Service root or full $metadata URL
        #[arg(long, required_unless_present = "base_url")]
        url: Option<String>,
    },
    /// Remove a registered service
    Remove {
        /// Service name to remove
        name: String,
    },
}
