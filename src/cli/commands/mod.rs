pub mod metadata;
pub mod refresh;
pub mod services;

pub use metadata::{MetadataCommands, MetadataSubcommands, TargetArgs};
pub use refresh::{RefreshArgs, TriggerArg};
pub use services::{ServicesCommands, ServicesSubcommands};
