use clap::{Args, ValueEnum};
use odata_metadata_sync::RefreshTrigger;
use std::path::PathBuf;

#[derive(Args)]
pub struct RefreshArgs {
    /// JSON file holding the service descriptor
    pub descriptor: PathBuf,
    /// Event to evaluate the descriptor for
    #[arg(short, long, value_enum, default_value = "update")]
    pub trigger: TriggerArg,
    /// Only print what would happen
    #[arg(long)]
    pub dry_run: bool,
    /// Write the updated descriptor here instead of overwriting the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TriggerArg {
    Create,
    Update,
    Read,
}

impl From<TriggerArg> for RefreshTrigger {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::Create => RefreshTrigger::Create,
            TriggerArg::Update => RefreshTrigger::Update,
            TriggerArg::Read => RefreshTrigger::Read,
        }
    }
}
