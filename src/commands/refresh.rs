use crate::cli::commands::RefreshArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use odata_metadata_sync::config::Config;
use odata_metadata_sync::{
    Credentials, MetadataClient, RefreshAction, RefreshTrigger, Refresher, ServiceDescriptor,
};
use std::fs;
use std::path::Path;

fn load_descriptor(path: &Path) -> Result<ServiceDescriptor> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor file: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse descriptor file: {:?}", path))
}

fn save_descriptor(path: &Path, descriptor: &ServiceDescriptor) -> Result<()> {
    let content = serde_json::to_string_pretty(descriptor)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write descriptor file: {:?}", path))
}

/// Refresh a descriptor file. On failure the file is left as it was.
pub async fn refresh_command(args: RefreshArgs) -> Result<()> {
    let descriptor = load_descriptor(&args.descriptor)?;
    let trigger: RefreshTrigger = args.trigger.into();

    let config = Config::load()?;
    let client = MetadataClient::new(&config.fetch, Credentials::from_env())
        .context("Failed to build HTTP client")?;
    let refresher = Refresher::new(client);

    let action = refresher.plan(&descriptor, trigger);
    info!("Refresh plan for {:?}: {}", args.descriptor, action);

    if args.dry_run {
        match &action {
            RefreshAction::Fetch(coordinates) => println!("Would fetch metadata from {}", coordinates),
            RefreshAction::Rederive => println!("Would re-derive version and fingerprint from stored document"),
            RefreshAction::Noop => println!("Nothing to refresh"),
        }
        return Ok(());
    }

    let outcome = match refresher.refresh(&descriptor, trigger).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} Refresh failed: {}", "✗".bright_red().bold(), e.to_string().red());
            return Err(e.into());
        }
    };

    let target = args.output.as_deref().unwrap_or(&args.descriptor);
    save_descriptor(target, &outcome.descriptor)?;

    let updated = &outcome.descriptor;
    println!("{} {} ({})", "✓".green(), "Refresh complete".bold(), outcome.action);
    if let Some(version) = updated.version {
        println!("  Version:     {}", version);
    }
    if let Some(fingerprint) = &updated.fingerprint {
        println!("  Fingerprint: {}", fingerprint);
    }
    if let Some(schema) = &updated.schema {
        println!(
            "  Entities:    {} ({} entity sets)",
            schema.entities.len(),
            schema.entity_sets.len()
        );
    }
    if outcome.changed {
        println!("  {}", "Metadata changed since last refresh".yellow());
    }

    Ok(())
}
