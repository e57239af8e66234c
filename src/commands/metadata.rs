use crate::cli::commands::TargetArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use odata_metadata_sync::config::Config;
use odata_metadata_sync::metadata::{fingerprint_document, fingerprint_schema};
use odata_metadata_sync::{
    Coordinates, Credentials, MetadataClient, analyze_bytes, detect_version, parse_metadata,
};
use std::fs;
use std::path::{Path, PathBuf};

fn resolve_target(config: &Config, target: &TargetArgs) -> Result<Coordinates> {
    if let Some(name) = &target.service {
        return config.service_coordinates(name);
    }
    match (&target.base_url, &target.service_name, &target.url) {
        (Some(base_url), Some(service_name), _) => {
            Ok(Coordinates::service(base_url.clone(), service_name.clone()))
        }
        (_, _, Some(url)) => Ok(Coordinates::url(url.clone())),
        _ => anyhow::bail!("Specify --service, --base-url with --service-name, or --url"),
    }
}

pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read metadata file: {:?}", path))
}

/// Fetch a $metadata document and print or save it
pub async fn fetch_command(target: TargetArgs, output: Option<PathBuf>, normalized: bool) -> Result<()> {
    let config = Config::load()?;
    let coordinates = resolve_target(&config, &target)?;

    let credentials = Credentials::from_env();
    if credentials.is_none() {
        info!("No credentials in environment, fetching unauthenticated");
    }

    let client = MetadataClient::new(&config.fetch, credentials)
        .context("Failed to build HTTP client")?;
    let raw = client.fetch_metadata(&coordinates).await?;

    // Raw documents are written byte for byte so stored fingerprints stay valid
    let rendered = if normalized {
        let snapshot = analyze_bytes(&raw.bytes)?;
        serde_json::to_string_pretty(&snapshot.schema)?.into_bytes()
    } else {
        raw.bytes
    };

    match output {
        Some(path) => {
            fs::write(&path, &rendered)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            println!("{} Saved metadata from {} to {:?}", "✓".green(), raw.url, path);
        }
        None => println!("{}", String::from_utf8_lossy(&rendered)),
    }

    Ok(())
}

pub fn parse_command(path: &Path, pretty: bool) -> Result<()> {
    let raw = read_document(path)?;
    let schema = parse_metadata(&raw)?;

    let json = if pretty {
        serde_json::to_string_pretty(&schema)?
    } else {
        serde_json::to_string(&schema)?
    };
    println!("{}", json);
    Ok(())
}

pub fn version_command(path: &Path) -> Result<()> {
    let raw = read_document(path)?;
    println!("{}", detect_version(&raw));
    Ok(())
}

pub fn fingerprint_command(path: &Path, normalized: bool) -> Result<()> {
    let raw = read_document(path)?;

    let fingerprint = if normalized {
        let schema = parse_metadata(&raw)?;
        fingerprint_schema(&schema).context("Failed to serialize normalized schema")?
    } else {
        fingerprint_document(&raw)
    };
    println!("{}", fingerprint);
    Ok(())
}
