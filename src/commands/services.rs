use anyhow::Result;
use log::info;
use odata_metadata_sync::config::{Config, ServiceEntry};

pub fn list_command() -> Result<()> {
    let config = Config::load()?;

    if config.services.is_empty() {
        println!("No services configured.");
        return Ok(());
    }

    println!("{:<20} -> Metadata URL", "Service");
    println!("{}", "-".repeat(60));

    for (name, entry) in &config.services {
        let url = entry
            .coordinates()
            .map(|c| c.metadata_url().unwrap_or_else(|e| format!("<{}>", e)))
            .unwrap_or_else(|| "<incomplete>".to_string());
        println!("{:<20} -> {}", name, url);
    }

    println!("\nTotal services: {}", config.services.len());
    Ok(())
}

pub fn add_command(name: String, entry: ServiceEntry) -> Result<()> {
    if entry.coordinates().is_none() {
        anyhow::bail!("Service '{}' needs either --base-url with --service-name, or --url", name);
    }

    let path = Config::get_config_path()?;
    let mut config = Config::load_from(&path)?;

    info!("Adding service: {}", name);
    config.services.insert(name.clone(), entry);
    config.save_to(&path)?;

    println!("Added service '{}'", name);
    Ok(())
}

pub fn remove_command(name: &str) -> Result<()> {
    let path = Config::get_config_path()?;
    let mut config = Config::load_from(&path)?;

    if config.services.remove(name).is_none() {
        anyhow::bail!("Service '{}' not found", name);
    }

    info!("Removed service: {}", name);
    config.save_to(&path)?;

    println!("Removed service '{}'", name);
    Ok(())
}
