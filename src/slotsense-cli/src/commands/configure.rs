//! Configuration command handlers
//!
//! Handles the `configure` subcommand for viewing and creating the config file.

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Handle the configure command
///
/// # Arguments
/// * `path` - Config file location (explicit or default)
/// * `show` - If true, show current configuration
/// * `init` - If true, write defaults unless the file already exists
pub fn handle(path: &Path, show: bool, init: bool) -> Result<()> {
    if init {
        init_config(path)?;
    }

    if show {
        let config = Config::load_from(path)?;
        show_config(&config, path)?;
    } else if !init {
        show_usage();
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config, path: &Path) -> Result<()> {
    let text = config
        .engine
        .to_toml_string()
        .context("Failed to serialize config")?;
    print!("{}", text);
    println!();
    if path.exists() {
        println!("Config file: {}", path.display());
    } else {
        println!("Config file: {} (not created, using defaults)", path.display());
    }
    Ok(())
}

/// Write the default configuration; returns whether a file was written
fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(false);
    }
    Config::default().save_to(path)?;
    println!("Config saved to: {}", path.display());
    Ok(true)
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: slotsense configure --show");
    println!("   or: slotsense configure --init");
    println!();
    println!("Use --config PATH (or SLOTSENSE_CONFIG) to work with another file.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_show_usage_does_not_panic() {
        show_usage();
    }

    #[test]
    fn test_init_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slotsense").join("config.toml");
        assert!(init_config(&path).unwrap());
        assert!(path.exists());

        fs::write(&path, "[mirror]\nenabled = false\n").unwrap();
        assert!(!init_config(&path).unwrap());
        let config = Config::load_from(&path).unwrap();
        assert!(!config.engine.mirror.enabled);
    }

    #[test]
    fn test_handle_show_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(handle(&path, true, false).is_ok());
        assert!(!path.exists());
    }

    #[test]
    fn test_config_path_exists() {
        assert!(Config::config_path().is_ok());
    }
}
