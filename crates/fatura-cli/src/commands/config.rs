//! Config command - inspect and edit the fatura configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use fatura_core::models::config::FaturaConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,

    /// Write a configuration file with default values
    Init {
        /// Where to write the file (default: the user config directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, e.g. "extraction.supplier_max_chars"
    Get { key: String },

    /// Change one value and save the config file
    Set { key: String, value: String },

    /// Print where the config file lives
    Path,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let path = default_config_path();

    match args.action {
        ConfigAction::Show => {
            if !path.exists() {
                eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&load_config(None)?)?);
        }
        ConfigAction::Init { output, force } => {
            let target = output.unwrap_or(path);
            if target.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    target.display()
                );
            }
            write_config(&target, &FaturaConfig::default())?;
            println!(
                "{} Created configuration file at {}",
                style("✓").green(),
                target.display()
            );
        }
        ConfigAction::Get { key } => {
            let json = serde_json::to_value(load_config(None)?)?;
            println!("{}", serde_json::to_string_pretty(lookup_key(&json, &key)?)?);
        }
        ConfigAction::Set { key, value } => {
            let (config, value) = apply_setting(load_config(None)?, &key, &value)?;
            write_config(&path, &config)?;
            println!("{} {} = {}", style("✓").green(), key, value);
        }
        ConfigAction::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!("\nRun 'fatura config init' to create one.");
            }
        }
    }

    Ok(())
}

/// Load the configuration used by extraction commands.
///
/// An explicit `--config` path must exist. Without one, the default config
/// file is used when present, otherwise built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<FaturaConfig> {
    if let Some(path) = path {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(FaturaConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(FaturaConfig::from_file(&default_path)?)
    } else {
        Ok(FaturaConfig::default())
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fatura")
        .join("config.json")
}

fn write_config(path: &Path, config: &FaturaConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}

/// Replace one leaf value, returning the new config and the value as stored.
///
/// The value is parsed as JSON first; anything that is not valid JSON is
/// taken as a bare string.
fn apply_setting(config: FaturaConfig, key: &str, raw: &str) -> anyhow::Result<(FaturaConfig, Value)> {
    let value: Value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let mut json = serde_json::to_value(config)?;
    let slot = json
        .pointer_mut(&json_pointer(key))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    if slot.is_object() {
        anyhow::bail!("{} is a section; set one of its keys instead", key);
    }
    *slot = value.clone();

    let config: FaturaConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    config.validate()?;

    Ok((config, value))
}

/// `extraction.supplier_max_chars` -> `/extraction/supplier_max_chars`
fn json_pointer(key: &str) -> String {
    format!("/{}", key.replace('.', "/"))
}

fn lookup_key<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    json.pointer(&json_pointer(key))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
}
