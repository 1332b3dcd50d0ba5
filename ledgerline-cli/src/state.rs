use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn ledgerline_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ledgerline"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(ledgerline_home()?.join("config.toml"))
}
