use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use clap::ValueEnum;
use ledgerline_ingest::{DateOrder, ParseOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::state::default_config_path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserSection {
    /// How ambiguous numeric dates are read ("auto" votes per statement)
    #[serde(default)]
    pub date_order: DateOrderSetting,
    /// IANA timezone used to decide the current year for year-less dates
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_true")]
    pub pretty: bool,
    #[serde(default = "default_true")]
    pub include_debug: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrderSetting {
    #[default]
    Auto,
    DayFirst,
    MonthFirst,
}

impl DateOrderSetting {
    /// `None` leaves detection to the parser.
    pub fn pinned(self) -> Option<DateOrder> {
        match self {
            DateOrderSetting::Auto => None,
            DateOrderSetting::DayFirst => Some(DateOrder::DayFirst),
            DateOrderSetting::MonthFirst => Some(DateOrder::MonthFirst),
        }
    }
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            date_order: DateOrderSetting::Auto,
            timezone: default_timezone(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            pretty: true,
            include_debug: true,
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        let tz = &self.parser.timezone;
        tz.parse().map_err(|_| anyhow!("invalid timezone: {tz}"))
    }

    /// Current year in the configured timezone.
    pub fn reference_year(&self) -> Result<i32> {
        Ok(Utc::now().with_timezone(&self.timezone()?).year())
    }

    /// Parser options; command-line values win over the file.
    pub fn parse_options(&self, date_order: Option<DateOrderSetting>, year: Option<i32>) -> Result<ParseOptions> {
        let mut options = ParseOptions::default();
        if let Some(order) = date_order.unwrap_or(self.parser.date_order).pinned() {
            options = options.with_date_order(order);
        }
        let year = match year {
            Some(y) => y,
            None => self.reference_year()?,
        };
        Ok(options.with_reference_year(year))
    }
}

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Load the config at `path`, or defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    cfg.timezone()?;
    Ok(cfg)
}

/// Config for commands that only read it: when no path can be resolved
/// (no `--config` and no home directory) the defaults apply.
pub fn load_config_or_default(path: Result<PathBuf>) -> Result<Config> {
    match path {
        Ok(path) => load_config(&path),
        Err(err) => {
            debug!(error = %err, "no config location, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the default config unless one exists. Returns whether it wrote.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.parser.date_order, DateOrderSetting::Auto);
    }

    #[test]
    fn test_unresolved_location_gives_defaults() {
        let cfg = load_config_or_default(Err(anyhow!("HOME is not set"))).unwrap();
        assert_eq!(cfg, Config::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\npretty = false\n").unwrap();
        let cfg = load_config_or_default(Ok(path)).unwrap();
        assert!(!cfg.output.pretty);
    }

    #[test]
    fn test_init_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(init_config(&path).unwrap());
        assert!(!init_config(&path).unwrap());
        assert_eq!(load_config(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parser]\ndate_order = \"month-first\"\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.parser.date_order, DateOrderSetting::MonthFirst);
        assert_eq!(cfg.parser.timezone, "America/Chicago");
        assert!(cfg.output.pretty);
    }

    #[test]
    fn test_bad_timezone_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parser]\ntimezone = \"Mars/Olympus\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_cli_values_win() {
        let mut cfg = Config::default();
        cfg.parser.date_order = DateOrderSetting::MonthFirst;

        let options = cfg.parse_options(None, Some(2020)).unwrap();
        assert_eq!(options.date_order, Some(DateOrder::MonthFirst));
        assert_eq!(options.reference_year, Some(2020));

        let options = cfg.parse_options(Some(DateOrderSetting::Auto), Some(2020)).unwrap();
        assert_eq!(options.date_order, None);
    }

    #[test]
    fn test_reference_year_follows_timezone() {
        let mut cfg = Config::default();
        cfg.parser.timezone = "Pacific/Kiritimati".to_string();
        let year = cfg.reference_year().unwrap();
        assert!((2020..2200).contains(&year));
    }
}
