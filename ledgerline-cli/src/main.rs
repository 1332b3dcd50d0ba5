use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ledgerline_ingest::{DocumentKind, parse_statement_bytes};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod output;
mod state;

use config::DateOrderSetting;

#[derive(Parser, Debug)]
#[command(
    name = "ledgerline",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGERLINE_BUILD_SHA"), ")"),
    about = "Extract transactions from bank-statement text"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.ledgerline/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse statement text into transactions
    Parse {
        /// Statement file; `-` or omitted reads stdin
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Override how ambiguous dates like 03/04/26 are read
        #[arg(long, value_enum)]
        date_order: Option<DateOrderSetting>,

        /// Year for rows printed without one (default: current year)
        #[arg(long)]
        year: Option<i32>,

        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file if none exists
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();

    match cli.command {
        Command::Parse {
            file,
            date_order,
            year,
            json,
        } => {
            let cfg = config::load_config_or_default(config::config_path(cli.config.as_deref()))?;
            let options = cfg.parse_options(date_order, year)?;
            debug!(?options, "parse options");

            let (bytes, kind) = read_input(file.as_deref()).await?;
            let res = parse_statement_bytes(bytes, kind, &options).context("reading statement")?;
            info!(
                transactions = res.transactions.len(),
                confidence = res.confidence,
                "parsed statement"
            );

            if json {
                println!("{}", output::render_json(&res, cfg.output.pretty, cfg.output.include_debug)?);
            } else {
                print!("{}", output::render_summary(&res, cfg.output.include_debug));
            }
        }

        Command::Config { command } => {
            let config_path = config::config_path(cli.config.as_deref())?;
            match command {
                ConfigCommand::Init => {
                    if config::init_config(&config_path)? {
                        println!("Wrote {}", config_path.display());
                    } else {
                        println!("Config already exists: {}", config_path.display());
                    }
                }
                ConfigCommand::Show => {
                    let cfg = config::load_config(&config_path)?;
                    println!("# {}\n", config_path.display());
                    println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                }
            }
        }
    }

    Ok(())
}

async fn read_input(file: Option<&Path>) -> Result<(Vec<u8>, DocumentKind)> {
    match file {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                bail!("Statement not found: {} (pass --file <path>)", path.display());
            }
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("read {}", path.display()))?;
            Ok((bytes, DocumentKind::from_path(path)))
        }
        _ => {
            let mut bytes = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut bytes)
                .await
                .context("read stdin")?;
            Ok((bytes, DocumentKind::Text))
        }
    }
}
