use std::path::PathBuf;

use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use engine::{ExportFormat, Letterhead, Period};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/bendahara.toml";
const ENV_PREFIX: &str = "BENDAHARA";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Bearer token of the ledger service.
    pub token: Option<String>,
    pub timezone: String,
    pub page_size: u32,
    pub output_dir: PathBuf,
    pub log_level: String,
    /// Field delimiter of the CSV artifact, a single ASCII character.
    pub csv_delimiter: char,
    pub letterhead: Letterhead,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            token: None,
            timezone: "Asia/Jakarta".to_string(),
            page_size: 100,
            output_dir: PathBuf::from("exports"),
            log_level: "info".to_string(),
            csv_delimiter: ',',
            letterhead: Letterhead::default(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::InvalidConfig(format!("timezone: {err}")))
    }

    pub fn delimiter(&self) -> Result<u8> {
        match u8::try_from(self.csv_delimiter) {
            Ok(byte) if byte.is_ascii() && !matches!(byte, b'"' | b'\r' | b'\n') => Ok(byte),
            _ => Err(AppError::InvalidConfig(format!(
                "csv_delimiter: {:?} is not usable",
                self.csv_delimiter
            ))),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bendahara", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override the ledger base URL (e.g. http://127.0.0.1:3000).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long, global = true)]
    timezone: Option<String>,
    /// Override the log level.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the selectable reporting periods.
    Periods,
    /// Print the summary of a period.
    Summary {
        /// `all` or a period key such as `2025-06`.
        #[arg(long, default_value = "all")]
        period: Period,
        /// Also print income and expense per month.
        #[arg(long)]
        monthly: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Write report artifacts for a period.
    Export {
        #[arg(long, default_value = "all")]
        period: Period,
        #[arg(long, value_enum, default_value_t = FormatArg::All)]
        format: FormatArg,
        /// Output directory, overrides `output_dir`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    All,
    Workbook,
    Csv,
    Document,
}

impl FormatArg {
    #[must_use]
    pub fn formats(self) -> Vec<ExportFormat> {
        match self {
            Self::All => ExportFormat::ALL.to_vec(),
            Self::Workbook => vec![ExportFormat::Workbook],
            Self::Csv => vec![ExportFormat::DelimitedText],
            Self::Document => vec![ExportFormat::Document],
        }
    }
}

/// Parses the command line and layers file, environment and CLI overrides.
pub fn load() -> Result<(AppConfig, Command)> {
    resolve(Args::parse())
}

pub fn resolve(args: Args) -> Result<(AppConfig, Command)> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    );
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if settings.page_size == 0 {
        return Err(AppError::InvalidConfig(
            "page_size must be greater than zero".to_string(),
        ));
    }
    settings.delimiter()?;

    Ok((settings, args.command))
}
