//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "handoff";
const DEFAULT_PRODUCT_NAME: &str = "Handoff";
const DEFAULT_STORAGE_DIR: &str = ".handoff";
const DEFAULT_EXPORT_DIR: &str = ".";
const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1_000;

/// Command-line arguments for the Handoff binary.
#[derive(Debug, Parser)]
#[command(name = "handoff", version, about = "Letter-of-instruction builder")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "HANDOFF_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the directory holding the saved interview session.
    #[arg(long = "storage-dir", env = "HANDOFF_STORAGE_DIR", value_name = "PATH", global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Override the directory exported artifacts are written to.
    #[arg(long = "export-dir", value_name = "PATH", global = true)]
    pub export_dir: Option<PathBuf>,

    /// Override the product name used in document chrome and file names.
    #[arg(long = "product-name", value_name = "NAME", global = true)]
    pub product_name: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compile the saved interview into downloadable artifacts.
    Export(ExportArgs),
    /// Import an interview snapshot from a JSON file.
    Import(ImportArgs),
    /// Show per-section completion for the saved interview.
    Status,
    /// Load the canned demo interview into the saved session.
    Demo,
    /// Clear the saved interview session.
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Text,
    Pdf,
    Both,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Which artifact(s) to produce.
    #[arg(long, value_enum, default_value = "both")]
    pub format: FormatArg,

    /// Print the text artifact to stdout instead of writing files.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub stdout: bool,

    /// Compile the canned demo interview instead of the saved session.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub demo: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    /// Path to the JSON snapshot to import.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub product: ProductSettings,
    pub storage: StorageSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ProductSettings {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub directory: PathBuf,
    pub autosave_debounce: Duration,
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub directory: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse the CLI and load settings in one step.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("HANDOFF").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    product: RawProductSettings,
    storage: RawStorageSettings,
    export: RawExportSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawProductSettings {
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStorageSettings {
    directory: Option<PathBuf>,
    autosave_debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawExportSettings {
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(directory) = overrides.storage_dir.as_ref() {
            self.storage.directory = Some(directory.clone());
        }
        if let Some(directory) = overrides.export_dir.as_ref() {
            self.export.directory = Some(directory.clone());
        }
        if let Some(name) = overrides.product_name.as_ref() {
            self.product.name = Some(name.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            product,
            storage,
            export,
            logging,
        } = raw;

        let name = product
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());

        let directory = storage
            .directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
        let debounce_ms = storage
            .autosave_debounce_ms
            .unwrap_or(DEFAULT_AUTOSAVE_DEBOUNCE_MS);
        if debounce_ms == 0 {
            return Err(LoadError::invalid(
                "storage.autosave_debounce_ms",
                "must be greater than zero",
            ));
        }

        let export_directory = export
            .directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));

        let level = match logging.level {
            Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
                LoadError::invalid("logging.level", format!("failed to parse: {err}"))
            })?,
            None => LevelFilter::INFO,
        };
        let format = if logging.json.unwrap_or(false) {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };

        Ok(Self {
            product: ProductSettings { name },
            storage: StorageSettings {
                directory,
                autosave_debounce: Duration::from_millis(debounce_ms),
            },
            export: ExportSettings {
                directory: export_directory,
            },
            logging: LoggingSettings { level, format },
        })
    }
}

#[cfg(test)]
mod tests;
