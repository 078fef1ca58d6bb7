pub mod smoke_config;
pub mod toml_config;

pub use smoke_config::{HealthCheckConfig, RendererKind, SmokeSettings};
pub use toml_config::SmokeFileConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "taplist")]
#[command(about = "Tap inventory contract checks and deployment smoke tests")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate a tap list payload (file path or http(s) URL)
    Validate(ValidateArgs),
    /// Run the deployment health check in this process
    Check(CheckArgs),
    /// Run the health check as a child process, skipping when no browser is installed
    Smoke(CheckArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// JSON file or URL serving an array of taps
    pub source: String,

    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    #[arg(long, env = "SMOKE_BASE_URL")]
    pub base_url: Option<String>,

    /// Page path to check, repeatable (e.g. --page / --page /admin.html)
    #[arg(long = "page")]
    pub pages: Vec<String>,

    #[arg(long)]
    pub root_id: Option<String>,

    /// Regex one of the body classes must match
    #[arg(long)]
    pub theme_pattern: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum)]
    pub renderer: Option<RendererKind>,

    #[arg(long, env = "SMOKE_BROWSER")]
    pub browser: Option<PathBuf>,

    /// TOML file with a [smoke] section
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(feature = "cli")]
impl CheckArgs {
    fn to_settings(&self) -> SmokeSettings {
        SmokeSettings {
            base_url: self.base_url.clone(),
            pages: Some(self.pages.clone()),
            root_id: self.root_id.clone(),
            theme_pattern: self.theme_pattern.clone(),
            timeout_secs: self.timeout_secs,
            renderer: self.renderer,
            browser: self.browser.clone(),
        }
    }

    /// Command line and environment, then the config file, then defaults.
    pub fn resolve(&self) -> Result<HealthCheckConfig> {
        let file = match &self.config {
            Some(path) => SmokeFileConfig::from_file(path)?.into_settings(),
            None => SmokeSettings::default(),
        };
        Ok(HealthCheckConfig::from_settings(self.to_settings().or(file)))
    }
}
