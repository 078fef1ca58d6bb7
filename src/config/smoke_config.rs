use crate::utils::error::{Result, TaplistError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4173";
pub const DEFAULT_ROOT_ID: &str = "root";
pub const DEFAULT_THEME_PATTERN: &str = "^(dark|bg-.+)$";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chromium/Chrome, scripts executed
    #[default]
    Browser,
    /// The served HTML as-is, no scripts
    Static,
}

impl RendererKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Browser => "browser",
            RendererKind::Static => "static",
        }
    }
}

/// Partial settings from one source (command line or config file).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmokeSettings {
    pub base_url: Option<String>,
    pub pages: Option<Vec<String>>,
    pub root_id: Option<String>,
    pub theme_pattern: Option<String>,
    pub timeout_secs: Option<u64>,
    pub renderer: Option<RendererKind>,
    pub browser: Option<PathBuf>,
}

impl SmokeSettings {
    /// Fields set on `self` win over `fallback`.
    pub fn or(self, fallback: SmokeSettings) -> SmokeSettings {
        SmokeSettings {
            base_url: self.base_url.or(fallback.base_url),
            pages: self.pages.filter(|p| !p.is_empty()).or(fallback.pages),
            root_id: self.root_id.or(fallback.root_id),
            theme_pattern: self.theme_pattern.or(fallback.theme_pattern),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            renderer: self.renderer.or(fallback.renderer),
            browser: self.browser.or(fallback.browser),
        }
    }
}

/// Fully resolved health check settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheckConfig {
    pub base_url: String,
    pub pages: Vec<String>,
    pub root_id: String,
    pub theme_pattern: String,
    pub timeout_secs: u64,
    pub renderer: RendererKind,
    pub browser: Option<PathBuf>,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self::from_settings(SmokeSettings::default())
    }
}

impl HealthCheckConfig {
    pub fn from_settings(settings: SmokeSettings) -> Self {
        Self {
            base_url: settings
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            pages: settings
                .pages
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| vec!["/".to_string()]),
            root_id: settings
                .root_id
                .unwrap_or_else(|| DEFAULT_ROOT_ID.to_string()),
            theme_pattern: settings
                .theme_pattern
                .unwrap_or_else(|| DEFAULT_THEME_PATTERN.to_string()),
            timeout_secs: settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            renderer: settings.renderer.unwrap_or_default(),
            browser: settings.browser,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL of every configured page, in order.
    pub fn page_urls(&self) -> Result<Vec<Url>> {
        let mut base = validation::validate_url("base_url", &self.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        self.pages
            .iter()
            .map(|page| {
                base.join(page.trim_start_matches('/'))
                    .map_err(|e| TaplistError::InvalidConfigValueError {
                        field: "pages".to_string(),
                        value: page.clone(),
                        reason: format!("Cannot join with base URL: {}", e),
                    })
            })
            .collect()
    }

    /// Arguments that reproduce this configuration for `taplist check`.
    /// Values are joined with `=` so a value starting with `-` is not read
    /// as a flag.
    pub fn to_check_args(&self) -> Vec<String> {
        let mut args = vec![
            "check".to_string(),
            format!("--base-url={}", self.base_url),
            format!("--root-id={}", self.root_id),
            format!("--theme-pattern={}", self.theme_pattern),
            format!("--timeout-secs={}", self.timeout_secs),
            format!("--renderer={}", self.renderer.as_str()),
        ];
        for page in &self.pages {
            args.push(format!("--page={}", page));
        }
        if let Some(browser) = &self.browser {
            args.push(format!("--browser={}", browser.display()));
        }
        args
    }
}

impl Validate for HealthCheckConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        for page in &self.pages {
            validation::validate_page_path("pages", page)?;
        }
        validation::validate_non_empty_string("root_id", &self.root_id)?;
        if self.root_id.chars().any(char::is_whitespace) {
            return Err(TaplistError::InvalidConfigValueError {
                field: "root_id".to_string(),
                value: self.root_id.clone(),
                reason: "Element ids cannot contain whitespace".to_string(),
            });
        }
        validation::validate_regex("theme_pattern", &self.theme_pattern)?;
        validation::validate_positive_number("timeout_secs", self.timeout_secs, 1)?;
        Ok(())
    }
}
