use crate::config::HealthCheckConfig;
use crate::domain::ports::{PageInspector, PageSnapshot};
use crate::utils::error::{Result, TaplistError};
use crate::utils::validation::{self, Validate};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::time::Instant;
use url::Url;

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub url: String,
    pub root_id: String,
    pub theme_class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub base_url: String,
    pub renderer: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub pages: Vec<PageReport>,
}

/// Post-deployment check: every configured page loads, shows its root
/// container and carries a theme class on `<body>`. Pages are checked in
/// order and the first failure ends the run; nothing is retried.
pub struct HealthCheck<I: PageInspector> {
    config: HealthCheckConfig,
    inspector: I,
    theme: Regex,
}

impl<I: PageInspector> HealthCheck<I> {
    pub fn new(config: HealthCheckConfig, inspector: I) -> Result<Self> {
        config.validate()?;
        let theme = validation::validate_regex("theme_pattern", &config.theme_pattern)?;

        Ok(Self {
            config,
            inspector,
            theme,
        })
    }

    pub async fn run(&self) -> Result<HealthReport> {
        let started_at = Utc::now();
        let timer = Instant::now();
        tracing::info!(
            "Starting health check against {} ({} renderer)",
            self.config.base_url,
            self.inspector.name()
        );

        let mut pages = Vec::with_capacity(self.config.pages.len());
        for url in self.config.page_urls()? {
            pages.push(self.check_page(url).await?);
        }

        let report = HealthReport {
            base_url: self.config.base_url.clone(),
            renderer: self.inspector.name().to_string(),
            started_at,
            elapsed_ms: timer.elapsed().as_millis() as u64,
            pages,
        };
        tracing::info!(
            "Health check passed for {} page(s) in {}ms",
            report.pages.len(),
            report.elapsed_ms
        );
        Ok(report)
    }

    async fn check_page(&self, url: Url) -> Result<PageReport> {
        tracing::debug!("Inspecting {}", url);
        let snapshot = self.inspector.inspect(&url, &self.config.root_id).await?;

        assert_root_visible(&snapshot, url.as_str(), &self.config.root_id)?;
        let theme_class = assert_themed(&snapshot, url.as_str(), &self.theme)?;
        tracing::info!(
            "✅ {}: #{} visible, body themed with '{}'",
            url,
            self.config.root_id,
            theme_class
        );

        Ok(PageReport {
            url: url.to_string(),
            root_id: self.config.root_id.clone(),
            theme_class,
        })
    }
}

pub fn assert_root_visible(snapshot: &PageSnapshot, url: &str, root_id: &str) -> Result<()> {
    if snapshot.root_found && snapshot.root_visible {
        return Ok(());
    }

    let reason = match (&snapshot.hidden_reason, snapshot.root_found) {
        (Some(reason), _) => reason.clone(),
        (None, false) => "element not found in the rendered DOM".to_string(),
        (None, true) => "element is not rendered".to_string(),
    };
    Err(TaplistError::RootNotVisible {
        url: url.to_string(),
        root_id: root_id.to_string(),
        reason,
    })
}

/// Returns the first body class matching `theme`.
pub fn assert_themed(snapshot: &PageSnapshot, url: &str, theme: &Regex) -> Result<String> {
    snapshot
        .body_classes
        .iter()
        .find(|class| theme.is_match(class))
        .cloned()
        .ok_or_else(|| TaplistError::ThemeMissing {
            url: url.to_string(),
            pattern: theme.as_str().to_string(),
            classes: snapshot.body_classes.join(" "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> Regex {
        Regex::new(crate::config::smoke_config::DEFAULT_THEME_PATTERN).unwrap()
    }

    fn themed(classes: &[&str]) -> PageSnapshot {
        PageSnapshot {
            root_found: true,
            root_visible: true,
            hidden_reason: None,
            body_classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_root_assertions() {
        assert!(assert_root_visible(&themed(&["dark"]), "http://t/", "root").is_ok());

        let hidden = PageSnapshot {
            root_visible: false,
            hidden_reason: Some("not rendered (computed display: none, visibility: visible)".to_string()),
            ..themed(&["dark"])
        };
        assert!(matches!(
            assert_root_visible(&hidden, "http://t/", "root"),
            Err(TaplistError::RootNotVisible { reason, .. }) if reason.contains("display: none")
        ));

        let missing = PageSnapshot::default();
        assert!(matches!(
            assert_root_visible(&missing, "http://t/", "root"),
            Err(TaplistError::RootNotVisible { reason, .. }) if reason.contains("not found")
        ));
    }

    #[test]
    fn test_theme_markers() {
        let dark = themed(&["antialiased", "dark"]);
        assert_eq!(assert_themed(&dark, "http://t/", &theme()).unwrap(), "dark");

        let bg = themed(&["bg-zinc-900", "text-zinc-100"]);
        assert_eq!(assert_themed(&bg, "http://t/", &theme()).unwrap(), "bg-zinc-900");

        let plain = themed(&["darkish", "text-white"]);
        let err = assert_themed(&plain, "http://t/", &theme()).unwrap_err();
        assert!(err.to_string().contains("darkish text-white"));

        assert!(assert_themed(&PageSnapshot::default(), "http://t/", &theme()).is_err());
    }
}
