use crate::core::dom;
use crate::domain::ports::{PageInspector, PageSnapshot};
use crate::utils::error::{Result, TaplistError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{EventDomContentEventFired, NavigateParams};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Fetches the served HTML and reads it without running scripts.
#[derive(Debug, Clone)]
pub struct StaticInspector {
    client: reqwest::Client,
    timeout: Duration,
}

impl StaticInspector {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// Waits for the HTML document only, not for its subresources.
    async fn load(&self, url: &Url) -> Result<String> {
        let navigation_error = |e: reqwest::Error| {
            if e.is_timeout() {
                TaplistError::Timeout {
                    operation: format!("loading {}", url),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                TaplistError::NavigationFailed {
                    url: url.to_string(),
                    message: error_chain(&e),
                }
            }
        };

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/html")
            .send()
            .await
            .map_err(navigation_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaplistError::NavigationFailed {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response.text().await.map_err(navigation_error)
    }
}

#[async_trait]
impl PageInspector for StaticInspector {
    async fn inspect(&self, url: &Url, root_id: &str) -> Result<PageSnapshot> {
        let document = self.load(url).await?;
        Ok(dom::snapshot(&document, root_id))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(100);

const NAVIGATION_STATUS_SCRIPT: &str = r#"(function(){
    const entry = performance.getEntriesByType("navigation")[0];
    return entry && typeof entry.responseStatus === "number" ? entry.responseStatus : 0;
})()"#;

// __ROOT_ID__ is replaced with a JSON string literal.
const SNAPSHOT_SCRIPT: &str = r#"(function(){
    const rootId = __ROOT_ID__;
    const bodyClasses = document.body ? Array.from(document.body.classList) : [];
    const root = document.getElementById(rootId);
    if (!root) {
        return JSON.stringify({ rootFound: false, rootVisible: false,
            hiddenReason: "element not found in the rendered DOM", bodyClasses });
    }
    const style = getComputedStyle(root);
    const rendered = typeof root.checkVisibility === "function"
        ? root.checkVisibility({ visibilityProperty: true })
        : style.display !== "none" && style.visibility !== "hidden";
    let hiddenReason = null;
    if (!rendered) {
        hiddenReason = "not rendered (computed display: " + style.display
            + ", visibility: " + style.visibility + ")";
    } else if (root.getClientRects().length === 0) {
        hiddenReason = "element has no layout box";
    } else {
        const box = root.getBoundingClientRect();
        if (box.width === 0 || box.height === 0) {
            hiddenReason = "element has an empty bounding box, nothing was mounted into it";
        }
    }
    return JSON.stringify({ rootFound: true, rootVisible: hiddenReason === null,
        hiddenReason, bodyClasses });
})()"#;

static PROFILE_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Drives headless Chromium/Chrome over CDP. Each inspection launches a
/// fresh browser with its own profile directory and closes it afterwards.
///
/// The page counts as loaded at `DOMContentLoaded`; after that the root
/// is polled until it becomes visible or the timeout runs out, so a
/// bundle that mounts asynchronously still passes.
#[derive(Debug, Clone)]
pub struct HeadlessBrowserInspector {
    binary: PathBuf,
    timeout: Duration,
}

impl HeadlessBrowserInspector {
    pub fn new(binary: PathBuf, timeout: Duration) -> Self {
        Self { binary, timeout }
    }

    async fn navigate(&self, page: &Page, url: &Url) -> Result<()> {
        let mut dom_ready = page.event_listener::<EventDomContentEventFired>().await?;
        let navigation = page.execute(NavigateParams::new(url.as_str())).await?;
        if let Some(error) = navigation.result.error_text.clone() {
            return Err(TaplistError::NavigationFailed {
                url: url.to_string(),
                message: error,
            });
        }
        dom_ready.next().await;
        tracing::debug!("DOMContentLoaded on {}", url);

        let status: i64 = page
            .evaluate(NAVIGATION_STATUS_SCRIPT)
            .await?
            .into_value()
            .map_err(|e| TaplistError::BrowserError {
                message: format!("unreadable navigation status: {}", e),
            })?;
        if status != 0 && !(200..300).contains(&status) {
            return Err(TaplistError::NavigationFailed {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }
        Ok(())
    }

    async fn snapshot(&self, page: &Page, script: &str) -> Result<PageSnapshot> {
        let json: String = page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| TaplistError::BrowserError {
                message: format!("page snapshot was not a string: {}", e),
            })?;
        serde_json::from_str(&json).map_err(|e| TaplistError::BrowserError {
            message: format!("unreadable page snapshot: {}", e),
        })
    }

    async fn inspect_page(&self, browser: &Browser, url: &Url, root_id: &str) -> Result<PageSnapshot> {
        let deadline = Instant::now() + self.timeout;
        let page = browser.new_page("about:blank").await?;

        tokio::time::timeout_at(deadline, self.navigate(&page, url))
            .await
            .map_err(|_| TaplistError::Timeout {
                operation: format!("waiting for DOMContentLoaded on {}", url),
                seconds: self.timeout.as_secs(),
            })??;

        let root_literal = serde_json::to_string(root_id).map_err(|e| TaplistError::BrowserError {
            message: format!("cannot quote root id: {}", e),
        })?;
        let script = SNAPSHOT_SCRIPT.replace("__ROOT_ID__", &root_literal);

        loop {
            let snapshot = self.snapshot(&page, &script).await?;
            if snapshot.root_visible || Instant::now() + POLL_INTERVAL >= deadline {
                return Ok(snapshot);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageInspector for HeadlessBrowserInspector {
    async fn inspect(&self, url: &Url, root_id: &str) -> Result<PageSnapshot> {
        let profile = std::env::temp_dir().join(format!(
            "taplist-browser-{}-{}",
            std::process::id(),
            PROFILE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        let config = BrowserConfig::builder()
            .chrome_executable(&self.binary)
            .no_sandbox()
            .user_data_dir(&profile)
            .request_timeout(self.timeout)
            .arg("--disable-gpu")
            .build()
            .map_err(|message| TaplistError::BrowserError { message })?;

        tracing::debug!("Launching {} for {}", self.binary.display(), url);
        let (mut browser, mut handler) = Browser::launch(config).await?;
        let events = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let result = self.inspect_page(&browser, url, root_id).await;

        if let Err(e) = browser.close().await {
            tracing::debug!("Closing the browser failed: {}", e);
        }
        let _ = browser.wait().await;
        events.abort();
        let _ = tokio::fs::remove_dir_all(&profile).await;

        result
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
