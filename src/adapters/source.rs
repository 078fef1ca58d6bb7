use crate::domain::model::TapList;
use crate::utils::error::{Result, TaplistError};
use crate::utils::validation;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where a tap list payload is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySource {
    File(PathBuf),
    Http(Url),
}

impl InventorySource {
    /// `http://` and `https://` arguments are fetched, anything else is a file path.
    pub fn parse(source: &str) -> Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            Ok(InventorySource::Http(validation::validate_url("source", source)?))
        } else {
            validation::validate_non_empty_string("source", source)?;
            Ok(InventorySource::File(PathBuf::from(source)))
        }
    }

    pub async fn read(&self, timeout: Duration) -> Result<String> {
        match self {
            InventorySource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            InventorySource::Http(url) => {
                let client = reqwest::Client::builder().timeout(timeout).build()?;
                let response = client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?
                    .error_for_status()?;
                Ok(response.text().await?)
            }
        }
    }

    /// Reads the payload and deserializes it without running contract checks,
    /// so callers can audit every violation at once.
    pub async fn load(&self, timeout: Duration) -> Result<TapList> {
        let body = self.read(timeout).await?;
        tracing::debug!("Read {} bytes from {}", body.len(), self);
        serde_json::from_str(&body).map_err(TaplistError::MalformedPayload)
    }
}

impl std::fmt::Display for InventorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventorySource::File(path) => write!(f, "{}", path.display()),
            InventorySource::Http(url) => write!(f, "{}", url),
        }
    }
}
