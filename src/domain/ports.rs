use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// What a loaded page shows: the state of its root container and the
/// classes on `<body>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub root_found: bool,
    pub root_visible: bool,
    #[serde(default)]
    pub hidden_reason: Option<String>,
    #[serde(default)]
    pub body_classes: Vec<String>,
}

/// Loads a page and reports what it renders.
#[async_trait]
pub trait PageInspector: Send + Sync {
    async fn inspect(&self, url: &Url, root_id: &str) -> Result<PageSnapshot>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl PageInspector for Box<dyn PageInspector> {
    async fn inspect(&self, url: &Url, root_id: &str) -> Result<PageSnapshot> {
        (**self).inspect(url, root_id).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Capability query for the tooling a check needs.
pub trait ToolProbe: Send + Sync {
    /// `None` means the tooling is not installed here.
    fn locate(&self) -> Option<PathBuf>;

    fn describe(&self) -> String;
}
