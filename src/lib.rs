pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    probe::BrowserProbe,
    inspector::{HeadlessBrowserInspector, StaticInspector},
    source::InventorySource,
};
pub use config::{HealthCheckConfig, RendererKind};
pub use crate::core::{
    health_check::{HealthCheck, HealthReport},
    runner::{CheckCommand, SmokeOutcome, SmokeRunner},
};
pub use domain::model::{Beer, GuestStatus, Price, Tap, TapList, TapStatus};
pub use utils::error::{Result, TaplistError};
