use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaplistError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed inventory payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Contract violation at '{field}' (value: '{value}'): {reason}")]
    ContractViolation {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' - {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Navigation to {url} failed: {message}")]
    NavigationFailed { url: String, message: String },

    #[error("Timed out after {seconds}s while {operation}")]
    Timeout { operation: String, seconds: u64 },

    #[error("Browser automation failed: {0}")]
    CdpError(#[from] chromiumoxide::error::CdpError),

    #[error("Browser inspection failed: {message}")]
    BrowserError { message: String },

    #[error("Root container '#{root_id}' is not visible on {url}: {reason}")]
    RootNotVisible {
        url: String,
        root_id: String,
        reason: String,
    },

    #[error("Body on {url} carries no theme class matching '{pattern}' (classes: [{classes}])")]
    ThemeMissing {
        url: String,
        pattern: String,
        classes: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Contract,
    HealthCheck,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度對應的行程退出碼，錯誤一律非零
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl TaplistError {
    pub fn violation(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        TaplistError::ContractViolation {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TaplistError::MalformedPayload(_) | TaplistError::ContractViolation { .. } => {
                ErrorCategory::Contract
            }
            TaplistError::ConfigError { .. }
            | TaplistError::InvalidConfigValueError { .. }
            | TaplistError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            TaplistError::HttpError(_)
            | TaplistError::NavigationFailed { .. }
            | TaplistError::Timeout { .. }
            | TaplistError::CdpError(_)
            | TaplistError::BrowserError { .. }
            | TaplistError::RootNotVisible { .. }
            | TaplistError::ThemeMissing { .. } => ErrorCategory::HealthCheck,
            TaplistError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TaplistError::HttpError(_)
            | TaplistError::NavigationFailed { .. }
            | TaplistError::Timeout { .. } => ErrorSeverity::Medium,
            TaplistError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TaplistError::MalformedPayload(_) => {
                "Check the payload against the Tap/Beer/Price shapes; status must be on, off, coming_soon or kicked"
            }
            TaplistError::ContractViolation { .. } => {
                "Fix the offending record in the inventory backend; values are never coerced"
            }
            TaplistError::ConfigError { .. }
            | TaplistError::InvalidConfigValueError { .. }
            | TaplistError::ConfigValidationError { .. } => {
                "Review the command-line flags, SMOKE_* environment variables and the smoke config file"
            }
            TaplistError::HttpError(_) | TaplistError::NavigationFailed { .. } => {
                "Make sure the bundle is being served (e.g. a preview server) at SMOKE_BASE_URL"
            }
            TaplistError::Timeout { .. } => {
                "The server or browser is slow to respond; raise --timeout-secs or check server load"
            }
            TaplistError::CdpError(_) | TaplistError::BrowserError { .. } => {
                "Verify the headless browser runs on this machine, or use --renderer static"
            }
            TaplistError::RootNotVisible { .. } => {
                "The bundle did not mount its root container; check the browser console for script errors"
            }
            TaplistError::ThemeMissing { .. } => {
                "The page body lost its theme class; check the layout template and the Tailwind build"
            }
            TaplistError::IoError(_) => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TaplistError::MalformedPayload(e) => format!("Inventory data is malformed: {}", e),
            TaplistError::ContractViolation { field, reason, .. } => {
                format!("Inventory data breaks the contract at {}: {}", field, reason)
            }
            TaplistError::NavigationFailed { url, .. } => {
                format!("Could not load {}", url)
            }
            TaplistError::RootNotVisible { url, root_id, .. } => {
                format!("The page at {} did not show its #{} container", url, root_id)
            }
            TaplistError::ThemeMissing { url, .. } => {
                format!("The page at {} is not themed", url)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaplistError>;
