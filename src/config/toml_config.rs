use crate::config::smoke_config::SmokeSettings;
use crate::utils::error::{Result, TaplistError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional `smoke.toml` file:
///
/// ```toml
/// [smoke]
/// base_url = "${PREVIEW_URL}"
/// pages = ["/", "/admin.html"]
/// renderer = "browser"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmokeFileConfig {
    #[serde(default)]
    pub smoke: SmokeSettings,
}

impl SmokeFileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TaplistError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TaplistError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PREVIEW_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern compiles")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn into_settings(self) -> SmokeSettings {
        self.smoke
    }
}
