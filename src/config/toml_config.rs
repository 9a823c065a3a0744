use super::{precision_for, GEOMETRIES};
use crate::adapters::mapbox::DEFAULT_BASE_URL;
use crate::core::polyline::Precision;
use crate::core::retry::RetryPolicy;
use crate::domain::model::Profile;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub directions: DirectionsConfig,
    pub retry: Option<RetryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectionsConfig {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub profile: Option<Profile>,
    pub geometries: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAPBOX_ACCESS_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("directions.base_url", self.base_url())?;

        // 未設定的環境變數會原樣保留，視同缺少 token
        validation::validate_access_token("directions.access_token", self.access_token())?;

        if let Some(timeout) = self.directions.timeout_seconds {
            validation::validate_range("directions.timeout_seconds", timeout, 1, 120)?;
        }

        if let Some(geometries) = &self.directions.geometries {
            validation::validate_one_of("directions.geometries", geometries, &GEOMETRIES)?;
        }

        if let Some(retry) = &self.retry {
            validation::validate_range("retry.attempts", retry.attempts, 0, 10)?;
        }

        Ok(())
    }

    pub fn profile(&self) -> Profile {
        self.directions.profile.unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        self.directions
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
    }

    fn access_token(&self) -> Option<&str> {
        self.directions.access_token.as_deref()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.directions.timeout_seconds.unwrap_or(10))
    }

    fn precision(&self) -> Precision {
        precision_for(self.directions.geometries.as_deref().unwrap_or("polyline"))
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(|r| RetryPolicy::new(r.attempts, Duration::from_millis(r.delay_ms.unwrap_or(500))))
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
