pub mod toml_config;

pub use toml_config::TomlConfig;

use crate::core::polyline::Precision;

pub const GEOMETRIES: [&str; 2] = ["polyline", "polyline6"];

/// `geometries` query value → decoding precision.
pub fn precision_for(geometries: &str) -> Precision {
    if geometries == "polyline6" {
        Precision::SIX
    } else {
        Precision::FIVE
    }
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::{RetryConfig, TomlConfig};
    use super::GEOMETRIES;
    use crate::domain::model::Profile;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;

    /// Connection flags are optional so that an explicit flag can be told
    /// apart from a default; unset ones fall back to `--config`, then to the
    /// built-in defaults.
    #[derive(Clone, Parser)]
    #[command(name = "cartographie")]
    #[command(about = "Fetch directions between two points and print the route to draw")]
    pub struct CliConfig {
        #[arg(long, help = "Start point as \"lon,lat\"")]
        pub start: String,

        #[arg(long, help = "End point as \"lon,lat\"")]
        pub end: String,

        #[arg(long, value_enum)]
        pub profile: Option<Profile>,

        #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
        pub access_token: Option<String>,

        #[arg(long, help = "Directions endpoint [default: Mapbox]")]
        pub base_url: Option<String>,

        #[arg(long, help = "polyline or polyline6 [default: polyline]")]
        pub geometries: Option<String>,

        #[arg(long, help = "Request timeout [default: 10]")]
        pub timeout_seconds: Option<u64>,

        #[arg(long, help = "Extra attempts on server or network errors [default: 0]")]
        pub retry_attempts: Option<u32>,

        #[arg(long, help = "Pause between attempts [default: 500]")]
        pub retry_delay_ms: Option<u64>,

        #[arg(long, help = "TOML file with [directions] and [retry] sections")]
        pub config: Option<String>,

        #[arg(long, help = "Write the route JSON here instead of stdout")]
        pub output: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// 命令列參數（含環境變數）覆蓋設定檔，設定檔覆蓋預設值
        pub fn overlay(&self, file: Option<&TomlConfig>) -> TomlConfig {
            let mut merged = file.cloned().unwrap_or_default();

            let directions = &mut merged.directions;
            if let Some(base_url) = &self.base_url {
                directions.base_url = Some(base_url.clone());
            }
            if let Some(token) = &self.access_token {
                directions.access_token = Some(token.clone());
            }
            if let Some(profile) = self.profile {
                directions.profile = Some(profile);
            }
            if let Some(geometries) = &self.geometries {
                directions.geometries = Some(geometries.clone());
            }
            if let Some(timeout) = self.timeout_seconds {
                directions.timeout_seconds = Some(timeout);
            }

            if self.retry_attempts.is_some() || self.retry_delay_ms.is_some() {
                let retry = merged.retry.get_or_insert(RetryConfig {
                    attempts: 0,
                    delay_ms: None,
                });
                if let Some(attempts) = self.retry_attempts {
                    retry.attempts = attempts;
                }
                if let Some(delay_ms) = self.retry_delay_ms {
                    retry.delay_ms = Some(delay_ms);
                }
            }

            merged
        }
    }

    /// Checks only what was given on the command line. The token and the
    /// merged settings are checked on the result of [`CliConfig::overlay`].
    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_non_empty_string("start", &self.start)?;
            validation::validate_non_empty_string("end", &self.end)?;
            if let Some(output) = &self.output {
                validation::validate_path("output", output)?;
            }
            if let Some(config) = &self.config {
                validation::validate_path("config", config)?;
            }
            if let Some(base_url) = &self.base_url {
                validation::validate_url("base_url", base_url)?;
            }
            if let Some(token) = &self.access_token {
                validation::validate_non_empty_string("access_token", token)?;
            }
            if let Some(geometries) = &self.geometries {
                validation::validate_one_of("geometries", geometries, &GEOMETRIES)?;
            }
            if let Some(timeout) = self.timeout_seconds {
                validation::validate_range("timeout_seconds", timeout, 1, 120)?;
            }
            if let Some(attempts) = self.retry_attempts {
                validation::validate_range("retry_attempts", attempts, 0, 10)?;
            }
            Ok(())
        }
    }

}
