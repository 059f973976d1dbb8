pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use std::time::Duration;

pub mod defaults {
    pub const API_ENDPOINT: &str = "https://api.tvmaze.com/shows";
    pub const PAGE_URL: &str = "https://www.imdb.com/pt/chart/toptv/";
    pub const OUTPUT_PATH: &str = "./output";
    pub const TOP_N: usize = 10;
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";
    pub const HTTP_TIMEOUT_SECONDS: u64 = 10;
    pub const WEBDRIVER_URL: &str = "http://localhost:4444";
    pub const PAGE_LOAD_TIMEOUT_SECONDS: u64 = 30;
    pub const ELEMENT_TIMEOUT_SECONDS: u64 = 10;
    pub const MODAL_TIMEOUT_SECONDS: u64 = 5;
}

/// Settings resolved once at startup: defaults, then the TOML file, then flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_endpoint: String,
    pub page_url: String,
    pub output_path: String,
    pub top_n: usize,
    pub user_agent: String,
    pub http_timeout_seconds: u64,
    pub webdriver_url: String,
    pub headless: bool,
    pub page_load_timeout_seconds: u64,
    pub element_timeout_seconds: u64,
    pub modal_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_endpoint: defaults::API_ENDPOINT.to_string(),
            page_url: defaults::PAGE_URL.to_string(),
            output_path: defaults::OUTPUT_PATH.to_string(),
            top_n: defaults::TOP_N,
            user_agent: defaults::USER_AGENT.to_string(),
            http_timeout_seconds: defaults::HTTP_TIMEOUT_SECONDS,
            webdriver_url: defaults::WEBDRIVER_URL.to_string(),
            headless: true,
            page_load_timeout_seconds: defaults::PAGE_LOAD_TIMEOUT_SECONDS,
            element_timeout_seconds: defaults::ELEMENT_TIMEOUT_SECONDS,
            modal_timeout_seconds: defaults::MODAL_TIMEOUT_SECONDS,
        }
    }
}

impl ConfigProvider for AppConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn page_url(&self) -> &str {
        &self.page_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    fn webdriver_url(&self) -> &str {
        &self.webdriver_url
    }

    fn headless(&self) -> bool {
        self.headless
    }

    fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_seconds)
    }

    fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_seconds)
    }

    fn modal_timeout(&self) -> Duration {
        Duration::from_secs(self.modal_timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_url("page_url", &self.page_url)?;
        validate_url("webdriver_url", &self.webdriver_url)?;
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        validate_positive_number("top_n", self.top_n as u64, 1)?;
        validate_positive_number("http_timeout_seconds", self.http_timeout_seconds, 1)?;
        validate_positive_number(
            "page_load_timeout_seconds",
            self.page_load_timeout_seconds,
            1,
        )?;
        validate_positive_number("element_timeout_seconds", self.element_timeout_seconds, 1)?;
        validate_positive_number("modal_timeout_seconds", self.modal_timeout_seconds, 1)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use self::cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::toml_config::TomlConfig;
    use super::AppConfig;
    use crate::core::orchestrator::Stage;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "top-series-etl")]
    #[command(about = "Collects the top-rated TV series from the TVmaze API and the IMDb chart")]
    pub struct CliConfig {
        #[arg(long, help = "TOML file with settings; flags take precedence")]
        pub config: Option<PathBuf>,

        #[arg(long)]
        pub api_endpoint: Option<String>,

        #[arg(long)]
        pub page_url: Option<String>,

        #[arg(long)]
        pub output_path: Option<String>,

        #[arg(long, help = "Number of top-rated series kept per source")]
        pub top_n: Option<usize>,

        #[arg(long)]
        pub webdriver_url: Option<String>,

        #[arg(long, help = "Show the browser window instead of running headless")]
        pub headed: bool,

        #[arg(long, value_enum, default_value_t = Stage::All)]
        pub stage: Stage,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log process CPU and memory usage")]
        pub monitor: bool,
    }

    impl CliConfig {
        /// Builds the validated runtime settings.
        pub fn resolve(&self) -> Result<AppConfig> {
            let mut config = AppConfig::default();

            if let Some(path) = &self.config {
                TomlConfig::from_file(path)?.apply_to(&mut config);
            }

            if let Some(endpoint) = &self.api_endpoint {
                config.api_endpoint = endpoint.clone();
            }
            if let Some(page_url) = &self.page_url {
                config.page_url = page_url.clone();
            }
            if let Some(output_path) = &self.output_path {
                config.output_path = output_path.clone();
            }
            if let Some(top_n) = self.top_n {
                config.top_n = top_n;
            }
            if let Some(webdriver_url) = &self.webdriver_url {
                config.webdriver_url = webdriver_url.clone();
            }
            if self.headed {
                config.headless = false;
            }

            config.validate()?;
            Ok(config)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_n(), 10);
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.page_load_timeout(), Duration::from_secs(30));
        assert!(config.headless());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let config = AppConfig {
            page_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
