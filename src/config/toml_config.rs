use crate::config::AppConfig;
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every key may be omitted; present keys override defaults.
///
/// ```toml
/// [source]
/// api_endpoint = "https://api.tvmaze.com/shows"
/// page_url = "https://www.imdb.com/pt/chart/toptv/"
///
/// [browser]
/// webdriver_url = "${WEBDRIVER_URL}"
/// headless = true
///
/// [load]
/// output_path = "./output"
/// top_n = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub api_endpoint: Option<String>,
    pub page_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrowserConfig {
    pub webdriver_url: Option<String>,
    pub headless: Option<bool>,
    pub page_load_timeout_seconds: Option<u64>,
    pub element_timeout_seconds: Option<u64>,
    pub modal_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    pub output_path: Option<String>,
    pub top_n: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value. Unset variables are an error.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if !missing.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "environment".to_string(),
                message: format!("Undefined environment variables: {}", missing.join(", ")),
            });
        }

        Ok(result.into_owned())
    }

    /// Copies every key present in the file onto `config`.
    pub fn apply_to(&self, config: &mut AppConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut config.api_endpoint, &self.source.api_endpoint);
        set(&mut config.page_url, &self.source.page_url);
        set(&mut config.webdriver_url, &self.browser.webdriver_url);
        set(&mut config.headless, &self.browser.headless);
        set(
            &mut config.page_load_timeout_seconds,
            &self.browser.page_load_timeout_seconds,
        );
        set(
            &mut config.element_timeout_seconds,
            &self.browser.element_timeout_seconds,
        );
        set(
            &mut config.modal_timeout_seconds,
            &self.browser.modal_timeout_seconds,
        );
        set(&mut config.http_timeout_seconds, &self.http.timeout_seconds);
        set(&mut config.user_agent, &self.http.user_agent);
        set(&mut config.output_path, &self.load.output_path);
        set(&mut config.top_n, &self.load.top_n);
    }
}
