use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("WebDriver command failed: {0}")]
    WebDriverError(#[from] fantoccini::error::CmdError),

    #[error("WebDriver session could not be created: {0}")]
    SessionError(#[from] fantoccini::error::NewSessionError),

    #[error("Browser automation error: {message}")]
    BrowserError { message: String },

    #[error("Page {url} did not load within {seconds}s")]
    PageLoadTimeout { url: String, seconds: u64 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn browser(message: impl Into<String>) -> Self {
        EtlError::BrowserError {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ApiError(_) | EtlError::PageLoadTimeout { .. } => ErrorSeverity::Medium,
            EtlError::WebDriverError(_) | EtlError::BrowserError { .. } => ErrorSeverity::Medium,
            EtlError::CsvError(_)
            | EtlError::ZipError(_)
            | EtlError::SerializationError(_) => ErrorSeverity::High,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::SessionError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and the API endpoint",
            EtlError::PageLoadTimeout { .. } => {
                "The page may be slow or its layout changed; try again later"
            }
            EtlError::WebDriverError(_) | EtlError::BrowserError { .. } => {
                "Check that the page layout still matches the chart locators"
            }
            EtlError::SessionError(_) => {
                "Start a WebDriver server (e.g. `chromedriver --port=4444`) and check --webdriver-url"
            }
            EtlError::IoError(_) => "Check that the output directory is writable",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and the TOML config file"
            }
            EtlError::CsvError(_)
            | EtlError::ZipError(_)
            | EtlError::SerializationError(_) => "Re-run with --verbose and inspect the log file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::SessionError(_) => "Could not start a browser session".to_string(),
            EtlError::PageLoadTimeout { url, .. } => format!("Page did not load in time: {}", url),
            EtlError::ConfigError { message } => format!("Invalid configuration: {}", message),
            EtlError::ConfigValidationError { field, message } => {
                format!("Invalid configuration ({}): {}", field, message)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
