pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod scraping;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, AppConfig};

pub use app::pipelines::{ApiPipeline, WebPipeline};
pub use core::{
    etl::EtlEngine,
    orchestrator::{Orchestrator, Stage},
};
pub use scraping::WebDriverLauncher;
pub use utils::error::{EtlError, Result};
