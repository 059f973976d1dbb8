pub mod etl;
pub mod orchestrator;
pub mod writer;
pub mod xlsx;

pub use crate::domain::model::{Record, SaveReport, ScrapedRow, SeriesRecord};
pub use crate::domain::ports::{BrowserLauncher, BrowserSession, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
