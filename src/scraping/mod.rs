pub mod browser;
pub mod chart;

pub use browser::{WebDriverLauncher, WebDriverSession};
pub use chart::{ChartLayout, ChartScraper, ScrapeReport, ScrapeTimeouts};
