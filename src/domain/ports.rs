use crate::domain::model::{SaveReport, SeriesRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Human-readable location of `path`, used in logs and reports.
    fn display_path(&self, path: &str) -> String {
        path.to_string()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn page_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn top_n(&self) -> usize;
    fn user_agent(&self) -> &str;
    fn http_timeout(&self) -> Duration;
    fn webdriver_url(&self) -> &str;
    fn headless(&self) -> bool;
    fn page_load_timeout(&self) -> Duration;
    fn element_timeout(&self) -> Duration;
    fn modal_timeout(&self) -> Duration;
}

/// One source's extract → transform → load run.
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Raw: Send + 'static;

    fn name(&self) -> &str;
    async fn extract(&self) -> Result<Vec<Self::Raw>>;
    async fn transform(&self, data: Vec<Self::Raw>) -> Result<Vec<SeriesRecord>>;
    async fn load(&self, records: Vec<SeriesRecord>) -> Result<SaveReport>;
}

/// A live browser tab driven through element locators (XPath).
///
/// Waits report a timeout as `Ok(false)` / `Ok(None)` so callers can tell a
/// missing element apart from a broken session.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    /// Waits until an element matching `xpath` is present in the DOM.
    async fn wait_for(&self, xpath: &str, timeout: Duration) -> Result<bool>;

    /// Waits until the element is visible and returns its text.
    async fn visible_text(&self, xpath: &str, timeout: Duration) -> Result<Option<String>>;

    /// Waits until every element matching `xpath` is visible and returns their texts.
    async fn visible_texts(&self, xpath: &str, timeout: Duration) -> Result<Option<Vec<String>>>;

    /// Text of an element that must already exist.
    async fn text(&self, xpath: &str) -> Result<String>;

    async fn attribute(&self, xpath: &str, name: &str) -> Result<Option<String>>;

    /// Clicks through a script call so overlays cannot intercept it.
    /// Returns `false` when no element matches.
    async fn script_click(&self, xpath: &str) -> Result<bool>;

    async fn close(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}
