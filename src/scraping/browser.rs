use crate::core::{BrowserLauncher, BrowserSession, ConfigProvider};
use crate::utils::error::Result;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Opens Chrome sessions on a running WebDriver server (e.g. chromedriver).
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
    user_agent: String,
}

impl WebDriverLauncher {
    pub fn new(
        webdriver_url: impl Into<String>,
        headless: bool,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless,
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.webdriver_url(), config.headless(), config.user_agent())
    }

    pub fn capabilities(&self) -> Map<String, Value> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless=new".to_string());
        }
        args.extend(
            [
                "--window-size=1920,1080",
                "--disable-gpu",
                "--disable-extensions",
                "--disable-infobars",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "start-maximized",
            ]
            .map(String::from),
        );
        args.push(format!("user-agent={}", self.user_agent));

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        tracing::debug!(
            "Connecting to WebDriver at {} (headless: {})",
            self.webdriver_url,
            self.headless
        );

        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        let client = builder.connect(&self.webdriver_url).await?;

        Ok(Box::new(WebDriverSession { client }))
    }
}

pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    async fn find_first(&self, xpath: &str) -> Result<Option<Element>> {
        let elements = self.client.find_all(Locator::XPath(xpath)).await?;
        Ok(elements.into_iter().next())
    }

    /// Polls until at least one element matches and all matches are displayed.
    async fn wait_visible(&self, xpath: &str, timeout: Duration) -> Result<Option<Vec<Element>>> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let elements = self.client.find_all(Locator::XPath(xpath)).await?;
            if !elements.is_empty() {
                let mut all_displayed = true;
                for element in &elements {
                    if !element.is_displayed().await? {
                        all_displayed = false;
                        break;
                    }
                }
                if all_displayed {
                    return Ok(Some(elements));
                }
            }

            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn wait_for(&self, xpath: &str, timeout: Duration) -> Result<bool> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::XPath(xpath))
            .await
        {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn visible_text(&self, xpath: &str, timeout: Duration) -> Result<Option<String>> {
        match self.wait_visible(xpath, timeout).await? {
            Some(elements) => match elements.first() {
                Some(element) => Ok(Some(element.text().await?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    async fn visible_texts(&self, xpath: &str, timeout: Duration) -> Result<Option<Vec<String>>> {
        let Some(elements) = self.wait_visible(xpath, timeout).await? else {
            return Ok(None);
        };

        let mut texts = Vec::with_capacity(elements.len());
        for element in &elements {
            texts.push(element.text().await?);
        }
        Ok(Some(texts))
    }

    async fn text(&self, xpath: &str) -> Result<String> {
        let element = self.client.find(Locator::XPath(xpath)).await?;
        Ok(element.text().await?)
    }

    async fn attribute(&self, xpath: &str, name: &str) -> Result<Option<String>> {
        let element = self.client.find(Locator::XPath(xpath)).await?;
        // The property resolves relative links to absolute URLs
        match element.prop(name).await? {
            Some(value) => Ok(Some(value)),
            None => Ok(element.attr(name).await?),
        }
    }

    async fn script_click(&self, xpath: &str) -> Result<bool> {
        let Some(element) = self.find_first(xpath).await? else {
            return Ok(false);
        };

        self.client
            .execute("arguments[0].click();", vec![serde_json::to_value(&element)?])
            .await?;
        Ok(true)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn chrome_args(launcher: &WebDriverLauncher) -> Vec<String> {
        launcher.capabilities()["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_headless_capabilities() {
        let launcher = WebDriverLauncher::from_config(&AppConfig::default());
        let args = chrome_args(&launcher);

        assert_eq!(args[0], "--headless=new");
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
        assert!(args.iter().any(|a| a.starts_with("user-agent=Mozilla/5.0")));
        assert_eq!(launcher.capabilities()["browserName"], "chrome");
    }

    #[test]
    fn test_headed_capabilities() {
        let launcher = WebDriverLauncher::new("http://localhost:4444", false, "UA");
        let args = chrome_args(&launcher);

        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert_eq!(args.last().unwrap(), "user-agent=UA");
    }
}
