//! Row extraction for the ranked "Top TV" chart page.

use crate::core::{BrowserSession, ScrapedRow};
use crate::utils::error::{EtlError, Result};
use std::time::Duration;

const ROW_PLACEHOLDER: &str = "{row}";

/// XPath locators for the chart page. Row-scoped templates contain `{row}`,
/// replaced by the 1-based rank position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub landmark: String,
    pub title: String,
    pub year: String,
    pub rating: String,
    pub info_button: String,
    pub link: String,
    pub modal_genres: String,
    pub modal_close: String,
}

impl Default for ChartLayout {
    fn default() -> Self {
        let row = "//*[@id='__next']/main/div/div[3]/section/div/div[2]/div/ul/li[{row}]/div/div/div/div";
        Self {
            landmark: "//*[@id='__next']/main/div/div[3]/section/div/div[1]/div/div[2]/hgroup/h1"
                .to_string(),
            title: format!("{}/div[2]/div[2]", row),
            year: format!("{}/div[2]/div[3]/span[1]", row),
            rating: format!("{}/div[2]/span/div/span/span[1]", row),
            info_button: format!("{}/div[3]/button", row),
            link: format!("{}/div[2]/div[2]/a", row),
            modal_genres: "/html/body/div[4]/div[2]/div/div[2]/div/div/div[1]/div[2]/ul[2]/li"
                .to_string(),
            modal_close: "/html/body/div[4]/div[2]/div/div[1]/button".to_string(),
        }
    }
}

impl ChartLayout {
    pub fn for_row(template: &str, row: usize) -> String {
        template.replace(ROW_PLACEHOLDER, &row.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrapeTimeouts {
    pub page_load: Duration,
    pub element: Duration,
    pub modal: Duration,
}

impl Default for ScrapeTimeouts {
    fn default() -> Self {
        Self {
            page_load: Duration::from_secs(30),
            element: Duration::from_secs(10),
            modal: Duration::from_secs(5),
        }
    }
}

/// Rows read from the chart plus the rank positions that failed.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub rows: Vec<ScrapedRow>,
    pub failed_rows: Vec<(usize, String)>,
}

pub struct ChartScraper<'a> {
    session: &'a dyn BrowserSession,
    layout: &'a ChartLayout,
    timeouts: ScrapeTimeouts,
}

impl<'a> ChartScraper<'a> {
    pub fn new(
        session: &'a dyn BrowserSession,
        layout: &'a ChartLayout,
        timeouts: ScrapeTimeouts,
    ) -> Self {
        Self {
            session,
            layout,
            timeouts,
        }
    }

    /// Navigates to `url` and waits for the landmark heading.
    pub async fn open_and_wait(&self, url: &str) -> Result<()> {
        self.session.goto(url).await?;

        if self
            .session
            .wait_for(&self.layout.landmark, self.timeouts.page_load)
            .await?
        {
            Ok(())
        } else {
            Err(EtlError::PageLoadTimeout {
                url: url.to_string(),
                seconds: self.timeouts.page_load.as_secs(),
            })
        }
    }

    /// Reads rank positions `1..=top_n`. A failing row is logged and skipped.
    pub async fn scrape_rows(&self, top_n: usize) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        tracing::info!("Started scraping top series...");

        for row in 1..=top_n {
            match self.scrape_row(row).await {
                Ok(scraped) => {
                    tracing::debug!(
                        "{}/{}: Scraped '{} - {} - {}'",
                        row,
                        top_n,
                        scraped.title,
                        scraped.year,
                        scraped.rating
                    );
                    report.rows.push(scraped);
                }
                Err(e) => {
                    tracing::warn!("Failed to scrape row {}: {}", row, e);
                    report.failed_rows.push((row, e.to_string()));
                }
            }
        }

        report
    }

    async fn scrape_row(&self, row: usize) -> Result<ScrapedRow> {
        let locate = |template: &str| ChartLayout::for_row(template, row);

        let title = self
            .session
            .visible_text(&locate(&self.layout.title), self.timeouts.element)
            .await?
            .ok_or_else(|| {
                EtlError::browser(format!("title of row {} never became visible", row))
            })?;

        let year = self.session.text(&locate(&self.layout.year)).await?;
        let rating = self.session.text(&locate(&self.layout.rating)).await?;

        if !self
            .session
            .script_click(&locate(&self.layout.info_button))
            .await?
        {
            return Err(EtlError::browser(format!("info button of row {} not found", row)));
        }
        let genres = self.extract_genres().await?;

        let url = self
            .session
            .attribute(&locate(&self.layout.link), "href")
            .await?;

        Ok(ScrapedRow {
            rank: row,
            title,
            year,
            rating,
            genres,
            url,
        })
    }

    /// Reads the genre list from the open overlay, then dismisses it.
    async fn extract_genres(&self) -> Result<Vec<String>> {
        let genres = self
            .session
            .visible_texts(&self.layout.modal_genres, self.timeouts.modal)
            .await?
            .unwrap_or_else(|| {
                tracing::debug!("Genre list did not appear; leaving genres empty");
                Vec::new()
            });

        if !self.session.script_click(&self.layout.modal_close).await? {
            tracing::debug!("Overlay close button not found");
        }

        Ok(genres
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect())
    }
}
