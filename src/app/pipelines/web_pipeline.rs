use crate::core::writer::ResultWriter;
use crate::core::{
    BrowserLauncher, BrowserSession, ConfigProvider, Pipeline, SaveReport, ScrapedRow,
    SeriesRecord, Storage,
};
use crate::domain::normalizer;
use crate::scraping::{ChartLayout, ChartScraper, ScrapeTimeouts};
use crate::utils::error::Result;

pub const WEB_STAGE: &str = "Web Scraping";
pub const WEB_CSV_FILE: &str = "ws_top_series.csv";
pub const WEB_XLSX_FILE: &str = "ws_top_series.xlsx";

/// Top-rated series scraped from the ranked chart page.
pub struct WebPipeline<S: Storage, C: ConfigProvider, L: BrowserLauncher> {
    pub(crate) writer: ResultWriter<S>,
    pub(crate) config: C,
    launcher: L,
    layout: ChartLayout,
    top_n: usize,
}

impl<S: Storage, C: ConfigProvider, L: BrowserLauncher> WebPipeline<S, C, L> {
    pub fn new(storage: S, config: C, launcher: L) -> Self {
        let top_n = config.top_n();
        Self {
            writer: ResultWriter::new(storage),
            config,
            launcher,
            layout: ChartLayout::default(),
            top_n,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_layout(mut self, layout: ChartLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    fn timeouts(&self) -> ScrapeTimeouts {
        ScrapeTimeouts {
            page_load: self.config.page_load_timeout(),
            element: self.config.element_timeout(),
            modal: self.config.modal_timeout(),
        }
    }

    async fn scrape(&self, session: &dyn BrowserSession) -> Result<Vec<ScrapedRow>> {
        let scraper = ChartScraper::new(session, &self.layout, self.timeouts());
        scraper.open_and_wait(self.config.page_url()).await?;

        let report = scraper.scrape_rows(self.top_n).await;
        if !report.failed_rows.is_empty() {
            tracing::warn!(
                "{} of {} rows could not be scraped",
                report.failed_rows.len(),
                self.top_n
            );
        }
        Ok(report.rows)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, L: BrowserLauncher> Pipeline for WebPipeline<S, C, L> {
    type Raw = ScrapedRow;

    fn name(&self) -> &str {
        WEB_STAGE
    }

    async fn extract(&self) -> Result<Vec<ScrapedRow>> {
        let session = self.launcher.launch().await?;
        let result = self.scrape(session.as_ref()).await;

        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }
        tracing::info!("Scraping finished.");

        let rows = result?;
        if rows.is_empty() {
            tracing::warn!("No series scraped from {}", self.config.page_url());
        }
        Ok(rows)
    }

    async fn transform(&self, data: Vec<ScrapedRow>) -> Result<Vec<SeriesRecord>> {
        let mut records: Vec<SeriesRecord> =
            data.iter().map(normalizer::normalize_scraped).collect();
        normalizer::sort_by_rating(&mut records);

        for (index, record) in records.iter().enumerate() {
            tracing::info!(
                "{}/{}: Scraped '{}'",
                index + 1,
                records.len(),
                record.summary()
            );
        }
        Ok(records)
    }

    async fn load(&self, records: Vec<SeriesRecord>) -> Result<SaveReport> {
        Ok(self.writer.save(&records, WEB_CSV_FILE, WEB_XLSX_FILE).await)
    }
}
