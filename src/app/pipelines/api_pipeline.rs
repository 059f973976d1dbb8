use crate::core::writer::ResultWriter;
use crate::core::{ConfigProvider, Pipeline, Record, SaveReport, SeriesRecord, Storage};
use crate::domain::normalizer;
use crate::utils::error::Result;
use reqwest::Client;

pub const API_STAGE: &str = "API";
pub const API_CSV_FILE: &str = "api_top_series.csv";
pub const API_XLSX_FILE: &str = "api_top_series.xlsx";

/// Top-rated series from the JSON API.
pub struct ApiPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) writer: ResultWriter<S>,
    pub(crate) config: C,
    pub(crate) client: Client,
    top_n: usize,
}

impl<S: Storage, C: ConfigProvider> ApiPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.http_timeout())
            .build()?;
        let top_n = config.top_n();

        Ok(Self {
            writer: ResultWriter::new(storage),
            config,
            client,
            top_n,
        })
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// One GET against `url`. Failures are logged and yield an empty list.
    pub async fn fetch(&self, url: &str) -> Vec<Record> {
        match self.try_fetch(url).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to fetch data from API {}: {}", url, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<Record>> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let json_data: serde_json::Value = response.error_for_status()?.json().await?;

        let serde_json::Value::Array(items) = json_data else {
            tracing::warn!("API response from {} is not a JSON array; ignoring it", url);
            return Ok(Vec::new());
        };

        let total = items.len();
        let records: Vec<Record> = items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::Object(obj) => Some(Record::from_object(obj)),
                _ => None,
            })
            .collect();

        if records.len() < total {
            tracing::debug!("Skipped {} non-object items", total - records.len());
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ApiPipeline<S, C> {
    type Raw = Record;

    fn name(&self) -> &str {
        API_STAGE
    }

    async fn extract(&self) -> Result<Vec<Record>> {
        Ok(self.fetch(self.config.api_endpoint()).await)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<Vec<SeriesRecord>> {
        let total = data.len();
        let records = data
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let record = normalizer::normalize_api(item);
                tracing::info!("{}/{}: Processed '{}'", index + 1, total, record.summary());
                record
            })
            .collect();

        Ok(normalizer::top_n(records, self.top_n))
    }

    async fn load(&self, records: Vec<SeriesRecord>) -> Result<SaveReport> {
        let report = self.writer.save(&records, API_CSV_FILE, API_XLSX_FILE).await;
        tracing::info!("API scraping finished.");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{defaults, AppConfig};
    use crate::utils::logger::capture::LogCapture;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn config_for(endpoint: String) -> AppConfig {
        AppConfig {
            api_endpoint: endpoint,
            top_n: 1,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_and_rank_single_show() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/shows");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"name": "Show A", "premiered": "2020-05-01", "rating": {"average": 8.5},
                     "genres": ["Drama"], "url": "http://x"}
                ]));
        });

        let pipeline = ApiPipeline::new(MockStorage::default(), config_for(server.url("/shows")))
            .unwrap();
        let raw = pipeline.extract().await.unwrap();
        let ranked = pipeline.transform(raw).await.unwrap();

        api_mock.assert();
        assert_eq!(
            ranked,
            vec![SeriesRecord {
                title: "Show A".to_string(),
                year: "2020".to_string(),
                rating: 8.5,
                genres: "Drama".to_string(),
                url: "http://x".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/shows")
                .header("user-agent", defaults::USER_AGENT);
            then.status(200).json_body(serde_json::json!([]));
        });

        let pipeline = ApiPipeline::new(MockStorage::default(), config_for(server.url("/shows")))
            .unwrap();
        assert!(pipeline.fetch(&server.url("/shows")).await.is_empty());
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_http_error_returns_empty() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/shows");
            then.status(503);
        });

        let pipeline = ApiPipeline::new(MockStorage::default(), config_for(server.url("/shows")))
            .unwrap();
        assert!(pipeline.fetch(&server.url("/shows")).await.is_empty());
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_network_error_returns_empty() {
        let (logs, _guard) = LogCapture::install();
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let pipeline = ApiPipeline::new(
            MockStorage::default(),
            config_for(format!("http://127.0.0.1:{}/shows", port)),
        )
        .unwrap();
        assert!(pipeline.extract().await.unwrap().is_empty());
        assert!(logs.has_line(
            "WARN",
            &format!("Failed to fetch data from API http://127.0.0.1:{}/shows", port)
        ));
    }

    #[tokio::test]
    async fn test_fetch_non_array_and_non_object_items() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/object");
            then.status(200).json_body(serde_json::json!({"name": "Lonely"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/mixed");
            then.status(200)
                .json_body(serde_json::json!([{"name": "Kept"}, 42, "text", null]));
        });

        let pipeline = ApiPipeline::new(MockStorage::default(), config_for(server.url("/object")))
            .unwrap();
        assert!(pipeline.fetch(&server.url("/object")).await.is_empty());

        let mixed = pipeline.fetch(&server.url("/mixed")).await;
        assert_eq!(mixed.len(), 1);
        assert_eq!(mixed[0].data.get("name").unwrap(), "Kept");
    }

    #[tokio::test]
    async fn test_with_top_n_overrides_config() {
        let (logs, _guard) = LogCapture::install();
        let items: Vec<Record> = (0..5)
            .map(|i| {
                let mut data = HashMap::new();
                data.insert("name".to_string(), serde_json::json!(format!("S{}", i)));
                data.insert("rating".to_string(), serde_json::json!({"average": i as f64}));
                Record { data }
            })
            .collect();

        let pipeline = ApiPipeline::new(
            MockStorage::default(),
            config_for("http://localhost/shows".to_string()),
        )
        .unwrap()
        .with_top_n(3);

        let ranked = pipeline.transform(items).await.unwrap();
        assert_eq!(pipeline.top_n(), 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].title, "S4");

        // every fetched item is logged, not just the kept ones
        assert!(logs.has_line("INFO", "1/5: Processed 'S0 - N/A - 0 - '"));
        assert!(logs.has_line("INFO", "5/5: Processed 'S4 - N/A - 4 - '"));
    }

    #[tokio::test]
    async fn test_load_writes_api_files() {
        let storage = MockStorage::default();
        let pipeline = ApiPipeline::new(
            storage.clone(),
            config_for("http://localhost/shows".to_string()),
        )
        .unwrap();

        let report = pipeline.load(Vec::new()).await.unwrap();
        assert!(report.is_complete());

        let csv = storage.get_file(API_CSV_FILE).await.unwrap();
        assert_eq!(csv, b"title,year,rating,genres,url\n");
        assert!(storage.get_file(API_XLSX_FILE).await.is_some());
    }
}
