use crate::core::{Pipeline, SaveReport, SeriesRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// What one stage produced.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    pub stage: String,
    pub extracted: usize,
    pub records: Vec<SeriesRecord>,
    /// `None` when there was nothing to write.
    pub saved: Option<SaveReport>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<StageReport> {
        let name = self.pipeline.name().to_string();
        let mut report = StageReport {
            stage: name.clone(),
            ..StageReport::default()
        };

        tracing::debug!("[{}] Extracting data...", name);
        let raw_data = self.pipeline.extract().await?;
        report.extracted = raw_data.len();
        tracing::info!("[{}] Extracted {} items", name, report.extracted);

        if raw_data.is_empty() {
            tracing::warn!("[{}] No data received; nothing will be written", name);
            return Ok(report);
        }

        tracing::debug!("[{}] Transforming data...", name);
        let records = self.pipeline.transform(raw_data).await?;
        tracing::info!("[{}] Ranked {} records", name, records.len());

        if records.is_empty() {
            tracing::warn!("[{}] No records left after ranking; nothing will be written", name);
            return Ok(report);
        }

        tracing::debug!("[{}] Loading data...", name);
        report.saved = Some(self.pipeline.load(records.clone()).await?);
        report.records = records;

        Ok(report)
    }
}

/// Object-safe view of an [`EtlEngine`], so stages with different raw item types
/// can share one runner.
#[async_trait]
pub trait StageRunner: Send + Sync {
    fn name(&self) -> &str;
    async fn run_stage(&self) -> Result<StageReport>;
}

#[async_trait]
impl<P: Pipeline> StageRunner for EtlEngine<P> {
    fn name(&self) -> &str {
        self.pipeline.name()
    }

    async fn run_stage(&self) -> Result<StageReport> {
        self.run().await
    }
}
