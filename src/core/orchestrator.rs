use crate::core::etl::{StageReport, StageRunner};
use crate::utils::error::EtlError;
use crate::utils::monitor::SystemMonitor;
use std::time::{Duration, Instant};

/// Which sources a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Stage {
    #[default]
    All,
    Api,
    Web,
}

impl Stage {
    pub fn includes_api(self) -> bool {
        matches!(self, Stage::All | Stage::Api)
    }

    pub fn includes_web(self) -> bool {
        matches!(self, Stage::All | Stage::Web)
    }
}

#[derive(Debug)]
pub struct StageOutcome {
    pub name: String,
    pub result: Result<StageReport, EtlError>,
    pub duration: Duration,
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs stages one after another. A failing stage is logged and the next one
/// still runs.
pub struct Orchestrator {
    stages: Vec<Box<dyn StageRunner>>,
    monitor: Option<SystemMonitor>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            monitor: None,
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = if enabled {
            Some(SystemMonitor::new(true))
        } else {
            None
        };
        self
    }

    pub fn add_stage(&mut self, stage: Box<dyn StageRunner>) {
        self.stages.push(stage);
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub async fn run_all(&self) -> Vec<StageOutcome> {
        let mut outcomes = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let name = stage.name().to_string();
            let start_time = Instant::now();
            tracing::info!("Starting data extraction with {}.", name);

            let result = stage.run_stage().await;
            let duration = start_time.elapsed();

            match &result {
                Ok(report) => tracing::info!(
                    "Data extraction with {} completed ({} records, {:?}).",
                    name,
                    report.records.len(),
                    duration
                ),
                Err(e) => tracing::error!(
                    "Data extraction with {} failed after {:?}: {} ({})",
                    name,
                    duration,
                    e,
                    e.recovery_suggestion()
                ),
            }

            if let Some(monitor) = &self.monitor {
                monitor.log_stats(&format!("After {}", name));
            }

            outcomes.push(StageOutcome {
                name,
                result,
                duration,
            });
        }

        if let Some(monitor) = &self.monitor {
            monitor.log_final_stats();
        }

        outcomes
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
