use anyhow::Context;
use clap::Parser;
use std::path::Path;
use top_series_etl::core::orchestrator::StageOutcome;
use top_series_etl::utils::error::ErrorSeverity;
use top_series_etl::utils::logger;
use top_series_etl::{
    ApiPipeline, CliConfig, EtlEngine, LocalStorage, Orchestrator, WebDriverLauncher, WebPipeline,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    };

    let log_path = logger::init_cli_logger(cli.verbose, Path::new(&config.output_path))
        .context("failed to initialize logging")?;

    tracing::info!("Starting top-series-etl");
    tracing::debug!("Resolved config: {:?}", config);
    tracing::debug!("Logging to {}", log_path.display());
    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut orchestrator = Orchestrator::new().with_monitoring(cli.monitor);

    if cli.stage.includes_api() {
        let storage = LocalStorage::new(&config.output_path);
        let pipeline = ApiPipeline::new(storage, config.clone())
            .context("failed to build the HTTP client")?;
        orchestrator.add_stage(Box::new(EtlEngine::new(pipeline)));
    }

    if cli.stage.includes_web() {
        let storage = LocalStorage::new(&config.output_path);
        let launcher = WebDriverLauncher::from_config(&config);
        let pipeline = WebPipeline::new(storage, config.clone(), launcher);
        orchestrator.add_stage(Box::new(EtlEngine::new(pipeline)));
    }

    let outcomes = orchestrator.run_all().await;
    log_summary(&outcomes);

    Ok(())
}

fn log_summary(outcomes: &[StageOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => match &report.saved {
                Some(saved) => tracing::info!(
                    "✅ {} ({:?}): {} records -> {}",
                    outcome.name,
                    outcome.duration,
                    report.records.len(),
                    [&saved.csv_path, &saved.xlsx_path]
                        .into_iter()
                        .flatten()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                None => tracing::info!(
                    "⚠️ {} ({:?}): nothing written",
                    outcome.name,
                    outcome.duration
                ),
            },
            Err(e) => tracing::error!(
                "❌ {} ({:?}): {}",
                outcome.name,
                outcome.duration,
                e.user_friendly_message()
            ),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    tracing::info!("Finished {} stage(s), {} failed", outcomes.len(), failed);
}
