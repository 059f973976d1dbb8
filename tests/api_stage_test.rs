use httpmock::prelude::*;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;
use top_series_etl::{ApiPipeline, AppConfig, EtlEngine, LocalStorage};

fn config_for(endpoint: String, output_path: &Path, top_n: usize) -> AppConfig {
    AppConfig {
        api_endpoint: endpoint,
        output_path: output_path.to_str().unwrap().to_string(),
        top_n,
        ..AppConfig::default()
    }
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn read_sheet(path: &Path) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();
    sheet
}

#[tokio::test]
async fn test_api_stage_writes_ranked_csv_and_xlsx() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/shows");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"name": "Middling", "premiered": "2011-04-17", "rating": {"average": 7.9},
                 "genres": ["Drama", "Adventure"], "url": "https://example.com/shows/1"},
                {"name": "Best, Really", "premiered": "2008-01-20", "rating": {"average": 9.3},
                 "genres": ["Crime"], "url": "https://example.com/shows/2"},
                {"name": "Unrated", "premiered": null, "rating": {"average": null},
                 "genres": []},
                {"name": "Good", "premiered": "2013-09-01", "rating": {"average": 8.8},
                 "genres": ["Comedy"], "url": "https://example.com/shows/4"}
            ]));
    });

    let config = config_for(server.url("/shows"), temp_dir.path(), 3);
    let storage = LocalStorage::new(temp_dir.path());
    let engine = EtlEngine::new(ApiPipeline::new(storage, config)?);

    let report = engine.run().await?;
    api_mock.assert();

    assert_eq!(report.extracted, 4);
    assert_eq!(report.records.len(), 3);
    assert!(report.saved.unwrap().is_complete());

    let rows = read_csv(&temp_dir.path().join("api_top_series.csv"));
    assert_eq!(
        rows,
        vec![
            vec!["Best, Really", "2008", "9.3", "Crime", "https://example.com/shows/2"],
            vec!["Good", "2013", "8.8", "Comedy", "https://example.com/shows/4"],
            vec![
                "Middling",
                "2011",
                "7.9",
                "Drama, Adventure",
                "https://example.com/shows/1"
            ],
        ]
    );

    let sheet = read_sheet(&temp_dir.path().join("api_top_series.xlsx"));
    assert!(sheet.contains("Best, Really"));
    assert!(sheet.contains("<v>9.3</v>"));
    assert!(!sheet.contains("Unrated"));
    Ok(())
}

#[tokio::test]
async fn test_api_stage_writes_csv_header() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/shows");
        then.status(200).json_body(serde_json::json!([{"name": "Only"}]));
    });

    let config = config_for(server.url("/shows"), temp_dir.path(), 10);
    let engine = EtlEngine::new(ApiPipeline::new(LocalStorage::new(temp_dir.path()), config)?);
    engine.run().await?;

    let csv = std::fs::read_to_string(temp_dir.path().join("api_top_series.csv"))?;
    assert_eq!(csv, "title,year,rating,genres,url\nOnly,N/A,0.0,,N/A\n");
    Ok(())
}

#[tokio::test]
async fn test_api_failure_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/shows");
        then.status(500);
    });

    let config = config_for(server.url("/shows"), temp_dir.path(), 10);
    let engine = EtlEngine::new(
        ApiPipeline::new(LocalStorage::new(temp_dir.path()), config).unwrap(),
    );

    let report = engine.run().await.unwrap();
    api_mock.assert();

    assert_eq!(report.extracted, 0);
    assert!(report.saved.is_none());
    assert!(!temp_dir.path().join("api_top_series.csv").exists());
    assert!(!temp_dir.path().join("api_top_series.xlsx").exists());
}
