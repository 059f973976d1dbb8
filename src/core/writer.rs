use crate::core::xlsx::{Cell, SheetBuilder};
use crate::core::{SaveReport, SeriesRecord, Storage};
use crate::utils::error::{EtlError, Result};

/// CSV bytes with a header row, even when `records` is empty.
pub fn encode_csv(records: &[SeriesRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SeriesRecord::COLUMNS)?;

    for record in records {
        let rating = record.rating_text();
        writer.write_record([
            record.title.as_str(),
            record.year.as_str(),
            rating.as_str(),
            record.genres.as_str(),
            record.url.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Single-sheet workbook with the same columns as the CSV; ratings are numeric cells.
pub fn encode_xlsx(records: &[SeriesRecord]) -> Result<Vec<u8>> {
    let mut sheet = SheetBuilder::new("Sheet1");
    let header: Vec<Cell> = SeriesRecord::COLUMNS.iter().map(|c| Cell::Text(c)).collect();
    sheet.push_row(&header);

    for record in records {
        sheet.push_row(&[
            Cell::Text(&record.title),
            Cell::Text(&record.year),
            Cell::Number(record.rating),
            Cell::Text(&record.genres),
            Cell::Text(&record.url),
        ]);
    }

    sheet.finish()
}

/// Writes one ranked collection to both output formats. Each target succeeds or
/// fails on its own; failures are logged and reported, never returned.
pub struct ResultWriter<S: Storage> {
    storage: S,
}

impl<S: Storage> ResultWriter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn save(
        &self,
        records: &[SeriesRecord],
        csv_name: &str,
        xlsx_name: &str,
    ) -> SaveReport {
        let report = SaveReport {
            csv_path: self.write_target(csv_name, encode_csv(records)).await,
            xlsx_path: self.write_target(xlsx_name, encode_xlsx(records)).await,
        };

        if let (Some(csv_path), Some(xlsx_path)) = (&report.csv_path, &report.xlsx_path) {
            tracing::info!("Saved files: {}, {}", csv_path, xlsx_path);
        }
        report
    }

    async fn write_target(&self, name: &str, encoded: Result<Vec<u8>>) -> Option<String> {
        let path = self.storage.display_path(name);
        let written = match encoded {
            Ok(bytes) => {
                tracing::debug!("Writing {} bytes to {}", bytes.len(), path);
                self.storage.write_file(name, &bytes).await
            }
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => Some(path),
            Err(e) => {
                tracing::error!("Failed to save {}: {}", path, e);
                None
            }
        }
    }
}
