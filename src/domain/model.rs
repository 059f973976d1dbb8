use std::collections::HashMap;

/// Placeholder for fields a source did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Raw API item, kept as the decoded JSON object.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn from_object(obj: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: obj.into_iter().collect(),
        }
    }
}

/// Field texts read from one row of the chart page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedRow {
    pub rank: usize,
    pub title: String,
    pub year: String,
    pub rating: String,
    pub genres: Vec<String>,
    pub url: Option<String>,
}

/// Canonical output row shared by both sources.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub title: String,
    pub year: String,
    pub rating: f64,
    pub genres: String,
    pub url: String,
}

impl SeriesRecord {
    pub const COLUMNS: [&'static str; 5] = ["title", "year", "rating", "genres", "url"];

    /// Rating as written to text outputs; whole numbers keep one decimal ("9.0").
    pub fn rating_text(&self) -> String {
        format!("{:?}", self.rating)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.title, self.year, self.rating, self.genres
        )
    }
}

/// Where each output target ended up. `None` means that write failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub csv_path: Option<String>,
    pub xlsx_path: Option<String>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.csv_path.is_some() && self.xlsx_path.is_some()
    }
}
