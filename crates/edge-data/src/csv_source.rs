//! CSV bar source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use edge_core::error::DataError;
use edge_core::traits::BarSource;
use edge_core::types::Bar;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "timestamp",
        alias = "Timestamp",
        alias = "time",
        alias = "Datetime"
    )]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// CSV file of OHLCV bars.
///
/// Rows are returned in file order. Naive date/time strings are read as
/// local time at `naive_offset_minutes` from UTC (UTC by default); Unix
/// timestamps and RFC 3339 strings carry their own zone.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
    naive_offset_minutes: i32,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            naive_offset_minutes: 0,
        })
    }

    /// Interpret naive timestamps as local time at this offset from UTC.
    pub fn with_naive_offset(mut self, utc_offset_minutes: i32) -> Self {
        self.naive_offset_minutes = utc_offset_minutes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse bars from CSV text.
    fn parse(&self, content: &str) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut bars = Vec::new();

        for (row, result) in reader.deserialize().enumerate() {
            let record: CsvRecord = result
                .map_err(|e| DataError::ParseError(format!("row {}: {}", row + 1, e)))?;

            let timestamp = parse_timestamp(&record.date, self.naive_offset_minutes)?;

            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        Ok(bars)
    }
}

#[async_trait]
impl BarSource for CsvDataSource {
    async fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DataError::Io(format!("{}: {}", self.path.display(), e)))?;

        let bars = self.parse(&content)?;
        debug!(symbol, path = %self.path.display(), count = bars.len(), "loaded bars");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str, naive_offset_minutes: i32) -> Result<i64, DataError> {
    let date_str = date_str.trim();
    let offset_ms = i64::from(naive_offset_minutes) * 60_000;

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis() - offset_ms);
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for format in date_formats {
        let midnight = NaiveDate::parse_from_str(date_str, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
        if let Some(dt) = midnight {
            return Ok(dt.and_utc().timestamp_millis() - offset_ms);
        }
    }

    // Unix timestamp; more than 10 digits means milliseconds
    if let Ok(ts) = date_str.parse::<i64>() {
        return if ts.abs() > 10_000_000_000 {
            Ok(ts)
        } else {
            Ok(ts * 1000)
        };
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let file = format!("edge-data-{}-{}.csv", name, std::process::id());
        let path = std::env::temp_dir().join(file);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_timestamp() {
        // 2024-01-15 10:30:00 UTC
        let expected = 1_705_314_600_000;
        assert_eq!(parse_timestamp("2024-01-15 10:30:00", 0).unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15T10:30:00", 0).unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15T10:30:00Z", 0).unwrap(), expected);
        assert_eq!(parse_timestamp("1705314600000", 0).unwrap(), expected);
        assert_eq!(parse_timestamp("1705314600", 0).unwrap(), expected);
        assert!(parse_timestamp("2024-01-15", 0).is_ok());
        assert!(parse_timestamp("yesterday", 0).is_err());
    }

    #[test]
    fn test_naive_offset() {
        // 09:30 in New York is 14:30 UTC
        let ts = parse_timestamp("2024-01-02 09:30:00", -300).unwrap();
        assert_eq!(ts, 1_704_205_800_000);

        // explicit zones ignore the offset
        let ts = parse_timestamp("2024-01-02T14:30:00+00:00", -300).unwrap();
        assert_eq!(ts, 1_704_205_800_000);
    }

    #[test]
    fn test_missing_file() {
        let result = CsvDataSource::new("/definitely/not/here.csv");
        assert!(matches!(result, Err(DataError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_keeps_file_order() {
        let path = write_temp(
            "order",
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-02 09:31:00,101,102,100,101.5,1200\n\
             2024-01-02 09:30:00,100,101,99,100.5,1000\n",
        );
        let source = CsvDataSource::new(&path).unwrap();
        let bars = source.load_bars("SPY").await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp > bars[1].timestamp);
        assert!((bars[0].close - 101.5).abs() < 1e-10);
        assert!((bars[1].volume - 1000.0).abs() < 1e-10);
        assert_eq!(source.name(), "csv");
    }

    #[tokio::test]
    async fn test_lowercase_headers_and_missing_volume() {
        let path = write_temp(
            "lower",
            "timestamp,open,high,low,close\n\
             1704205800000,100,101,99,100.5\n",
        );
        let source = CsvDataSource::new(&path).unwrap();
        let bars = source.load_bars("SPY").await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].timestamp, 1_704_205_800_000);
        assert_eq!(bars[0].volume, 0.0);
    }

    #[tokio::test]
    async fn test_bad_row_reports_parse_error() {
        let path = write_temp(
            "bad",
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-02,abc,101,99,100,1000\n",
        );
        let source = CsvDataSource::new(&path).unwrap();
        let result = source.load_bars("SPY").await;
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(DataError::ParseError(_))));
    }
}
