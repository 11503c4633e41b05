//! Date-partitioned JSONL receipts of what the CLIs sent and got back

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LISTINGS: &str = "listings";
pub const PREFERENCES: &str = "preferences";

pub fn receipt_path(data_dir: &str, kind: &str, date: NaiveDate) -> PathBuf {
    Path::new(data_dir)
        .join(kind)
        .join(format!("date={}", date.format("%Y-%m-%d")))
        .join(format!("{}.jsonl", kind))
}

/// Appends one record under today's partition.
pub fn append_jsonl<T: Serialize>(data_dir: &str, kind: &str, record: &T) -> Result<PathBuf> {
    append_jsonl_on(data_dir, kind, Utc::now().date_naive(), record)
}

pub fn append_jsonl_on<T: Serialize>(
    data_dir: &str,
    kind: &str,
    date: NaiveDate,
    record: &T,
) -> Result<PathBuf> {
    let path = receipt_path(data_dir, kind, date);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let json = serde_json::to_string(record)?;
    writeln!(file, "{}", json)?;

    tracing::info!("Appended {} receipt to {:?}", kind, path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_append_partitions_by_date() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().to_str().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let path = append_jsonl_on(data_dir, LISTINGS, date, &json!({"house_id": 1})).unwrap();
        append_jsonl_on(data_dir, LISTINGS, date, &json!({"house_id": 2})).unwrap();

        assert!(path.ends_with("listings/date=2026-03-14/listings.jsonl"));
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["house_id"], 2);
    }

    #[test]
    fn test_kinds_use_separate_files() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().to_str().unwrap();

        let listing = append_jsonl(data_dir, LISTINGS, &json!({"house_id": 1})).unwrap();
        let prefs = append_jsonl(data_dir, PREFERENCES, &json!({"min_lot_area": 500})).unwrap();
        assert_ne!(listing, prefs);
        assert!(prefs.exists());
    }
}
