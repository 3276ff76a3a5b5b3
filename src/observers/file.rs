//! Append-only outcome file.
//!
//! # Record layouts
//! ```text
//! text: <rfc3339 timestamp> <source:>15> <destination:>15> <code:>15> <elapsed ms:>10.1>
//! json: {"timestamp":...,"source":...,"destination":...,"result":...,"code":...,"elapsed_ms":...}
//! ```
//! Codes: 0 success, 1 timeout, 2 other failure.

use std::fs::OpenOptions;
use std::path::PathBuf;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::check::{Outcome, OutcomeReceiver, ResultKind};
use crate::config::FileFormat;
use crate::observers::{Observer, ObserverError};

#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp: DateTime<Utc>,
    source: &'a str,
    destination: &'a str,
    result: ResultKind,
    code: u8,
    elapsed_ms: f64,
}

/// Render one outcome as a newline-terminated record.
pub fn format_record(outcome: &Outcome, format: FileFormat) -> Result<String, serde_json::Error> {
    match format {
        FileFormat::Text => Ok(format!(
            "{} {:>15} {:>15} {:>15} {:>10.1}\n",
            outcome.observed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            outcome.source,
            outcome.destination,
            outcome.result.code(),
            outcome.elapsed_ms()
        )),
        FileFormat::Json => {
            let record = JsonRecord {
                timestamp: outcome.observed_at,
                source: &outcome.source,
                destination: &outcome.destination,
                result: outcome.result,
                code: outcome.result.code(),
                elapsed_ms: outcome.elapsed_ms(),
            };
            let mut line = serde_json::to_string(&record)?;
            line.push('\n');
            Ok(line)
        }
    }
}

/// Appends one record per outcome to a file.
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
    file: std::fs::File,
    format: FileFormat,
}

impl FileWriter {
    /// Open (or create) the output file in append mode.
    pub fn open(path: impl Into<PathBuf>, format: FileFormat) -> Result<Self, ObserverError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ObserverError::OpenFile {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(path = %path.display(), format = ?format, "Outcome file opened");
        Ok(Self { path, file, format })
    }
}

#[async_trait]
impl Observer for FileWriter {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn consume(self: Box<Self>, mut outcomes: OutcomeReceiver) {
        let FileWriter { path, file, format } = *self;
        let mut file = File::from_std(file);

        while let Some(outcome) = outcomes.recv().await {
            let record = match format_record(&outcome, format) {
                Ok(record) => record,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode outcome record");
                    continue;
                }
            };

            if let Err(e) = file.write_all(record.as_bytes()).await {
                tracing::error!(path = %path.display(), error = %e, "Failed to write outcome record");
                continue;
            }
            if let Err(e) = file.flush().await {
                tracing::error!(path = %path.display(), error = %e, "Failed to flush outcome file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use chrono::TimeZone;
    use tokio::sync::mpsc;

    fn outcome() -> Outcome {
        Outcome {
            source: "node-1".into(),
            destination: "a".into(),
            result: ResultKind::Timeout,
            elapsed: Duration::from_micros(10_400),
            observed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_text_record_layout() {
        let line = format_record(&outcome(), FileFormat::Text).unwrap();
        assert_eq!(
            line,
            format!(
                "2024-05-01T12:30:00Z {:>15} {:>15} {:>15} {:>10}\n",
                "node-1", "a", "1", "10.4"
            )
        );
    }

    #[test]
    fn test_json_record_fields() {
        let line = format_record(&outcome(), FileFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["source"], "node-1");
        assert_eq!(value["destination"], "a");
        assert_eq!(value["result"], "timeout");
        assert_eq!(value["code"], 1);
        assert_eq!(value["timestamp"], "2024-05-01T12:30:00Z");
    }

    #[tokio::test]
    async fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        std::fs::write(&path, "existing\n").unwrap();

        let writer = Box::new(FileWriter::open(&path, FileFormat::Text).unwrap());
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(writer.consume(rx));

        tx.send(Arc::new(outcome())).await.unwrap();
        tx.send(Arc::new(outcome())).await.unwrap();
        drop(tx);
        task.await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing");
        assert!(lines[1].starts_with("2024-05-01T12:30:00Z"));
    }
}
