use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Outcome, Resolution};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub outcome: Outcome,
    pub confidence: f64,
    pub needs_full_processing: bool,
}

impl UsageRecord {
    pub fn new(query: &str, resolution: &Resolution) -> Self {
        Self {
            timestamp: Utc::now(),
            query: query.to_string(),
            outcome: resolution.outcome,
            confidence: resolution.response.confidence,
            needs_full_processing: resolution.response.needs_full_processing(),
        }
    }
}

pub trait UsageLogger {
    fn record(&self, record: &UsageRecord) -> Result<()>;
}

/// Appends one JSON object per resolved query.
#[derive(Debug, Clone)]
pub struct JsonlUsageLog {
    path: PathBuf,
}

impl JsonlUsageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageLogger for JsonlUsageLog {
    fn record(&self, record: &UsageRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Fire-and-forget: a failing logger is reported and otherwise ignored.
pub fn record_usage<L: UsageLogger + ?Sized>(logger: &L, record: &UsageRecord) {
    if let Err(err) = logger.record(record) {
        tracing::warn!(error = %err, "failed to record usage");
    }
}
