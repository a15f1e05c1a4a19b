//! Stored summaries: the rows of the `summaries` table and the file-name
//! conventions used when uploading transcripts to object storage.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::service::SummarizeResponse;

/// Storage folder that uploaded transcripts live under.
pub const STORAGE_FOLDER: &str = "files";

/// A summary as persisted by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub summary_id: Uuid,
    pub user_id: Uuid,
    /// Original file name with `_{upload millis}` appended
    pub filename_appended: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
}

impl SummaryRecord {
    /// Build the record for a freshly summarized upload.
    pub fn from_response(
        response: &SummarizeResponse,
        user_id: Uuid,
        filename_appended: String,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            summary_id: Uuid::new_v4(),
            user_id,
            filename_appended,
            uploaded_at,
            original_text: Some(response.text.clone()),
            summary: Some(response.summary.clone()),
            word_count: Some(response.word_count),
        }
    }

    /// Summary text as handed to the formatter
    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or_default().trim()
    }

    pub fn original_file_name(&self) -> String {
        original_file_name(&self.filename_appended)
    }

    pub fn storage_path(&self) -> String {
        storage_path(&self.filename_appended)
    }

    pub fn stats(&self) -> SummaryStats {
        SummaryStats {
            file_name: self.original_file_name(),
            word_count: self.word_count.unwrap_or(0),
            date_created: display_date(&self.uploaded_at),
        }
    }
}

/// The headline numbers shown above a summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryStats {
    pub file_name: String,
    pub word_count: u64,
    pub date_created: String,
}

impl SummaryStats {
    pub fn word_count_label(&self) -> String {
        format!("{} words", self.word_count)
    }
}

/// `notes.txt` uploaded at millis `1700000000000` becomes
/// `notes.txt_1700000000000`.
pub fn appended_file_name(file_name: &str, timestamp_ms: i64) -> String {
    format!("{file_name}_{timestamp_ms}")
}

pub fn storage_path(filename_appended: &str) -> String {
    format!("{STORAGE_FOLDER}/{filename_appended}")
}

/// Drop the last `_`-separated segment, which holds the upload timestamp.
pub fn original_file_name(filename_appended: &str) -> String {
    let mut segments: Vec<&str> = filename_appended.split('_').collect();
    segments.pop();
    segments.join("_")
}

/// Dates are shown as `M/D/YYYY` in UTC.
pub fn display_date(date: &DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// An exported set of summary records
#[derive(Debug, Clone, Default)]
pub struct Library {
    records: Vec<SummaryRecord>,
}

impl Library {
    pub fn new(records: Vec<SummaryRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let library = Self::from_json(&json)?;
        log::debug!("loaded {} summaries from {}", library.len(), path.display());
        Ok(library)
    }

    /// Like [`Library::load`], but a missing export is an empty library.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, json).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn insert(&mut self, record: SummaryRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered most recent upload first
    pub fn recent_first(&self) -> Vec<&SummaryRecord> {
        let mut records: Vec<&SummaryRecord> = self.records.iter().collect();
        records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        records
    }

    pub fn find(&self, summary_id: &str) -> Result<&SummaryRecord> {
        let not_found = || Error::SummaryNotFound(summary_id.to_string());
        let wanted = Uuid::parse_str(summary_id.trim()).map_err(|_| not_found())?;
        self.records
            .iter()
            .find(|record| record.summary_id == wanted)
            .ok_or_else(not_found)
    }
}
