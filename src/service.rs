//! Client for the external summarization service.
//!
//! The service accepts one PDF or plain-text upload at `POST /upload` and
//! answers with the extracted text, its word count and a generated summary.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::info;
use reqwest::blocking::{Client, multipart};
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::error::{Error, Result};

const UPLOAD_FIELD: &str = "file";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Body returned by `POST /upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub file_name: String,
    pub text: String,
    pub word_count: u64,
    pub summary: String,
    #[serde(default)]
    pub status: String,
}

/// MIME type for an upload, from its extension. Only PDF and plain text are
/// accepted.
pub fn mime_type(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => Ok("application/pdf"),
        Some("txt") => Ok("text/plain"),
        _ => Err(Error::UnsupportedFileType(path.display().to_string())),
    }
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub struct SummarizerClient {
    backend_url: String,
    http: Client,
}

impl SummarizerClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            backend_url: config.backend_url.clone(),
            http,
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.backend_url.trim_end_matches('/'))
    }

    /// Upload a transcript and return the service's summary of it.
    pub fn summarize(&self, path: &Path) -> Result<SummarizeResponse> {
        let mime = mime_type(path)?;
        let bytes = fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!(
            "sending {} ({} bytes, {}) to {}",
            file_name,
            bytes.len(),
            mime,
            self.upload_url()
        );

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self.http.post(self.upload_url()).multipart(form).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                body,
            });
        }

        let summary: SummarizeResponse = response.json()?;
        info!(
            "received summary for {} ({} words)",
            summary.file_name, summary.word_count
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("call.pdf", "application/pdf")]
    #[case("CALL.PDF", "application/pdf")]
    #[case("notes/standup.txt", "text/plain")]
    fn accepted_uploads(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(mime_type(Path::new(path)).unwrap(), expected);
    }

    #[rstest]
    #[case("slides.docx")]
    #[case("README")]
    #[case("archive.txt.gz")]
    fn rejected_uploads(#[case] path: &str) {
        assert!(matches!(
            mime_type(Path::new(path)),
            Err(Error::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn counts_words() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  one\ttwo\n\nthree  "), 3);
    }

    #[test]
    fn upload_url_ignores_trailing_slash() {
        let config = ServiceConfig {
            backend_url: "https://tsb.example/api/".to_string(),
        };
        let client = SummarizerClient::new(&config).unwrap();
        assert_eq!(client.upload_url(), "https://tsb.example/api/upload");
    }

    #[test]
    fn unsupported_file_is_rejected_before_upload() {
        let client = SummarizerClient::new(&ServiceConfig::default()).unwrap();
        let err = client
            .summarize(&PathBuf::from("does-not-exist.docx"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }

    #[test]
    fn decodes_service_response() {
        let json = r#"{
            "file_name": "call.txt",
            "text": "We agreed to ship on Friday.",
            "word_count": 6,
            "summary": "**Decision**\n- Ship Friday",
            "status": "File uploaded, parsed, and summarized successfully"
        }"#;
        let response: SummarizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.word_count, 6);
        assert_eq!(response.word_count as usize, word_count(&response.text));
        assert_eq!(crate::format(&response.summary).len(), 2);
    }
}
