use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Environment variable that overrides `service.backend_url`.
pub const BACKEND_URL_ENV: &str = "TSB_BACKEND_URL";

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub indent_class: String,
    pub indent: String,
    pub spacer: String,
    pub text_indent: usize,
    pub bullet: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_class: "indented".to_string(),
            indent: "1.75em".to_string(),
            spacer: "1.25em".to_string(),
            text_indent: 4,
            bullet: "•".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub backend_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

impl Config {
    /// The defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return the compiled defaults if it
    /// does not exist. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `TSB_BACKEND_URL` if it is set.
    pub fn with_env(self) -> Self {
        self.with_backend_override(std::env::var(BACKEND_URL_ENV).ok())
    }

    pub fn with_backend_override(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|url| !url.trim().is_empty()) {
            self.service.backend_url = url;
        }
        self
    }
}
