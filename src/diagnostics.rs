//! Developer-facing diagnostics log.
//!
//! Failures the page hides from the user (a broken generation request, a
//! clipboard that refused the text, an unreachable health endpoint, a
//! history delete the backend rejected) are appended here as JSON lines so
//! they can be inspected with `codegen logs`.
//!
//! All writes are best-effort: a log that cannot be written never affects a
//! flow.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{self, schema::DiagnosticsConfig};

/// One entry in the diagnostics log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub timestamp: String,
    /// Flow that produced the entry: `generate`, `copy`, `connection`, `history`.
    pub flow: String,
    pub message: String,
}

/// Handle to the diagnostics log file.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    path: Option<PathBuf>,
}

impl Diagnostics {
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        if config.enabled {
            Self::at(config::expand_home(&config.path))
        } else {
            Self::disabled()
        }
    }

    /// Log to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that drops every entry.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an entry. Errors are swallowed.
    pub fn record(&self, flow: &str, message: &str) {
        let Some(path) = &self.path else {
            return;
        };

        let entry = DiagnosticEntry {
            timestamp: Utc::now().to_rfc3339(),
            flow: flow.to_string(),
            message: message.to_string(),
        };

        let _ = append_entry(path, &entry);
    }

    /// Read every entry, skipping malformed lines.
    pub fn read_all(&self) -> Vec<DiagnosticEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<DiagnosticEntry>(&line).ok())
            .collect()
    }

    /// The last `n` entries, oldest first.
    pub fn read_recent(&self, n: usize) -> Vec<DiagnosticEntry> {
        let mut entries = self.read_all();
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
        entries
    }
}

fn append_entry(path: &Path, entry: &DiagnosticEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
