use crate::error::Result;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of the history file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: Option<NaiveDateTime>,
    pub command: String,
    pub detail: String,
}

impl HistoryEntry {
    /// Parse `[YYYY-MM-DD HH:MM:SS] <command> <detail>`. Lines that don't
    /// match keep their full text in `detail`.
    pub fn parse(line: &str) -> Self {
        let parsed = line.strip_prefix('[').and_then(|rest| {
            let (stamp, tail) = rest.split_once("] ")?;
            let ts = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
            let (command, detail) = tail.split_once(' ').unwrap_or((tail, ""));
            Some(Self {
                timestamp: Some(ts),
                command: command.to_string(),
                detail: detail.to_string(),
            })
        });
        parsed.unwrap_or_else(|| Self {
            timestamp: None,
            command: String::new(),
            detail: line.to_string(),
        })
    }
}

/// Append-only command log, one line per invocation.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, command: &str, detail: &str) -> Result<()> {
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        let line = format!("[{stamp}] {command} {detail}\n");
        crate::io::append_text(&self.path, &line)
    }

    /// Raw file contents, or `None` if nothing has been recorded yet.
    pub fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        let text = self.read()?.unwrap_or_default();
        Ok(text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(HistoryEntry::parse)
            .collect())
    }
}

/// Record to `history` if one is configured. Failures are logged, never fatal.
pub fn record_quietly(history: Option<&History>, command: &str, detail: &str) {
    let Some(history) = history else {
        return;
    };
    if let Err(e) = history.record(command, detail) {
        tracing::warn!(
            path = %history.path().display(),
            error = %e,
            "failed to write history entry"
        );
    }
}
