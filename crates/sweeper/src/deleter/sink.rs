//! Progress and failure reporting for batch deletes
//!
//! Deleters report every dry-run skip, every successful delete and every
//! failed delete to a [`DeleteSink`]. Failures are reported regardless of
//! whether the batch then continues.

use crate::aws::classify_anyhow_error;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use sweeper_common::{ResourceKind, ResourceName};
use tracing::warn;

/// Receiver for per-resource outcomes of a batch delete
pub trait DeleteSink: Send + Sync {
    /// A delete was skipped because the run is a dry run
    fn dry_run(&self, kind: ResourceKind, name: &ResourceName);

    /// A resource was deleted
    fn deleted(&self, kind: ResourceKind, name: &ResourceName);

    /// A delete call failed with `error`
    fn failed(&self, kind: ResourceKind, name: &ResourceName, error: &anyhow::Error);
}

/// Prefix that marks progress lines of a dry run
const DRY_RUN_PREFIX: &str = "[DRY RUN]";

/// Human-readable progress line for one resource
pub fn progress_line(kind: ResourceKind, name: &ResourceName, dry_run: bool) -> String {
    if dry_run {
        format!("{DRY_RUN_PREFIX} Deleted {} {name}", kind.label())
    } else {
        format!("Deleted {} {name}", kind.label())
    }
}

/// One failed delete, as written to the error log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteErrorRecord {
    pub resource_type: ResourceKind,
    pub resource_name: ResourceName,
    pub error_code: Option<String>,
    pub error_message: String,
}

impl DeleteErrorRecord {
    pub fn new(kind: ResourceKind, name: &ResourceName, error: &anyhow::Error) -> Self {
        let classified = classify_anyhow_error(error);
        Self {
            resource_type: kind,
            resource_name: name.clone(),
            error_code: classified.code().map(|c| c.to_string()),
            error_message: format!("{error:#}"),
        }
    }
}

/// Appends one JSON object per failed delete to a writer
pub struct JsonErrorLog<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonErrorLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Write a single record followed by a newline
    pub fn append(&self, record: &DeleteErrorRecord) -> anyhow::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("error log writer poisoned"))?;
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> DeleteSink for JsonErrorLog<W> {
    fn dry_run(&self, _kind: ResourceKind, _name: &ResourceName) {}

    fn deleted(&self, _kind: ResourceKind, _name: &ResourceName) {}

    fn failed(&self, kind: ResourceKind, name: &ResourceName, error: &anyhow::Error) {
        let record = DeleteErrorRecord::new(kind, name, error);
        if let Err(e) = self.append(&record) {
            warn!(error = ?e, resource_name = %name, "Failed to write error log entry");
        }
    }
}

/// Prints progress lines to stdout and logs failures.
///
/// Failures are optionally also appended to a JSON error log file.
#[derive(Default)]
pub struct ConsoleSink {
    error_log: Option<JsonErrorLog<std::fs::File>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_log(error_log: JsonErrorLog<std::fs::File>) -> Self {
        Self {
            error_log: Some(error_log),
        }
    }
}

impl DeleteSink for ConsoleSink {
    fn dry_run(&self, kind: ResourceKind, name: &ResourceName) {
        println!("{}", progress_line(kind, name, true));
    }

    fn deleted(&self, kind: ResourceKind, name: &ResourceName) {
        println!("{}", progress_line(kind, name, false));
    }

    fn failed(&self, kind: ResourceKind, name: &ResourceName, error: &anyhow::Error) {
        let code = classify_anyhow_error(error).code().map(|c| c.to_string());
        warn!(
            resource_type = %kind,
            resource_name = %name,
            error_code = ?code,
            error = %format!("{error:#}"),
            "Failed to delete"
        );
        if let Some(log) = &self.error_log {
            log.failed(kind, name, error);
        }
    }
}

/// Sink that remembers everything it was told, for tests
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SinkEvent {
    DryRun(ResourceKind, String),
    Deleted(ResourceKind, String),
    Failed(ResourceKind, String, String),
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn deleted_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Deleted(_, name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn failed_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Failed(_, name, _) => Some(name),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl DeleteSink for RecordingSink {
    fn dry_run(&self, kind: ResourceKind, name: &ResourceName) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::DryRun(kind, name.to_string()));
    }

    fn deleted(&self, kind: ResourceKind, name: &ResourceName) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Deleted(kind, name.to_string()));
    }

    fn failed(&self, kind: ResourceKind, name: &ResourceName, error: &anyhow::Error) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Failed(kind, name.to_string(), error.to_string()));
    }
}
