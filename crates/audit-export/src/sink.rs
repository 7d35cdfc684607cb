//! Delivery sinks for rendered exports.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::info;

use crate::error::ExportResult;

/// A fully encoded export ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedExport {
    pub content: String,
    pub filename: String,
    pub mime_type: String,
}

/// Where a delivered export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub location: String,
    pub bytes: usize,
}

/// Destination for encoded exports.
#[cfg_attr(test, mockall::automock)]
pub trait ExportSink: Send + Sync {
    fn deliver(&self, export: &RenderedExport) -> ExportResult<Delivery>;
}

/// Writes each export as a file under a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&self, export: &RenderedExport) -> ExportResult<Delivery> {
        fs::create_dir_all(&self.dir)?;

        // Keep the write inside the sink directory.
        let name = Path::new(&export.filename)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "export".into());
        let path = self.dir.join(name);
        fs::write(&path, export.content.as_bytes())?;

        info!(
            path = %path.display(),
            bytes = export.content.len(),
            mime_type = %export.mime_type,
            "Export written"
        );

        Ok(Delivery {
            location: path.display().to_string(),
            bytes: export.content.len(),
        })
    }
}

/// Keeps delivered exports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<RenderedExport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    pub fn delivered(&self) -> Vec<RenderedExport> {
        self.delivered.lock().clone()
    }

    /// Drain delivered exports.
    pub fn take(&self) -> Vec<RenderedExport> {
        std::mem::take(&mut *self.delivered.lock())
    }
}

impl ExportSink for MemorySink {
    fn deliver(&self, export: &RenderedExport) -> ExportResult<Delivery> {
        let mut delivered = self.delivered.lock();
        delivered.push(export.clone());
        Ok(Delivery {
            location: format!("memory:{}", delivered.len() - 1),
            bytes: export.content.len(),
        })
    }
}
