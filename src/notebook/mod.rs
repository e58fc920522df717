//! Notebook loading, HTML export, and memoization.
//!
//! [`NotebookRenderer`] reads a notebook from disk, parses it into the
//! [`document`] model, exports it with [`export::to_html`], and keeps the
//! result in an injected [`NotebookCache`]. Cached bodies are never
//! re-validated against the file on disk.

pub mod cache;
pub mod document;
pub mod export;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;

pub use cache::{NotebookCache, DEFAULT_CACHE_CAPACITY};
pub use document::Notebook;

use crate::error::{DashboardError, Result};

/// Height in CSS pixels of the scrollable viewport a notebook is shown in.
pub const NOTEBOOK_VIEWPORT_HEIGHT: u32 = 1000;

/// A converted notebook ready for embedding.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNotebook {
    pub name: String,
    #[serde(skip)]
    pub path: PathBuf,
    pub body: Arc<str>,
    /// Whether the body came from the cache rather than a fresh conversion.
    pub cached: bool,
}

/// Per-path slots for conversions in progress.
type InFlight = Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>;

#[derive(Clone, Debug)]
pub struct NotebookRenderer {
    cache: NotebookCache,
    in_flight: InFlight,
    conversions: Arc<AtomicUsize>,
}

impl NotebookRenderer {
    pub fn new(cache: NotebookCache) -> Self {
        Self {
            cache,
            in_flight: Arc::default(),
            conversions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn cache(&self) -> &NotebookCache {
        &self.cache
    }

    /// Number of conversions performed (cache misses that succeeded).
    pub fn conversions(&self) -> usize {
        self.conversions.load(Ordering::Relaxed)
    }

    /// Render the notebook at `path`, converting it at most once while it
    /// stays cached.
    ///
    /// Requests for the same path wait on that path's slot; cache hits and
    /// conversions of other paths never wait.
    pub fn render(&self, path: &Path) -> Result<RenderedNotebook> {
        if let Some(body) = self.cache.get(path) {
            tracing::debug!("Notebook cache hit for {}", path.display());
            return Ok(rendered(path, body, true));
        }

        let slot = self.slot(path);
        let _converting = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another request may have finished this path while we waited.
        let result = match self.cache.get(path) {
            Some(body) => Ok(rendered(path, body, true)),
            None => convert(path).map(|html| {
                let body: Arc<str> = Arc::from(html);
                self.conversions.fetch_add(1, Ordering::Relaxed);
                self.cache.insert(path.to_path_buf(), body.clone());
                rendered(path, body, false)
            }),
        };

        self.release_slot(path, &slot);
        result
    }

    fn slot(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.entry(path.to_path_buf()).or_default().clone()
    }

    fn release_slot(&self, path: &Path, slot: &Arc<Mutex<()>>) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if in_flight
            .get(path)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            in_flight.remove(path);
        }
    }
}

fn rendered(path: &Path, body: Arc<str>, cached: bool) -> RenderedNotebook {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    RenderedNotebook {
        name,
        path: path.to_path_buf(),
        body,
        cached,
    }
}

impl Default for NotebookRenderer {
    fn default() -> Self {
        Self::new(NotebookCache::default())
    }
}

/// Read, parse, and export a notebook without touching any cache.
pub fn convert(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| DashboardError::parse(path, e))?;
    let notebook = Notebook::from_json(&text).map_err(|reason| {
        tracing::warn!("Malformed notebook {}: {}", path.display(), reason);
        DashboardError::parse(path, reason)
    })?;

    tracing::info!(
        "Converted notebook {} ({} cells)",
        path.display(),
        notebook.cells.len()
    );
    Ok(export::to_html(&notebook))
}
