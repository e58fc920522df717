use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::notebook::{NotebookCache, NotebookRenderer};

/// Shared state handed to every request.
#[derive(Clone, Debug)]
pub struct Dashboard {
    pub config: Arc<DashboardConfig>,
    pub renderer: NotebookRenderer,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = NotebookCache::new(config.cache_capacity);
        Self::with_renderer(config, NotebookRenderer::new(cache))
    }

    pub fn with_renderer(config: DashboardConfig, renderer: NotebookRenderer) -> Self {
        Self {
            config: Arc::new(config),
            renderer,
        }
    }
}
