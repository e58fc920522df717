//! Error taxonomy shared by the listing, notebook, and gallery layers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// A content directory is missing or cannot be read.
    #[error("cannot read directory {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A notebook is missing, unreadable, or not a valid notebook document.
    #[error("cannot parse notebook {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// An image cannot be opened or decoded.
    #[error("cannot render image {}: {reason}", .path.display())]
    Render { path: PathBuf, reason: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("unknown panel: {0}")]
    UnknownPanel(String),
}

impl DashboardError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn render(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Render {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
