//! Dashboard server for browsing precomputed Jupyter notebooks and plot
//! images.
//!
//! The sidebar offers four panels (see [`menu::MenuSelection`]). Notebooks
//! are converted to HTML by [`notebook::NotebookRenderer`] and cached per
//! path; plot images are laid out by [`gallery`] in two columns.

pub mod api;
pub mod config;
pub mod error;
pub mod gallery;
pub mod html;
pub mod listing;
pub mod menu;
pub mod notebook;
pub mod page;
pub mod state;

pub use error::DashboardError;
pub use state::Dashboard;
