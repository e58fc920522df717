//! Sidebar menu and panel dispatch.
//!
//! Every request re-runs [`dispatch`] from scratch; nothing about the
//! previous selection is remembered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::gallery::{load_gallery, Gallery, GALLERY_COLUMNS};
use crate::listing::{list_notebooks, resolve_listed};
use crate::notebook::RenderedNotebook;
use crate::state::Dashboard;

pub const FEEDBACK_ACKNOWLEDGMENT: &str = "Thank you for your feedback!";

pub const CONTACT_HEADER: &str = "Contact Information";
pub const CONTACT_LINES: &[&str] = &[
    "If you have any questions or need further assistance, please contact us:",
    "- Email: your_email@example.com",
    "- Phone: +234 123 456 7890",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MenuSelection {
    #[default]
    Notebooks,
    PlotImages,
    Feedback,
    Contact,
}

impl MenuSelection {
    /// Menu entries in sidebar order.
    pub const ALL: [MenuSelection; 4] = [
        MenuSelection::Notebooks,
        MenuSelection::PlotImages,
        MenuSelection::Feedback,
        MenuSelection::Contact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuSelection::Notebooks => "Notebooks",
            MenuSelection::PlotImages => "Plot Images",
            MenuSelection::Feedback => "Feedback",
            MenuSelection::Contact => "Contact",
        }
    }

    /// Value used for this entry in the `choice` query parameter.
    pub fn slug(self) -> &'static str {
        match self {
            MenuSelection::Notebooks => "notebooks",
            MenuSelection::PlotImages => "plot-images",
            MenuSelection::Feedback => "feedback",
            MenuSelection::Contact => "contact",
        }
    }
}

impl fmt::Display for MenuSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MenuSelection {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notebooks" => Ok(MenuSelection::Notebooks),
            "plot-images" | "plot_images" | "plot images" | "images" => {
                Ok(MenuSelection::PlotImages)
            }
            "feedback" => Ok(MenuSelection::Feedback),
            "contact" => Ok(MenuSelection::Contact),
            _ => Err(DashboardError::UnknownPanel(s.to_string())),
        }
    }
}

/// The content of one panel, ready to be rendered.
///
/// Failures are kept inside the panel so the rest of the page still renders.
#[derive(Debug)]
pub enum Panel {
    Notebooks {
        listing: Result<Vec<String>>,
        selected: Option<String>,
        viewer: Option<Result<RenderedNotebook>>,
    },
    PlotImages {
        gallery: Result<Gallery>,
    },
    Feedback {
        acknowledgment: Option<&'static str>,
    },
    Contact,
}

impl Panel {
    pub fn selection(&self) -> MenuSelection {
        match self {
            Panel::Notebooks { .. } => MenuSelection::Notebooks,
            Panel::PlotImages { .. } => MenuSelection::PlotImages,
            Panel::Feedback { .. } => MenuSelection::Feedback,
            Panel::Contact => MenuSelection::Contact,
        }
    }
}

/// Build the panel for `selection`.
///
/// `notebook` is the picker value; when absent the first listed notebook is
/// shown, and an empty folder shows nothing.
pub fn dispatch(dashboard: &Dashboard, selection: MenuSelection, notebook: Option<&str>) -> Panel {
    tracing::debug!("Dispatching panel {}", selection);
    match selection {
        MenuSelection::Notebooks => notebooks_panel(dashboard, notebook),
        MenuSelection::PlotImages => Panel::PlotImages {
            gallery: load_gallery(&dashboard.config.images_dir, GALLERY_COLUMNS),
        },
        MenuSelection::Feedback => Panel::Feedback {
            acknowledgment: None,
        },
        MenuSelection::Contact => Panel::Contact,
    }
}

fn notebooks_panel(dashboard: &Dashboard, notebook: Option<&str>) -> Panel {
    let dir = &dashboard.config.notebooks_dir;
    let listing = list_notebooks(dir);

    let (selected, viewer) = match &listing {
        Ok(names) => {
            let selected = notebook
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .or_else(|| names.first().cloned());
            let viewer = selected.as_deref().map(|name| {
                resolve_listed(dir, name, names).and_then(|path| dashboard.renderer.render(&path))
            });
            (selected, viewer)
        }
        Err(_) => (None, None),
    };

    if let Some(Err(e)) = &viewer {
        tracing::warn!("Notebook viewer failed: {}", e);
    }

    Panel::Notebooks {
        listing,
        selected,
        viewer,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackInput {
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    pub message: String,
}

/// Accept a feedback submission.
///
/// The text is dropped here; it is neither stored nor logged, and the
/// acknowledgment is the same whatever was submitted.
pub fn submit_feedback(_input: FeedbackInput) -> FeedbackReceipt {
    tracing::info!("Feedback submitted");
    FeedbackReceipt {
        message: FEEDBACK_ACKNOWLEDGMENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slugs_and_labels() {
        for selection in MenuSelection::ALL {
            assert_eq!(selection.slug().parse::<MenuSelection>().unwrap(), selection);
            assert_eq!(selection.label().parse::<MenuSelection>().unwrap(), selection);
        }
        assert_eq!(
            "PLOT_IMAGES".parse::<MenuSelection>().unwrap(),
            MenuSelection::PlotImages
        );
    }

    #[test]
    fn rejects_unknown_panels() {
        assert!(matches!(
            "settings".parse::<MenuSelection>(),
            Err(DashboardError::UnknownPanel(ref s)) if s == "settings"
        ));
    }

    #[test]
    fn defaults_to_notebooks() {
        assert_eq!(MenuSelection::default(), MenuSelection::Notebooks);
    }

    #[test]
    fn feedback_receipt_ignores_content() {
        let a = submit_feedback(FeedbackInput {
            feedback: "More charts please".to_string(),
        });
        let b = submit_feedback(FeedbackInput {
            feedback: "x".repeat(10_000),
        });
        assert_eq!(a, b);
        assert_eq!(a.message, FEEDBACK_ACKNOWLEDGMENT);
    }

    #[test]
    fn panel_reports_its_selection() {
        assert_eq!(Panel::Contact.selection(), MenuSelection::Contact);
        assert_eq!(
            Panel::Feedback {
                acknowledgment: None
            }
            .selection(),
            MenuSelection::Feedback
        );
    }
}
