//! HTML rendering of the dashboard page: sidebar plus the selected panel.

use std::fmt::Write;

use crate::error::DashboardError;
use crate::gallery::{Gallery, ImageStatus};
use crate::html::{escape, url_component};
use crate::menu::{MenuSelection, Panel, CONTACT_HEADER, CONTACT_LINES};
use crate::notebook::{RenderedNotebook, NOTEBOOK_VIEWPORT_HEIGHT};

const STYLE: &str = "<style>
body { margin: 0; font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; color: #262730; }
.layout { display: flex; min-height: 100vh; }
.sidebar { flex: 0 0 18rem; background: #f0f2f6; padding: 1.5rem; box-sizing: border-box; }
.sidebar a { display: block; padding: 0.3rem 0; color: inherit; text-decoration: none; }
.sidebar a.active { font-weight: 600; color: #ff4b4b; }
.sidebar select { width: 100%; }
.main { flex: 1; padding: 1.5rem 3rem; min-width: 0; }
.viewer { width: 100%; border: none; overflow: auto; }
.gallery { display: flex; gap: 1rem; }
.gallery-column { flex: 1; min-width: 0; }
.gallery figure { margin: 0 0 1rem 0; }
.gallery img { width: 100%; }
.gallery figcaption { text-align: center; color: #808495; font-size: 0.9rem; }
.error { background: #ffe0e0; color: #7d1a1a; padding: 0.75rem; border-radius: 0.25rem; }
.success { background: #dff5e3; color: #14532d; padding: 0.75rem; border-radius: 0.25rem; }
.feedback textarea { width: 100%; min-height: 8rem; }
</style>
";

/// Render the whole page for `panel`.
pub fn render_page(title: &str, panel: &Panel) -> String {
    let selection = panel.selection();
    let mut sidebar = render_menu(selection);
    if let Panel::Notebooks {
        listing: Ok(names),
        selected,
        ..
    } = panel
    {
        sidebar.push_str(&render_notebook_picker(names, selected.as_deref()));
    }

    let main = match panel {
        Panel::Notebooks {
            listing, viewer, ..
        } => render_notebooks(listing.as_ref().err(), viewer.as_ref()),
        Panel::PlotImages { gallery } => render_gallery(gallery),
        Panel::Feedback { acknowledgment } => render_feedback(*acknowledgment),
        Panel::Contact => render_contact(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n{style}</head>\n<body>\n<div class=\"layout\">\n<nav class=\"sidebar\">\n{sidebar}</nav>\n<main class=\"main\">\n<h1>{title}</h1>\n{main}</main>\n</div>\n</body>\n</html>\n",
        title = escape(title),
        style = STYLE,
        sidebar = sidebar,
        main = main,
    )
}

fn render_menu(active: MenuSelection) -> String {
    let mut out = String::from("<h2>Explore</h2>\n<p>Select an Option:</p>\n");
    for entry in MenuSelection::ALL {
        let class = if entry == active { " class=\"active\"" } else { "" };
        let _ = writeln!(
            out,
            "<a href=\"/?choice={}\"{}>{}</a>",
            entry.slug(),
            class,
            escape(entry.label())
        );
    }
    out
}

fn render_notebook_picker(names: &[String], selected: Option<&str>) -> String {
    let mut out = format!(
        "<form method=\"get\" action=\"/\" class=\"picker\">\n<input type=\"hidden\" name=\"choice\" value=\"{}\">\n<label for=\"notebook\">Choose a Notebook:</label>\n<select id=\"notebook\" name=\"notebook\" onchange=\"this.form.submit()\">\n",
        MenuSelection::Notebooks.slug()
    );
    for name in names {
        let marker = if Some(name.as_str()) == selected {
            " selected"
        } else {
            ""
        };
        let escaped = escape(name);
        let _ = writeln!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            escaped, marker, escaped
        );
    }
    out.push_str("</select>\n<noscript><button type=\"submit\">Open</button></noscript>\n</form>\n");
    out
}

fn render_notebooks(
    listing_error: Option<&DashboardError>,
    viewer: Option<&Result<RenderedNotebook, DashboardError>>,
) -> String {
    if let Some(e) = listing_error {
        return error_box(e);
    }

    match viewer {
        None => "<p>No notebooks available.</p>\n".to_string(),
        Some(Err(e)) => error_box(e),
        Some(Ok(notebook)) => format!(
            "<iframe class=\"viewer\" title=\"{}\" height=\"{}\" scrolling=\"yes\" srcdoc=\"{}\"></iframe>\n",
            escape(&notebook.name),
            NOTEBOOK_VIEWPORT_HEIGHT,
            escape(&notebook.body)
        ),
    }
}

fn render_gallery(gallery: &Result<Gallery, DashboardError>) -> String {
    let mut out = String::from("<h2>Visualizations</h2>\n");
    let gallery = match gallery {
        Ok(gallery) => gallery,
        Err(e) => {
            out.push_str(&error_box(e));
            return out;
        }
    };

    out.push_str("<div class=\"gallery\">\n");
    for column in &gallery.columns {
        out.push_str("<div class=\"gallery-column\">\n");
        for item in column {
            let caption = escape(&item.name);
            match &item.status {
                ImageStatus::Ready { width, height } => {
                    let _ = writeln!(
                        out,
                        "<figure><img src=\"/images/{}\" alt=\"{}\" width=\"{}\" height=\"{}\" style=\"width:100%;height:auto\"><figcaption>{}</figcaption></figure>",
                        url_component(&item.name),
                        caption,
                        width,
                        height,
                        caption
                    );
                }
                ImageStatus::Failed { error } => {
                    let _ = writeln!(
                        out,
                        "<figure><div class=\"error\">{}</div><figcaption>{}</figcaption></figure>",
                        escape(error),
                        caption
                    );
                }
            }
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
    out
}

fn render_feedback(acknowledgment: Option<&str>) -> String {
    let mut out = String::from(
        "<h2>Provide Your Feedback</h2>\n<form method=\"post\" action=\"/feedback\" class=\"feedback\">\n<label for=\"feedback\">How can we improve this dashboard?</label>\n<textarea id=\"feedback\" name=\"feedback\"></textarea>\n<button type=\"submit\">Submit Feedback</button>\n</form>\n",
    );
    if let Some(message) = acknowledgment {
        let _ = writeln!(out, "<div class=\"success\">{}</div>", escape(message));
    }
    out
}

fn render_contact() -> String {
    let mut out = format!("<h2>{}</h2>\n", escape(CONTACT_HEADER));
    for line in CONTACT_LINES {
        let _ = writeln!(out, "<p>{}</p>", escape(line));
    }
    out
}

fn error_box(e: &DashboardError) -> String {
    format!("<div class=\"error\">{}</div>\n", escape(&e.to_string()))
}
