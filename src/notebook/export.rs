//! HTML export of a parsed notebook.
//!
//! The output is a self-contained body (styles inline, images as `data:`
//! URIs) suitable for embedding in an iframe.

use pulldown_cmark::{html::push_html, Options, Parser};

use super::document::{Cell, MimeBundle, Notebook, Output};
use crate::html::escape;

/// Mime types in the order they are preferred for display.
const MIME_PREFERENCE: &[&str] = &[
    "text/html",
    "image/svg+xml",
    "image/png",
    "image/jpeg",
    "text/markdown",
    "text/plain",
];

const STYLE: &str = "<style>
.nb-notebook { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; font-size: 14px; line-height: 1.5; margin: 0 auto; max-width: 1100px; }
.nb-cell { display: flex; margin: 0.5em 0; }
.nb-prompt { flex: 0 0 6em; color: #303f9f; font-family: monospace; text-align: right; padding-right: 0.5em; }
.nb-prompt.nb-out { color: #d84315; }
.nb-body { flex: 1; min-width: 0; }
.nb-source { background: #f7f7f7; border: 1px solid #cfcfcf; border-radius: 2px; padding: 0.4em; overflow-x: auto; margin: 0; }
.nb-output { overflow-x: auto; }
.nb-output pre { margin: 0.2em 0; }
.nb-stderr { background: #fdd; }
.nb-error { background: #fdd; color: #a00; }
.nb-output img { max-width: 100%; }
</style>
";

/// Convert a notebook into an HTML body.
pub fn to_html(notebook: &Notebook) -> String {
    let mut out = String::from(STYLE);

    out.push_str("<div class=\"nb-notebook\"");
    if let Some(language) = notebook.language() {
        out.push_str(&format!(" data-language=\"{}\"", escape(language)));
    }
    if let Some(kernel) = &notebook.metadata.kernelspec {
        if !kernel.display_name.is_empty() {
            out.push_str(&format!(" data-kernel=\"{}\"", escape(&kernel.display_name)));
        }
    }
    out.push_str(">\n");

    for cell in &notebook.cells {
        render_cell(&mut out, cell);
    }

    out.push_str("</div>\n");
    out
}

fn render_cell(out: &mut String, cell: &Cell) {
    match cell {
        Cell::Markdown { source } => {
            out.push_str("<div class=\"nb-cell nb-markdown\"><div class=\"nb-prompt\"></div><div class=\"nb-body\">");
            out.push_str(&markdown_to_html(source.as_str()));
            out.push_str("</div></div>\n");
        }
        Cell::Raw { source } => {
            out.push_str("<div class=\"nb-cell nb-raw\"><div class=\"nb-prompt\"></div><div class=\"nb-body\"><pre>");
            out.push_str(&escape(source.as_str()));
            out.push_str("</pre></div></div>\n");
        }
        Cell::Code {
            source,
            execution_count,
            outputs,
        } => {
            out.push_str("<div class=\"nb-cell nb-code\">");
            out.push_str(&format!(
                "<div class=\"nb-prompt\">In [{}]:</div>",
                prompt_number(*execution_count)
            ));
            out.push_str("<div class=\"nb-body\"><pre class=\"nb-source\">");
            out.push_str(&escape(source.as_str()));
            out.push_str("</pre></div></div>\n");

            for output in outputs {
                render_output(out, output);
            }
        }
    }
}

fn render_output(out: &mut String, output: &Output) {
    let (prompt, body) = match output {
        Output::Stream { name, text } => (
            String::new(),
            format!(
                "<pre class=\"nb-stream nb-{}\">{}</pre>",
                escape(name),
                escape(text.as_str())
            ),
        ),
        Output::ExecuteResult {
            execution_count,
            data,
        } => (
            format!("Out [{}]:", prompt_number(*execution_count)),
            render_mime_bundle(data),
        ),
        Output::DisplayData { data } => (String::new(), render_mime_bundle(data)),
        Output::Error {
            ename,
            evalue,
            traceback,
        } => {
            let mut body = format!(
                "<pre class=\"nb-error\"><strong>{}: {}</strong>",
                escape(ename),
                escape(evalue)
            );
            for line in traceback {
                body.push('\n');
                body.push_str(&escape(&strip_ansi(line)));
            }
            body.push_str("</pre>");
            (String::new(), body)
        }
        Output::Unsupported => return,
    };

    if body.is_empty() {
        return;
    }

    let prompt_class = if prompt.is_empty() {
        "nb-prompt"
    } else {
        "nb-prompt nb-out"
    };
    out.push_str(&format!(
        "<div class=\"nb-cell nb-output\"><div class=\"{}\">{}</div><div class=\"nb-body\">{}</div></div>\n",
        prompt_class, prompt, body
    ));
}

/// Render the most preferred representation present in the bundle.
fn render_mime_bundle(data: &MimeBundle) -> String {
    let Some(mime) = MIME_PREFERENCE.iter().find(|mime| data.contains(mime)) else {
        return String::new();
    };
    let content = data.text(mime).unwrap_or_default();

    match *mime {
        "text/html" | "image/svg+xml" => content,
        "image/png" | "image/jpeg" => {
            let encoded: String = content.split_whitespace().collect();
            format!("<img src=\"data:{};base64,{}\">", mime, encoded)
        }
        "text/markdown" => markdown_to_html(&content),
        _ => format!("<pre>{}</pre>", escape(&content)),
    }
}

fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut html = String::new();
    push_html(&mut html, Parser::new_ext(source, options));
    html
}

fn prompt_number(execution_count: Option<u32>) -> String {
    execution_count.map(|n| n.to_string()).unwrap_or_else(|| " ".to_string())
}

/// Remove ANSI escape sequences (colour codes in tracebacks).
fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'[') {
            chars.next();
            // CSI sequence: parameters until a final byte in '@'..='~'
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
    }
    out
}
