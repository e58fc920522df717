//! Typed model of a notebook document (nbformat v4).
//!
//! Only the fields the exporter reads are modelled; everything else in the
//! JSON (cell ids, per-cell metadata, attachments) is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// The only major format version the exporter understands.
pub const SUPPORTED_NBFORMAT: u32 = 4;

#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    pub nbformat: u32,
    #[serde(default)]
    pub metadata: NotebookMetadata,
    pub cells: Vec<Cell>,
}

impl Notebook {
    /// Parse a notebook from its JSON text, rejecting other format versions.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let notebook: Notebook = serde_json::from_str(text).map_err(|e| e.to_string())?;
        if notebook.nbformat != SUPPORTED_NBFORMAT {
            return Err(format!(
                "unsupported nbformat {} (expected {})",
                notebook.nbformat, SUPPORTED_NBFORMAT
            ));
        }
        Ok(notebook)
    }

    pub fn language(&self) -> Option<&str> {
        self.metadata
            .language_info
            .as_ref()
            .map(|info| info.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookMetadata {
    pub language_info: Option<LanguageInfo>,
    pub kernelspec: Option<KernelSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        #[serde(default)]
        source: MultilineString,
    },
    Code {
        #[serde(default)]
        source: MultilineString,
        execution_count: Option<u32>,
        #[serde(default)]
        outputs: Vec<Output>,
    },
    Raw {
        #[serde(default)]
        source: MultilineString,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        name: String,
        text: MultilineString,
    },
    ExecuteResult {
        execution_count: Option<u32>,
        #[serde(default)]
        data: MimeBundle,
    },
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
    },
    Error {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
    /// Output kinds that carry nothing to display (e.g. `update_display_data`).
    #[serde(other)]
    Unsupported,
}

/// Text stored either as one string or as a list of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "MultilineRepr")]
pub struct MultilineString(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineRepr {
    One(String),
    Lines(Vec<String>),
}

impl From<MultilineRepr> for MultilineString {
    fn from(repr: MultilineRepr) -> Self {
        match repr {
            MultilineRepr::One(text) => Self(text),
            MultilineRepr::Lines(lines) => Self(lines.concat()),
        }
    }
}

impl MultilineString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Output payloads keyed by mime type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MimeBundle(pub BTreeMap<String, Value>);

impl MimeBundle {
    /// Text content for `mime`, joining line lists and pretty-printing JSON
    /// payloads such as `application/json`.
    pub fn text(&self, mime: &str) -> Option<String> {
        let value = self.0.get(mime)?;
        Some(match value {
            Value::String(text) => text.clone(),
            Value::Array(lines) if lines.iter().all(Value::is_string) => lines
                .iter()
                .filter_map(Value::as_str)
                .collect::<String>(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        })
    }

    pub fn contains(&self, mime: &str) -> bool {
        self.0.contains_key(mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cells_of_every_type() {
        let nb = Notebook::from_json(
            r##"{
                "nbformat": 4,
                "nbformat_minor": 5,
                "metadata": {"language_info": {"name": "python"}},
                "cells": [
                    {"cell_type": "markdown", "metadata": {}, "source": ["# Title\n", "text"]},
                    {"cell_type": "code", "execution_count": 3, "metadata": {}, "source": "x = 1",
                     "outputs": [{"output_type": "stream", "name": "stdout", "text": "1\n"}]},
                    {"cell_type": "raw", "metadata": {}, "source": "raw"}
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(nb.language(), Some("python"));
        assert_eq!(nb.cells.len(), 3);
        match &nb.cells[0] {
            Cell::Markdown { source } => assert_eq!(source.as_str(), "# Title\ntext"),
            other => panic!("unexpected cell {:?}", other),
        }
        match &nb.cells[1] {
            Cell::Code {
                execution_count,
                outputs,
                ..
            } => {
                assert_eq!(*execution_count, Some(3));
                assert_eq!(outputs.len(), 1);
            }
            other => panic!("unexpected cell {:?}", other),
        }
    }

    #[test]
    fn rejects_older_format_versions() {
        let err = Notebook::from_json(r#"{"nbformat": 3, "cells": []}"#).unwrap_err();
        assert!(err.contains("unsupported nbformat 3"));
    }

    #[test]
    fn rejects_documents_without_cells() {
        assert!(Notebook::from_json(r#"{"nbformat": 4}"#).is_err());
        assert!(Notebook::from_json("not json").is_err());
    }

    #[test]
    fn mime_bundle_joins_lines_and_prints_json() {
        let bundle: MimeBundle = serde_json::from_str(
            r#"{"text/plain": ["a\n", "b"], "application/json": {"k": 1}}"#,
        )
        .unwrap();

        assert_eq!(bundle.text("text/plain").as_deref(), Some("a\nb"));
        assert!(bundle.text("application/json").unwrap().contains("\"k\": 1"));
        assert!(bundle.text("image/png").is_none());
    }
}
