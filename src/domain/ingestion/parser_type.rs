//! File type detection for the directory reader

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Type of document parser to use for a file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParserType {
    PlainText,
    Markdown,
    Html,
    /// JSON files (pretty-printed as text)
    Json,
    Pdf,
    /// Anything else, read as lossy UTF-8 text
    Default,
}

impl ParserType {
    /// Detect the parser type from a path's extension
    pub fn detect(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "text" => Self::PlainText,
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            "json" => Self::Json,
            "pdf" => Self::Pdf,
            _ => Self::Default,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::Default => "default",
        }
    }
}
