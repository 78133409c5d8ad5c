//! Parsing raw files into text plus metadata

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// File contents handed to a [`DocumentParser`]
#[derive(Debug, Clone)]
pub struct ParserInput {
    data: Vec<u8>,
    /// Path relative to the data directory, when the input came from disk
    pub filename: Option<String>,
}

impl ParserInput {
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            filename: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_bytes(text.into().into_bytes())
    }

    pub fn with_filename(self, filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..self
        }
    }

    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("<input>")
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Strict UTF-8 decode
    pub fn text(&self) -> Result<String, DomainError> {
        std::str::from_utf8(&self.data)
            .map(str::to_owned)
            .map_err(|e| {
                DomainError::parse(
                    self.display_name(),
                    format!("content is not valid UTF-8 (byte {})", e.valid_up_to()),
                )
            })
    }

    /// Invalid sequences become U+FFFD
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Metadata every parser starts from: the source name and a mime type
    pub fn metadata(&self, mime_type: Option<&str>) -> DocumentMetadata {
        DocumentMetadata {
            source: self.filename.clone(),
            mime_type: mime_type.map(str::to_owned),
            ..DocumentMetadata::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    /// Anything else a reader or parser wants to attach
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    pub fn with_source(self, source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    pub fn with_mime_type(self, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            ..self
        }
    }

    pub fn with_modified_at(self, modified_at: DateTime<Utc>) -> Self {
        Self {
            modified_at: Some(modified_at),
            ..self
        }
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom.insert(key.into(), value);
        self
    }

    /// Fill the gaps in `self` from `fallback`; fields already set win
    pub fn merge(self, fallback: DocumentMetadata) -> Self {
        let mut custom = fallback.custom;
        custom.extend(self.custom);

        Self {
            title: self.title.or(fallback.title),
            source: self.source.or(fallback.source),
            mime_type: self.mime_type.or(fallback.mime_type),
            modified_at: self.modified_at.or(fallback.modified_at),
            custom,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl ParsedDocument {
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// Turns one file format into plain text
#[async_trait]
pub trait DocumentParser: Send + Sync + Debug {
    /// Lowercase extensions without the dot
    fn supported_extensions(&self) -> &[&str];

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError>;

    fn supports_file(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| {
                self.supported_extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rejects_invalid_utf8_with_name() {
        let input = ParserInput::from_bytes(vec![b'a', 0xff]).with_filename("notes/a.txt");

        let err = input.text().unwrap_err();
        assert!(matches!(err, DomainError::Parse { ref source_name, .. } if source_name == "notes/a.txt"));
        assert_eq!(input.text_lossy(), "a\u{FFFD}");
    }

    #[test]
    fn test_from_text_round_trips_bytes() {
        let input = ParserInput::from_text("héllo");

        assert_eq!(input.bytes(), "héllo".as_bytes());
        assert_eq!(input.text().unwrap(), "héllo");
        assert_eq!(input.display_name(), "<input>");
    }

    #[test]
    fn test_base_metadata_carries_source() {
        let meta = ParserInput::from_text("x")
            .with_filename("faq.md")
            .metadata(Some("text/markdown"));

        assert_eq!(meta.source.as_deref(), Some("faq.md"));
        assert_eq!(meta.mime_type.as_deref(), Some("text/markdown"));
        assert!(ParserInput::from_text("x").metadata(None).source.is_none());
    }

    #[test]
    fn test_merge_keeps_own_values() {
        let own = DocumentMetadata::new()
            .with_title("From heading")
            .with_custom("file_size", serde_json::json!(1));
        let fallback = DocumentMetadata::new()
            .with_title("From filename")
            .with_source("notes/a.md")
            .with_custom("file_size", serde_json::json!(12))
            .with_custom("pages", serde_json::json!(3));

        let merged = own.merge(fallback);

        assert_eq!(merged.title.as_deref(), Some("From heading"));
        assert_eq!(merged.source.as_deref(), Some("notes/a.md"));
        assert_eq!(merged.custom["file_size"], serde_json::json!(1));
        assert_eq!(merged.custom["pages"], serde_json::json!(3));
    }

    #[test]
    fn test_supports_file_needs_an_extension() {
        #[derive(Debug)]
        struct Txt;

        #[async_trait]
        impl DocumentParser for Txt {
            fn supported_extensions(&self) -> &[&str] {
                &["txt"]
            }

            async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
                Ok(ParsedDocument::new(input.text()?, DocumentMetadata::new()))
            }
        }

        assert!(Txt.supports_file("A.TXT"));
        assert!(!Txt.supports_file("txt"));
        assert!(!Txt.supports_file("a.md"));
    }
}
