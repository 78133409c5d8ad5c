//! Fallback reader for files without a dedicated parser

use async_trait::async_trait;

use crate::domain::ingestion::{DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

/// Reads any file as text, replacing invalid UTF-8 sequences
#[derive(Debug, Clone, Default)]
pub struct DefaultParser;

impl DefaultParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for DefaultParser {
    fn supported_extensions(&self) -> &[&str] {
        &[]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        Ok(ParsedDocument::new(input.text_lossy(), input.metadata(None)))
    }
}
