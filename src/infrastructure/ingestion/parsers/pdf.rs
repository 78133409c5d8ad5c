//! PDF document parser

use std::panic::{catch_unwind, AssertUnwindSafe};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ingestion::{DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

/// Parser for PDF files, one text block per page
#[derive(Debug, Clone, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(bytes: &[u8], name: &str) -> Result<Vec<String>, DomainError> {
        // pdf-extract panics on some malformed inputs
        let result = catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(DomainError::parse(name, e.to_string())),
            Err(_) => Err(DomainError::parse(name, "PDF extraction panicked")),
        }
    }
}

#[async_trait]
impl DocumentParser for PdfParser {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let pages = Self::extract_pages(input.bytes(), input.display_name())?;

        debug!(source = input.display_name(), pages = pages.len(), "Extracted PDF text");

        let content = pages
            .iter()
            .map(|page| page.trim())
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        let metadata = input
            .metadata(Some("application/pdf"))
            .with_custom("page_count", serde_json::json!(pages.len()));

        Ok(ParsedDocument::new(content, metadata))
    }
}
