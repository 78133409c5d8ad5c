//! Parser selection by file type

use std::path::Path;
use std::sync::Arc;

use crate::domain::ingestion::{DocumentParser, ParserType};

use super::parsers::{
    DefaultParser, HtmlParser, JsonParser, MarkdownParser, PdfParser, PlainTextParser,
};

/// Factory for creating document parsers
#[derive(Debug, Default)]
pub struct ParserFactory;

impl ParserFactory {
    /// Create a parser for the given type
    pub fn create(parser_type: ParserType) -> Arc<dyn DocumentParser> {
        match parser_type {
            ParserType::PlainText => Arc::new(PlainTextParser::new()),
            ParserType::Markdown => Arc::new(MarkdownParser::new()),
            ParserType::Html => Arc::new(HtmlParser::new()),
            ParserType::Json => Arc::new(JsonParser::new()),
            ParserType::Pdf => Arc::new(PdfParser::new()),
            ParserType::Default => Arc::new(DefaultParser::new()),
        }
    }

    /// Pick the parser for a file from its extension
    pub fn for_path(path: &Path) -> Arc<dyn DocumentParser> {
        Self::create(ParserType::detect(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_matches_extensions() {
        let cases = [
            (ParserType::PlainText, "test.txt"),
            (ParserType::Markdown, "test.md"),
            (ParserType::Html, "test.html"),
            (ParserType::Json, "test.json"),
            (ParserType::Pdf, "test.pdf"),
        ];

        for (parser_type, filename) in cases {
            let parser = ParserFactory::create(parser_type);
            assert!(parser.supports_file(filename), "{}", filename);
        }
    }

    #[tokio::test]
    async fn test_for_path_falls_back_to_default_reader() {
        let parser = ParserFactory::for_path(Path::new("data/table.csv"));
        let input = crate::domain::ingestion::ParserInput::from_text("a,b\n1,2");

        let parsed = parser.parse(input).await.unwrap();
        assert_eq!(parsed.content, "a,b\n1,2");
        assert!(parsed.metadata.mime_type.is_none());
    }
}
