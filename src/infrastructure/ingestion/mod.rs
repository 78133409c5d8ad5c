//! Document ingestion infrastructure
//!
//! Parsers for each supported file type, the sentence chunker and the
//! directory reader that turns a folder into documents.

pub mod chunkers;
pub mod directory_reader;
pub mod factory;
pub mod parsers;

pub use chunkers::SentenceChunker;
pub use directory_reader::DirectoryReader;
pub use factory::ParserFactory;
pub use parsers::{
    DefaultParser, HtmlParser, JsonParser, MarkdownParser, PdfParser, PlainTextParser,
};
