//! Document parser implementations

mod default;
mod html;
mod json;
mod markdown;
mod pdf;
mod plain_text;

pub use default::DefaultParser;
pub use html::HtmlParser;
pub use json::JsonParser;
pub use markdown::MarkdownParser;
pub use pdf::PdfParser;
pub use plain_text::PlainTextParser;
