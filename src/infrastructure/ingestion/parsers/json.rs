//! JSON document parser

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ingestion::{DocumentParser, ParsedDocument, ParserInput};
use crate::domain::DomainError;

/// Parser for JSON files; the document text is the pretty-printed value
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }

    /// Short shape summary, e.g. `object{id, title}` or `array[3]`
    fn describe(value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Number(_) => "number".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Array(items) => format!("array[{}]", items.len()),
            Value::Object(map) => {
                let keys: Vec<&str> = map.keys().take(5).map(String::as_str).collect();
                let more = if map.len() > keys.len() { ",..." } else { "" };
                format!("object{{{}{}}}", keys.join(", "), more)
            }
        }
    }
}

#[async_trait]
impl DocumentParser for JsonParser {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let raw = input.text()?;

        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| DomainError::parse(input.display_name(), format!("invalid JSON: {}", e)))?;

        let content = serde_json::to_string_pretty(&value)
            .map_err(|e| DomainError::parse(input.display_name(), e.to_string()))?;

        let metadata = input
            .metadata(Some("application/json"))
            .with_custom("json_structure", Value::String(Self::describe(&value)));

        Ok(ParsedDocument::new(content, metadata))
    }
}
