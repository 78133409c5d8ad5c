//! `${var:name}` placeholders, optionally with a fallback: `${var:name:fallback}`

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::domain::DomainError;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:(?P<name>[a-zA-Z0-9][-a-zA-Z0-9_]*)(?::(?P<default>[^}]*))?\}").unwrap()
});

/// Prompt sent when no custom template is configured
pub const DEFAULT_QA_TEMPLATE: &str = "Context information is below.
---------------------
${var:context}
---------------------
Given the context information and not prior knowledge, answer the query.
Query: ${var:query}
Answer: ";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("No value for placeholder '{name}'")]
    MissingVariable { name: String },

    #[error("Template never uses '{name}'")]
    UnusedVariable { name: String },
}

impl From<TemplateError> for DomainError {
    fn from(err: TemplateError) -> Self {
        DomainError::template(err.to_string())
    }
}

/// A distinct placeholder name, with the fallback of its first occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptVariable {
    pub name: String,
    pub default: Option<String>,
}

impl PromptVariable {
    pub fn required(&self) -> bool {
        self.default.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
    variables: Vec<PromptVariable>,
}

impl PromptTemplate {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();

        let variables = PLACEHOLDER
            .captures_iter(&source)
            .fold(Vec::<PromptVariable>::new(), |mut found, cap| {
                let name = &cap["name"];
                if found.iter().all(|v| v.name != name) {
                    found.push(PromptVariable {
                        name: name.to_owned(),
                        default: cap.name("default").map(|m| m.as_str().to_owned()),
                    });
                }
                found
            });

        Self { source, variables }
    }

    pub fn content(&self) -> &str {
        &self.source
    }

    pub fn variables(&self) -> &[PromptVariable] {
        &self.variables
    }

    pub fn expect_variables(&self, names: &[&str]) -> Result<(), TemplateError> {
        match names
            .iter()
            .find(|name| self.variables.iter().all(|v| v.name != **name))
        {
            Some(name) => Err(TemplateError::UnusedVariable {
                name: (*name).to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Substitutes every placeholder in one pass over the template
    ///
    /// Values are inserted verbatim; a placeholder-looking string inside a
    /// value stays as it is.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|v| v.required() && !values.contains_key(&v.name))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.name.clone(),
            });
        }

        let rendered = PLACEHOLDER.replace_all(&self.source, |cap: &Captures| {
            match values.get(&cap["name"]) {
                Some(value) => value.clone(),
                None => cap
                    .name("default")
                    .map(|m| m.as_str().to_owned())
                    .unwrap_or_default(),
            }
        });

        Ok(rendered.into_owned())
    }
}
