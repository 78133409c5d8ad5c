use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::Answer;
use crate::domain::DomainError;

/// Answers questions against an index
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(&self, question: &str) -> Result<Answer, DomainError>;
}
