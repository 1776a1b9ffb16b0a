//! Knowledge-retrieval interface and question routing
//!
//! Documentation questions are answered by a retrieval collaborator, not
//! by the command resolver. This module defines the collaborator seam and
//! the input conventions that route a request to it: a leading "? ", a
//! leading "rag ", or a trailing question mark.

use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One retrieved documentation fragment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocHit {
    pub content: String,
    pub source: String,
    pub score: f32,
}

/// Retrieval collaborator: vector search over command documentation.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Return up to `k` fragments, best first.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<DocHit>, RetrievalError>;
}

/// Extract the question from an input that uses one of the question
/// conventions, or `None` when the input is a command request.
pub fn question_from_input(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("? ") {
        let question = rest.trim();
        return (!question.is_empty()).then(|| question.to_string());
    }
    if trimmed
        .get(..4)
        .map(|p| p.eq_ignore_ascii_case("rag "))
        .unwrap_or(false)
    {
        let question = trimmed[4..].trim();
        return (!question.is_empty()).then(|| question.to_string());
    }
    if trimmed.len() > 1 && trimmed.ends_with('?') {
        return Some(trimmed.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prefix() {
        assert_eq!(
            question_from_input("? how do I list hidden files").unwrap(),
            "how do I list hidden files"
        );
        assert_eq!(
            question_from_input("rag what does chmod do").unwrap(),
            "what does chmod do"
        );
    }

    #[test]
    fn test_trailing_question_mark() {
        assert_eq!(
            question_from_input("what does ls -l show?").unwrap(),
            "what does ls -l show?"
        );
    }

    #[test]
    fn test_commands_are_not_questions() {
        assert!(question_from_input("ls -la").is_none());
        assert!(question_from_input("create a folder named reports").is_none());
        assert!(question_from_input("").is_none());
        assert!(question_from_input("?").is_none());
        assert!(question_from_input("? ").is_none());
    }

    #[test]
    fn test_prefix_is_case_insensitive_but_question_is_preserved() {
        assert_eq!(
            question_from_input("RAG Explain Pipes").unwrap(),
            "Explain Pipes"
        );
    }
}
