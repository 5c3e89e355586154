//! Error types.

use thiserror::Error;

/// Errors that can occur while generating a dataset.
#[derive(Debug, Error)]
pub enum GenDataError {
    /// A parser failed while processing a node. The traversal is abandoned.
    #[error("Parser #{index} failed at {}: {source}", display_node(.node))]
    Parser {
        /// Name of the node being processed.
        node: String,
        /// Position of the failing parser in the pipeline.
        index: usize,
        #[source]
        source: ParserError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenDataError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn parser(node: &str, index: usize, source: ParserError) -> Self {
        Self::Parser {
            node: node.to_string(),
            index,
            source,
        }
    }
}

fn display_node(node: &str) -> String {
    if node.is_empty() {
        "root".to_string()
    } else {
        format!("`{}`", node)
    }
}

/// Errors raised by parsers.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Free-form failure message.
    #[error("{0}")]
    Message(String),

    /// Any other error a parser wants to surface.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ParserError {
    /// Creates a message error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<serde_json::Error> for ParserError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<GenDataError> for ParserError {
    fn from(err: GenDataError) -> Self {
        Self::Other(Box::new(err))
    }
}
