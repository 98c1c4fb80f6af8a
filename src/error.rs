use thiserror::Error;

/// Faults raised by the markdown engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unable to tokenize input: {0}")]
    Tokenize(String),
    #[error("nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },
}

/// Faults that abort a `parse` or `restore` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("input nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },
}
