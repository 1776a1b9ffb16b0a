//! Error types for the aish_core collaborator seams.
//!
//! Resolution itself never fails: a layer with nothing to offer is an
//! `Option::None`, a blocked command is a `GateVerdict`, and a failed
//! execution is plain data in `ExecResult`. Typed errors exist only where
//! an external collaborator can genuinely be unreachable or misbehave, and
//! every caller converts them into a user-visible diagnostic at the point
//! of call.

/// Failure from the text-generation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The generation backend could not be reached.
    #[error("generation backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered, but the response could not be decoded.
    #[error("malformed generation response: {0}")]
    Malformed(String),
}

/// Failure from the knowledge-retrieval collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// The retrieval backend could not be reached.
    #[error("retrieval backend unreachable: {0}")]
    Unreachable(String),

    /// The query was accepted but produced an invalid result set.
    #[error("malformed retrieval response: {0}")]
    Malformed(String),
}
