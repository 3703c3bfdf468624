//! Error types for transaction construction, signing, and broadcast.
//!
//! Two separate enums mirror the two places things go wrong:
//! - [`SdkError`]: local, construction-time errors. These indicate a caller or
//!   configuration bug and are never retried internally.
//! - [`TransportError`]: errors at the network boundary. These are folded into
//!   [`BroadcastOutcome::SubmissionError`](crate::broadcast::BroadcastOutcome) by the classifier.

use thiserror::Error;

use crate::signing::SignMode;

/// Construction-time errors.
#[derive(Debug, Error)]
pub enum SdkError {
    /// No codec registered for this type id
    #[error("Unknown type id: {0}")]
    UnknownTypeId(String),

    /// Type id is registered but has no legacy JSON mapping
    #[error("Unsupported legacy encoding for type id: {0}")]
    UnsupportedLegacyEncoding(String),

    /// Signer cannot produce a signature in this mode
    #[error("Unsupported sign mode: {mode}")]
    UnsupportedMode { mode: SignMode },

    /// Underlying cryptographic failure
    #[error("Signing failure: {0}")]
    SigningFailure(String),

    /// Number of signatures differs from number of signer infos
    #[error("Signature count mismatch: expected {expected}, got {actual}")]
    SignatureCountMismatch { expected: usize, actual: usize },

    /// Signature at a position does not belong to the signer info at that position
    #[error("Signature mismatch at index {index}: {reason}")]
    SignatureMismatch { index: usize, reason: String },

    /// Signer data sequence matches no signer info in the transaction
    #[error("Sequence mismatch: signer data has sequence {sequence}, no signer info carries it")]
    SequenceMismatch { sequence: u64 },

    /// Payload is not structurally well-formed for its type id
    #[error("Invalid payload for {type_id}: {reason}")]
    InvalidPayload { type_id: String, reason: String },

    /// Fee violates its invariants
    #[error("Invalid fee: {0}")]
    InvalidFee(String),

    /// Protobuf decode error
    #[error("Decode error: {0}")]
    Decode(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<prost::DecodeError> for SdkError {
    fn from(err: prost::DecodeError) -> Self {
        SdkError::Decode(err.to_string())
    }
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors raised before the chain processed the transaction.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Caller stopped waiting. The transaction may still be included later.
    #[error("timeout")]
    Timeout,

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Node refused the transaction before chain processing (e.g. mempool check)
    #[error("Rejected by node (code {code}): {log}")]
    Rejected { code: u32, log: String },

    /// Unexpected HTTP status from the gateway
    #[error("Unexpected status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Gateway answered with something we could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
