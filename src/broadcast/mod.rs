//! Broadcast and outcome classification.
//!
//! A submission ends in exactly one of three [`BroadcastOutcome`]s:
//! - `Success`: included in a block with result code 0
//! - `Failure`: included in a block but rejected by state-transition logic
//! - `SubmissionError`: never confirmed as included (network error, node-side
//!   rejection before chain processing, or the caller stopped waiting)
//!
//! Only `SubmissionError` is worth resubmitting. A `Failure` is final for
//! that operation set and its log is kept verbatim.

mod convert;
pub mod wire;

#[cfg(feature = "http")]
pub mod rest;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::{select, Either};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::shared::serde_util;

#[cfg(feature = "http")]
pub use rest::RestTransport;

// ============================================================================
// Chain response
// ============================================================================

/// A key/value pair attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

/// Structured event emitted while executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    /// First attribute value with the given key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Delivery result reported by the chain for one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainResponse {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub log: String,
    #[serde(with = "serde_util::u64_string")]
    pub height: u64,
    pub hash: String,
    #[serde(default, with = "serde_util::u64_string")]
    pub gas_used: u64,
    #[serde(default, with = "serde_util::u64_string")]
    pub gas_wanted: u64,
    #[serde(default)]
    pub events: Vec<Event>,
}

// ============================================================================
// Outcome
// ============================================================================

/// Three-way classification of a submitted transaction's fate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BroadcastOutcome {
    Success {
        height: u64,
        transaction_hash: String,
        gas_used: u64,
        gas_wanted: u64,
        events: Vec<Event>,
    },
    Failure {
        code: u32,
        codespace: String,
        /// Chain-provided log, unmodified.
        log: String,
        transaction_hash: Option<String>,
        gas_used: u64,
        gas_wanted: u64,
    },
    SubmissionError {
        reason: String,
    },
}

impl BroadcastOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BroadcastOutcome::Success { .. })
    }

    /// Whether resubmitting (after re-checking the sequence) may help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BroadcastOutcome::SubmissionError { .. })
    }

    pub fn transaction_hash(&self) -> Option<&str> {
        match self {
            BroadcastOutcome::Success {
                transaction_hash, ..
            } => Some(transaction_hash),
            BroadcastOutcome::Failure {
                transaction_hash, ..
            } => transaction_hash.as_deref(),
            BroadcastOutcome::SubmissionError { .. } => None,
        }
    }

    /// Failure log or submission error reason.
    pub fn log(&self) -> Option<&str> {
        match self {
            BroadcastOutcome::Success { .. } => None,
            BroadcastOutcome::Failure { log, .. } => Some(log),
            BroadcastOutcome::SubmissionError { reason } => Some(reason),
        }
    }
}

/// Classify a chain response or a transport error.
pub fn classify(response: &Result<ChainResponse, TransportError>) -> BroadcastOutcome {
    match response {
        Err(err) => BroadcastOutcome::SubmissionError {
            reason: err.to_string(),
        },
        Ok(resp) if resp.code == 0 => BroadcastOutcome::Success {
            height: resp.height,
            transaction_hash: resp.hash.clone(),
            gas_used: resp.gas_used,
            gas_wanted: resp.gas_wanted,
            events: resp.events.clone(),
        },
        Ok(resp) => BroadcastOutcome::Failure {
            code: resp.code,
            codespace: resp.codespace.clone(),
            log: resp.log.clone(),
            transaction_hash: (!resp.hash.is_empty()).then(|| resp.hash.clone()),
            gas_used: resp.gas_used,
            gas_wanted: resp.gas_wanted,
        },
    }
}

// ============================================================================
// Transport
// ============================================================================

/// How far a fire-and-forget submission waits before returning.
///
/// Neither mode says anything about inclusion, so submissions made this way
/// return a transaction hash and are never classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    /// Wait for the mempool check only.
    #[default]
    Sync,
    /// Return as soon as the node received the bytes.
    Async,
}

impl SubmitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitMode::Sync => "sync",
            SubmitMode::Async => "async",
        }
    }
}

impl std::fmt::Display for SubmitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submits encoded transactions to a node.
///
/// Node-side rejections before chain processing are reported as
/// `TransportError::Rejected`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit and resolve only once the transaction's delivery result (its
    /// inclusion in a block) is known.
    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> Result<ChainResponse, TransportError>;

    /// Hand the transaction to the node without waiting for inclusion.
    /// Returns the transaction hash.
    async fn submit_no_wait(
        &self,
        tx_bytes: Vec<u8>,
        mode: SubmitMode,
    ) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> Result<ChainResponse, TransportError> {
        (**self).broadcast_tx(tx_bytes).await
    }

    async fn submit_no_wait(
        &self,
        tx_bytes: Vec<u8>,
        mode: SubmitMode,
    ) -> Result<String, TransportError> {
        (**self).submit_no_wait(tx_bytes, mode).await
    }
}

async fn with_deadline<F, T>(work: F, timeout: Duration) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    let deadline = futures_timer::Delay::new(timeout);
    futures_util::pin_mut!(work);
    futures_util::pin_mut!(deadline);

    match select(work, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(TransportError::Timeout),
    }
}

/// Submit, wait for the delivery result and classify it, giving up after
/// `timeout`.
///
/// Giving up only stops waiting; the transaction may still be included later,
/// so a timeout is reported as `SubmissionError { reason: "timeout" }`.
pub async fn broadcast_with_timeout<T: Transport + ?Sized>(
    transport: &T,
    tx_bytes: Vec<u8>,
    timeout: Duration,
) -> BroadcastOutcome {
    let result = with_deadline(transport.broadcast_tx(tx_bytes), timeout).await;
    if matches!(result, Err(TransportError::Timeout)) {
        tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Broadcast timed out");
    }

    let outcome = classify(&result);
    match &outcome {
        BroadcastOutcome::Success {
            height,
            transaction_hash,
            ..
        } => tracing::info!(height, hash = %transaction_hash, "Transaction succeeded"),
        BroadcastOutcome::Failure { code, log, .. } => {
            tracing::info!(code, log = %log, "Transaction failed")
        }
        BroadcastOutcome::SubmissionError { reason } => {
            tracing::info!(reason = %reason, "Transaction not submitted")
        }
    }
    outcome
}

/// Fire-and-forget submission bounded by `timeout`. Returns the transaction
/// hash; inclusion is not checked.
pub async fn submit_with_timeout<T: Transport + ?Sized>(
    transport: &T,
    tx_bytes: Vec<u8>,
    mode: SubmitMode,
    timeout: Duration,
) -> Result<String, TransportError> {
    let result = with_deadline(transport.submit_no_wait(tx_bytes, mode), timeout).await;
    match &result {
        Ok(hash) => tracing::info!(hash = %hash, mode = %mode, "Transaction submitted"),
        Err(err) => tracing::warn!(error = %err, mode = %mode, "Submission failed"),
    }
    result
}
