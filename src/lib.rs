//! # Staking Transaction SDK
//!
//! A Rust SDK for building, signing, and broadcasting validator transactions
//! on a proof-of-stake chain.
//!
//! ## Modules
//!
//! The signing pipeline, leaves first:
//! - [`registry`]: type id → encode/decode rules (direct and legacy tables)
//! - [`signing`]: direct (protobuf) and legacy JSON signing documents
//! - [`signer`]: signers advertising the modes they accept
//! - [`tx`]: assembly of signatures into a broadcastable envelope
//! - [`broadcast`]: transport boundary and three-way outcome classification
//!
//! Plus:
//! - [`msgs`]: typed staking and bank operations
//! - [`client`]: `SigningClient` tying the pipeline together
//! - [`shared`]: coins, fees, keys, decimals, serde helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use staking_tx::prelude::*;
//!
//! let client = SigningClient::builder()
//!     .chain_id("testing")
//!     .build_rest()?;
//!
//! let signer = DualModeSigner::from_secret_bytes(&secret)?;
//! let op = MsgEditValidator {
//!     description: Description::default(),
//!     validator_address: "cosmosvaloper1...".into(),
//!     commission_rate: Some(rate),
//!     min_self_delegation: None,
//! }
//! .into_operation()?;
//!
//! let fee = Fee::from_gas_price(200_000, &"0.025ucosm".parse()?)?;
//! let outcome = client
//!     .sign_and_broadcast(&[SigningAccount::new(&signer, 7, 3)], vec![op], fee, "")
//!     .await?;
//!
//! match outcome {
//!     BroadcastOutcome::Success { height, .. } => println!("included at {}", height),
//!     BroadcastOutcome::Failure { log, .. } => println!("rejected: {}", log),
//!     BroadcastOutcome::SubmissionError { reason } => println!("retry later: {}", reason),
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Error types and the `SdkResult` alias.
pub mod error;

/// Shared value types and helpers.
pub mod shared;

/// Protobuf wire schema.
pub mod proto;

/// Message registry.
pub mod registry;

/// Typed operation kinds.
pub mod msgs;

/// Signing documents and their builders.
pub mod signing;

/// Signer abstraction and local secp256k1/ed25519 signers.
pub mod signer;

/// Transaction assembly.
pub mod tx;

/// Broadcast transport and outcome classification.
pub mod broadcast;

/// High-level signing client.
pub mod client;

/// Default endpoint and timing constants.
pub mod network;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use staking_tx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{SdkError, SdkResult, TransportError};

    pub use crate::registry::{MessageRegistry, TypedMsg, TypedOperation};

    pub use crate::msgs::{CommissionRates, Description, MsgCreateValidator, MsgEditValidator, MsgSend};

    pub use crate::shared::{Coin, Fee, GasPrice, PublicKey};

    pub use crate::signing::{
        DocumentBuilder, SignMode, SignerData, SignerInfo, SigningDocument, UnsignedTx,
    };

    pub use crate::signer::{
        select_mode, verify_signature, DirectCapableSigner, DualModeSigner, KeyAlgorithm,
        LegacyOnlySigner, LocalKey, ModePreference, Signature, Signer,
    };

    pub use crate::tx::{Assembler, SignedTransaction};

    pub use crate::broadcast::{
        broadcast_with_timeout, classify, submit_with_timeout, BroadcastOutcome, ChainResponse,
        Event, EventAttribute, SubmitMode, Transport,
    };
    #[cfg(feature = "http")]
    pub use crate::broadcast::RestTransport;

    pub use crate::client::{SigningAccount, SigningClient, SigningClientBuilder};

    pub use crate::network::{DEFAULT_BROADCAST_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_REST_URL};
}
