//! High-level client: `SigningClient`.
//!
//! Ties the pieces together: pick a sign mode per signer, build each
//! signer's document, sign, assemble, broadcast, classify.

use std::sync::Arc;
use std::time::Duration;

use crate::broadcast::{
    broadcast_with_timeout, submit_with_timeout, BroadcastOutcome, SubmitMode, Transport,
};
use crate::error::TransportError;
use crate::error::{SdkError, SdkResult};
use crate::registry::{MessageRegistry, TypedOperation};
use crate::shared::Fee;
use crate::signer::{select_mode, ModePreference, Signer};
use crate::signing::{DocumentBuilder, SignerData, SignerInfo, UnsignedTx};
use crate::tx::{Assembler, SignedTransaction};

#[cfg(feature = "http")]
use crate::broadcast::RestTransport;

/// A signer plus the on-chain account state it signs with.
///
/// `account_number` and `sequence` come from the chain; they are used as
/// given.
#[derive(Clone, Copy)]
pub struct SigningAccount<'a> {
    pub signer: &'a dyn Signer,
    pub account_number: u64,
    pub sequence: u64,
}

impl<'a> SigningAccount<'a> {
    pub fn new(signer: &'a dyn Signer, account_number: u64, sequence: u64) -> Self {
        Self {
            signer,
            account_number,
            sequence,
        }
    }
}

impl std::fmt::Debug for SigningAccount<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningAccount")
            .field("public_key", &self.signer.public_key().to_hex())
            .field("account_number", &self.account_number)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Signs transactions for one chain and broadcasts them through `T`.
pub struct SigningClient<T> {
    registry: Arc<MessageRegistry>,
    chain_id: String,
    mode_preference: ModePreference,
    broadcast_timeout: Duration,
    transport: T,
}

impl SigningClient<()> {
    pub fn builder() -> SigningClientBuilder {
        SigningClientBuilder::default()
    }
}

impl<T: Transport> SigningClient<T> {
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn registry(&self) -> &MessageRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign `operations` with every account, in the order given.
    ///
    /// Mode selection for all signers happens before any document is built,
    /// and nothing is returned unless every signature succeeds.
    pub fn sign(
        &self,
        accounts: &[SigningAccount<'_>],
        operations: Vec<TypedOperation>,
        fee: Fee,
        memo: &str,
    ) -> SdkResult<SignedTransaction> {
        if accounts.is_empty() {
            return Err(SdkError::Config(
                "at least one signing account is required".into(),
            ));
        }
        fee.validate()?;

        let signer_infos = accounts
            .iter()
            .map(|account| {
                let mode = select_mode(account.signer, self.mode_preference)?;
                Ok(SignerInfo::new(
                    account.signer.public_key(),
                    account.sequence,
                    mode,
                ))
            })
            .collect::<SdkResult<Vec<_>>>()?;

        let tx = UnsignedTx {
            operations,
            fee,
            memo: memo.to_string(),
            signer_infos,
        };

        let signatures = accounts
            .iter()
            .zip(&tx.signer_infos)
            .map(|(account, info)| {
                let data = SignerData::new(
                    self.chain_id.clone(),
                    account.account_number,
                    account.sequence,
                );
                let document = DocumentBuilder::for_mode(info.sign_mode, &self.registry)
                    .build(&tx, &data)?;
                account.signer.sign(&document)
            })
            .collect::<SdkResult<Vec<_>>>()?;

        Assembler::new(&self.registry).assemble(tx, signatures)
    }

    /// Broadcast an already signed transaction and wait for its delivery
    /// result.
    pub async fn broadcast(&self, tx: &SignedTransaction) -> BroadcastOutcome {
        tracing::debug!(hash = %tx.hash(), "Broadcasting transaction");
        broadcast_with_timeout(&self.transport, tx.to_bytes(), self.broadcast_timeout).await
    }

    /// Submit without waiting for inclusion. The returned hash says nothing
    /// about the transaction's fate; look it up later to classify it.
    pub async fn submit(
        &self,
        tx: &SignedTransaction,
        mode: SubmitMode,
    ) -> Result<String, TransportError> {
        submit_with_timeout(&self.transport, tx.to_bytes(), mode, self.broadcast_timeout).await
    }

    /// Sign and broadcast. Construction errors are returned before anything
    /// reaches the transport.
    pub async fn sign_and_broadcast(
        &self,
        accounts: &[SigningAccount<'_>],
        operations: Vec<TypedOperation>,
        fee: Fee,
        memo: &str,
    ) -> SdkResult<BroadcastOutcome> {
        let tx = self.sign(accounts, operations, fee, memo)?;
        Ok(self.broadcast(&tx).await)
    }
}

impl<T: Clone> Clone for SigningClient<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            chain_id: self.chain_id.clone(),
            mode_preference: self.mode_preference,
            broadcast_timeout: self.broadcast_timeout,
            transport: self.transport.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct SigningClientBuilder {
    chain_id: String,
    mode_preference: ModePreference,
    broadcast_timeout: Duration,
    registry: Option<Arc<MessageRegistry>>,
    #[cfg(feature = "http")]
    rest_url: String,
}

impl Default for SigningClientBuilder {
    fn default() -> Self {
        Self {
            chain_id: String::new(),
            mode_preference: ModePreference::default(),
            broadcast_timeout: crate::network::DEFAULT_BROADCAST_TIMEOUT,
            registry: None,
            #[cfg(feature = "http")]
            rest_url: crate::network::DEFAULT_REST_URL.to_string(),
        }
    }
}

impl SigningClientBuilder {
    pub fn chain_id(mut self, chain_id: &str) -> Self {
        self.chain_id = chain_id.to_string();
        self
    }

    pub fn mode_preference(mut self, preference: ModePreference) -> Self {
        self.mode_preference = preference;
        self
    }

    /// Bound on waiting for a delivery result. The REST transport built by
    /// [`build_rest`](Self::build_rest) uses it for single requests too.
    pub fn broadcast_timeout(mut self, timeout: Duration) -> Self {
        self.broadcast_timeout = timeout;
        self
    }

    /// Use a custom registry instead of [`MessageRegistry::with_defaults`].
    pub fn registry(mut self, registry: Arc<MessageRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[cfg(feature = "http")]
    pub fn rest_url(mut self, url: &str) -> Self {
        self.rest_url = url.to_string();
        self
    }

    pub fn build<T: Transport>(self, transport: T) -> SdkResult<SigningClient<T>> {
        if self.chain_id.is_empty() {
            return Err(SdkError::Config("chain_id is required".into()));
        }
        Ok(SigningClient {
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(MessageRegistry::with_defaults())),
            chain_id: self.chain_id,
            mode_preference: self.mode_preference,
            broadcast_timeout: self.broadcast_timeout,
            transport,
        })
    }

    /// Build with a [`RestTransport`] pointed at `rest_url`.
    #[cfg(feature = "http")]
    pub fn build_rest(self) -> SdkResult<SigningClient<RestTransport>> {
        let transport = RestTransport::new(&self.rest_url)
            .map_err(|e| SdkError::Config(format!("REST transport: {}", e)))?
            .with_request_timeout(self.broadcast_timeout);
        self.build(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::ChainResponse;
    use crate::msgs::MsgSend;
    use crate::registry::TypedMsg;
    use crate::shared::Coin;
    use crate::signer::{DirectCapableSigner, LegacyOnlySigner};
    use crate::signing::SignMode;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn broadcast_tx(&self, _tx_bytes: Vec<u8>) -> Result<ChainResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChainResponse {
                height: 1,
                hash: "AA".into(),
                ..Default::default()
            })
        }

        async fn submit_no_wait(
            &self,
            _tx_bytes: Vec<u8>,
            _mode: SubmitMode,
        ) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("AA".into())
        }
    }

    fn send_op() -> TypedOperation {
        MsgSend {
            from_address: "cosmos1from".into(),
            to_address: "cosmos1to".into(),
            amount: vec![Coin::new(1, "ucosm")],
        }
        .into_operation()
        .unwrap()
    }

    fn fee() -> Fee {
        Fee::new(vec![Coin::new(5000, "ucosm")], 200_000).unwrap()
    }

    #[test]
    fn test_build_requires_chain_id() {
        let err = SigningClient::builder()
            .build(CountingTransport::default())
            .err()
            .unwrap();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_sign_picks_mode_per_signer() {
        let client = SigningClient::builder()
            .chain_id("testing")
            .build(CountingTransport::default())
            .unwrap();
        let direct = DirectCapableSigner::generate();
        let legacy = LegacyOnlySigner::generate();

        let tx = client
            .sign(
                &[
                    SigningAccount::new(&direct, 1, 0),
                    SigningAccount::new(&legacy, 2, 5),
                ],
                vec![send_op()],
                fee(),
                "",
            )
            .unwrap();

        assert_eq!(tx.signer_infos()[0].sign_mode, SignMode::Direct);
        assert_eq!(tx.signer_infos()[1].sign_mode, SignMode::LegacyJson);
        assert_eq!(tx.signer_infos()[1].sequence, 5);
        assert_eq!(tx.signatures()[0].signer_public_key, direct.public_key());
        assert_eq!(tx.signatures()[1].signer_public_key, legacy.public_key());
    }

    #[test]
    fn test_sign_requires_a_signer() {
        let client = SigningClient::builder()
            .chain_id("testing")
            .build(CountingTransport::default())
            .unwrap();
        assert!(client.sign(&[], vec![send_op()], fee(), "").is_err());
    }

    #[tokio::test]
    async fn test_construction_error_never_reaches_transport() {
        let client = SigningClient::builder()
            .chain_id("testing")
            .build(CountingTransport::default())
            .unwrap();
        let signer = DirectCapableSigner::generate();

        let result = client
            .sign_and_broadcast(
                &[SigningAccount::new(&signer, 1, 0)],
                vec![TypedOperation::new("/unknown.Msg", serde_json::Value::Null)],
                fee(),
                "",
            )
            .await;
        assert!(matches!(result, Err(SdkError::UnknownTypeId(_))));
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 0);

        let outcome = client
            .sign_and_broadcast(&[SigningAccount::new(&signer, 1, 0)], vec![send_op()], fee(), "")
            .await
            .unwrap();
        assert!(outcome.is_success());
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_returns_hash() {
        let client = SigningClient::builder()
            .chain_id("testing")
            .build(CountingTransport::default())
            .unwrap();
        let signer = DirectCapableSigner::generate();
        let tx = client
            .sign(&[SigningAccount::new(&signer, 1, 0)], vec![send_op()], fee(), "")
            .unwrap();

        let hash = client.submit(&tx, SubmitMode::Async).await.unwrap();
        assert_eq!(hash, "AA");
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_build_rest_bounds_requests_by_broadcast_timeout() {
        let client = SigningClient::builder()
            .chain_id("testing")
            .broadcast_timeout(Duration::from_secs(7))
            .build_rest()
            .unwrap();
        assert_eq!(client.transport().request_timeout(), Duration::from_secs(7));
    }
}
