//! REST gateway transport over `reqwest`.
//!
//! [`Transport::broadcast_tx`] submits with `BROADCAST_MODE_SYNC` and then
//! polls the lookup endpoint until the transaction shows up in a block.
//! Polling never gives up on its own; bound it with
//! [`broadcast_with_timeout`](super::broadcast_with_timeout). Every request
//! is also bounded by the request timeout, which reports as
//! [`TransportError::Timeout`].

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Response, StatusCode};

use super::wire::{BroadcastTxRequest, TxResponse, TxResponseEnvelope};
use super::{ChainResponse, SubmitMode, Transport};
use crate::error::TransportError;
use crate::network::{DEFAULT_BROADCAST_TIMEOUT, DEFAULT_POLL_INTERVAL};

/// Transport talking to a node's REST gateway.
#[derive(Debug, Clone)]
pub struct RestTransport {
    base_url: String,
    client: Client,
    poll_interval: Duration,
    request_timeout: Duration,
}

impl RestTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = Client::builder().pool_max_idle_per_host(10).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_BROADCAST_TIMEOUT,
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Upper bound for a single HTTP round trip.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    async fn submit(&self, tx_bytes: &[u8], mode: SubmitMode) -> Result<TxResponse, TransportError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs", self.base_url);
        let request = BroadcastTxRequest {
            tx_bytes: STANDARD.encode(tx_bytes),
            mode: match mode {
                SubmitMode::Sync => "BROADCAST_MODE_SYNC",
                SubmitMode::Async => "BROADCAST_MODE_ASYNC",
            }
            .to_string(),
        };

        let resp = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(resp).await);
        }

        let envelope = read_envelope(resp).await?;
        let checked = envelope.tx_response;
        if checked.code != 0 {
            return Err(TransportError::Rejected {
                code: checked.code,
                log: checked.raw_log,
            });
        }
        Ok(checked)
    }

    /// Look a transaction up by hash. `None` while it is not yet indexed.
    async fn fetch_tx(&self, hash: &str) -> Result<Option<TxResponse>, TransportError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.base_url, hash);
        let resp = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(network_error)?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(resp).await);
        }

        Ok(Some(read_envelope(resp).await?.tx_response))
    }
}

fn network_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Network(err.to_string())
    } else {
        TransportError::Http(err)
    }
}

async fn status_error(resp: Response) -> TransportError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    TransportError::HttpStatus { status, body }
}

async fn read_envelope(resp: Response) -> Result<TxResponseEnvelope, TransportError> {
    resp.json::<TxResponseEnvelope>().await.map_err(|e| {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::InvalidResponse(e.to_string())
        }
    })
}

#[async_trait]
impl Transport for RestTransport {
    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> Result<ChainResponse, TransportError> {
        let hash = self.submit(&tx_bytes, SubmitMode::Sync).await?.txhash;
        tracing::debug!(hash = %hash, "Passed check, waiting for inclusion");
        loop {
            futures_timer::Delay::new(self.poll_interval).await;
            match self.fetch_tx(&hash).await? {
                Some(included) => return Ok(included.into()),
                None => tracing::debug!(hash = %hash, "Not yet included"),
            }
        }
    }

    async fn submit_no_wait(
        &self,
        tx_bytes: Vec<u8>,
        mode: SubmitMode,
    ) -> Result<String, TransportError> {
        Ok(self.submit(&tx_bytes, mode).await?.txhash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::{broadcast_with_timeout, BroadcastOutcome};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const CHECKED: &str = r#"{"tx_response":{"height":"0","txhash":"ABCD","code":0,"raw_log":"","gas_wanted":"0","gas_used":"0"}}"#;

    /// Read one request and return its request line.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed mid-request");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .map(|v| v.trim().parse::<usize>().unwrap())
            .unwrap_or(0);
        while buf.len() < header_end + body_len {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }

        head.lines().next().unwrap_or_default().to_string()
    }

    /// Serve every connection with `route(request_line) -> (status, body)`.
    async fn serve(route: fn(&str) -> (u16, &'static str)) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let request = read_request(&mut socket).await;
                    let (status, body) = route(&request);
                    let reason = if status == 200 { "OK" } else { "Not Found" };
                    let response = format!(
                        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        reason,
                        body.len(),
                        body
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{}", addr)
    }

    /// Accept connections and never answer.
    async fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    /// Passes the mempool check, never gets included.
    fn checked_never_included(request: &str) -> (u16, &'static str) {
        if request.starts_with("post") {
            (200, CHECKED)
        } else {
            (404, r#"{"code":5,"message":"tx not found"}"#)
        }
    }

    #[test]
    fn test_trims_trailing_slash() {
        let transport = RestTransport::new("http://localhost:1317/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:1317");
        assert_eq!(transport.request_timeout(), DEFAULT_BROADCAST_TIMEOUT);
    }

    #[test]
    fn test_broadcast_request_shape() {
        let request = BroadcastTxRequest {
            tx_bytes: STANDARD.encode([1u8, 2, 3]),
            mode: "BROADCAST_MODE_SYNC".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tx_bytes"], "AQID");
        assert_eq!(json["mode"], "BROADCAST_MODE_SYNC");
    }

    #[tokio::test]
    async fn test_checked_but_not_included_is_never_success() {
        let url = serve(checked_never_included).await;
        let transport = RestTransport::new(&url)
            .unwrap()
            .with_poll_interval(Duration::from_millis(20));

        let hash = transport
            .submit_no_wait(vec![1, 2, 3], SubmitMode::Sync)
            .await
            .unwrap();
        assert_eq!(hash, "ABCD");

        let outcome =
            broadcast_with_timeout(&transport, vec![1, 2, 3], Duration::from_millis(300)).await;
        assert_eq!(
            outcome,
            BroadcastOutcome::SubmissionError {
                reason: "timeout".into()
            }
        );
    }

    #[tokio::test]
    async fn test_included_transaction_is_classified() {
        fn included(request: &str) -> (u16, &'static str) {
            if request.starts_with("post") {
                (200, CHECKED)
            } else {
                (
                    200,
                    r#"{"tx_response":{"height":"57","txhash":"ABCD","code":0,"gas_wanted":"200000","gas_used":"81000","events":[]}}"#,
                )
            }
        }

        let url = serve(included).await;
        let transport = RestTransport::new(&url)
            .unwrap()
            .with_poll_interval(Duration::from_millis(10));
        let outcome = broadcast_with_timeout(&transport, vec![1], Duration::from_secs(5)).await;
        let BroadcastOutcome::Success { height, .. } = outcome else {
            panic!("expected success, got {:?}", outcome);
        };
        assert_eq!(height, 57);
    }

    #[tokio::test]
    async fn test_check_rejection_is_rejected() {
        fn rejected(_: &str) -> (u16, &'static str) {
            (
                200,
                r#"{"tx_response":{"height":"0","txhash":"ABCD","code":32,"raw_log":"account sequence mismatch"}}"#,
            )
        }

        let url = serve(rejected).await;
        let transport = RestTransport::new(&url).unwrap();
        let err = transport
            .submit_no_wait(vec![1], SubmitMode::Sync)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Rejected { code: 32, .. }));
    }

    #[tokio::test]
    async fn test_request_timeout_reports_timeout() {
        let url = serve_silence().await;
        let transport = RestTransport::new(&url)
            .unwrap()
            .with_request_timeout(Duration::from_millis(100));

        let err = transport.broadcast_tx(vec![1]).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout), "{:?}", err);

        let outcome = broadcast_with_timeout(&transport, vec![1], Duration::from_secs(5)).await;
        assert_eq!(
            outcome,
            BroadcastOutcome::SubmissionError {
                reason: "timeout".into()
            }
        );
    }
}
