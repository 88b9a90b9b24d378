//! Proof-exchange client
//!
//! Single-shot exchange: connect, send one `ProofRequest`, collect
//! responses until `EndOfBatch`, verify what can be verified locally, and
//! summarize per-statement outcomes. The overall deadline is enforced
//! end-to-end here; there are no retries on the same connection, and a
//! cryptographic failure is never retried at all.

use std::net::SocketAddr;
use std::time::Duration;

use privacyzk_curve::SecureRng;
use privacyzk_statements::{ProofBackend, ProofContext, ZKProof};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{ExchangeError, ExchangeResult};
use crate::frames::{read_message, write_message};
use crate::messages::{
    Frame, ProofRequest, ProofResponse, ResponseStatus, StatementSelector, WireStatement,
};
use crate::{DEFAULT_TOTAL_TIMEOUT_SECS, FRAME_TIMEOUT_SECS};

/// Client policy for one exchange
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// End-to-end deadline for the whole exchange
    pub total_timeout: Duration,
    /// Refuse anything that is not `prove_mode = "real"`; disables any
    /// local downgrade
    pub require_real: bool,
    /// Downgrade unavailable statements to an annotated local sigma
    /// proof instead of surfacing UNAVAILABLE
    pub allow_fallback: bool,
    /// Identity used for locally generated fallback proofs
    pub local_peer_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            total_timeout: Duration::from_secs(DEFAULT_TOTAL_TIMEOUT_SECS),
            require_real: false,
            allow_fallback: false,
            local_peer_id: "local".to_string(),
        }
    }
}

/// Final status of one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Verified (or verbatim real artifacts accepted)
    Ok,
    /// Server has no artifacts for the statement
    Unavailable,
    /// Proving, transport, or verification failed
    Failed,
}

/// Per-statement result surfaced to the caller
#[derive(Debug, Clone)]
pub struct StatementOutcome {
    /// The statement this outcome describes
    pub statement: WireStatement,
    /// Final status
    pub status: OutcomeStatus,
    /// Failure reason, tagged with the statement (e.g. `membership_v2: ...`)
    pub reason: Option<String>,
    /// Prove mode reported by the server (or `local-sigma` after fallback)
    pub prove_mode: String,
    /// Set when this outcome came from a local downgrade
    pub fallback: bool,
    /// Raw proof bytes as received
    pub proof_bytes: Vec<u8>,
    /// Decoded proof when the payload was a Sigma proof envelope
    pub proof: Option<ZKProof>,
}

impl StatementOutcome {
    /// Render as `OK`, `FAIL(reason)`, or `UNAVAILABLE`, with a fallback
    /// marker when a local downgrade happened.
    pub fn summary(&self) -> String {
        let mut rendered = match &self.status {
            OutcomeStatus::Ok => "OK".to_string(),
            OutcomeStatus::Unavailable => "UNAVAILABLE".to_string(),
            OutcomeStatus::Failed => format!(
                "FAIL({})",
                self.reason.as_deref().unwrap_or("unspecified")
            ),
        };
        if self.fallback {
            rendered.push_str(" [FALLBACK]");
        }
        rendered
    }
}

/// The demo-status gate: all three statements OK with no fallback marker.
pub fn demo_status(outcomes: &[StatementOutcome]) -> bool {
    outcomes.len() == WireStatement::ORDERED.len()
        && outcomes
            .iter()
            .all(|o| o.status == OutcomeStatus::Ok && !o.fallback)
}

/// Proof-exchange client
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    config: ClientConfig,
}

impl ExchangeClient {
    /// Client with the given policy
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Connect over TCP and run one exchange
    pub async fn request_from_addr(
        &self,
        addr: SocketAddr,
        selector: StatementSelector,
    ) -> ExchangeResult<Vec<StatementOutcome>> {
        let run = async {
            let stream = TcpStream::connect(addr).await?;
            self.drive(stream, selector).await
        };
        timeout(self.config.total_timeout, run)
            .await
            .map_err(|_| ExchangeError::Timeout("client exchange deadline".into()))?
    }

    /// Run one exchange over an established stream (duplex pipes in tests).
    pub async fn exchange<S>(
        &self,
        stream: S,
        selector: StatementSelector,
    ) -> ExchangeResult<Vec<StatementOutcome>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        timeout(self.config.total_timeout, self.drive(stream, selector))
            .await
            .map_err(|_| ExchangeError::Timeout("client exchange deadline".into()))?
    }

    async fn drive<S>(
        &self,
        mut stream: S,
        selector: StatementSelector,
    ) -> ExchangeResult<Vec<StatementOutcome>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let frame_timeout = Duration::from_secs(FRAME_TIMEOUT_SECS);
        let mut rng = SecureRng::new();
        let nonce: [u8; 16] = rng.random_array();
        let deadline_ms = self.config.total_timeout.as_millis().min(u32::MAX as u128) as u32;

        let request = ProofRequest::new(selector, nonce, deadline_ms);
        request.validate()?;
        write_message(&mut stream, &Frame::ProofRequest(request), frame_timeout).await?;
        debug!(?selector, "proof request sent");

        let mut expected = selector.expand().into_iter();
        let mut outcomes = Vec::new();
        loop {
            // Individual frame reads run against the overall deadline, not
            // the short per-frame bound: proving legitimately takes a while.
            let frame = read_message(&mut stream, self.config.total_timeout).await?;
            match frame {
                Frame::EndOfBatch => break,
                Frame::ProofResponse(response) => {
                    response.validate()?;
                    let Some(awaited) = expected.next() else {
                        return Err(ExchangeError::Schema("response after batch".into()));
                    };
                    if response.statement != awaited {
                        return Err(ExchangeError::Schema(format!(
                            "expected {awaited}, server answered {}",
                            response.statement
                        )));
                    }
                    outcomes.push(self.settle(response));
                }
                Frame::ProofRequest(_) => {
                    return Err(ExchangeError::Schema("request frame from server".into()));
                }
            }
        }

        if expected.next().is_some() {
            return Err(ExchangeError::Schema(
                "batch ended before all statements answered".into(),
            ));
        }
        Ok(outcomes)
    }

    /// Turn one wire response into a surfaced outcome.
    fn settle(&self, response: ProofResponse) -> StatementOutcome {
        let statement = response.statement;
        let tag = statement.tag();

        match response.status {
            ResponseStatus::Ok => {
                if self.config.require_real && response.meta.prove_mode != "real" {
                    return failed(
                        statement,
                        &response.meta.prove_mode,
                        format!(
                            "{tag}: expected prove_mode=real, got {}",
                            response.meta.prove_mode
                        ),
                    );
                }

                let proof_bytes = response
                    .proof_cbor
                    .map(|b| b.into_vec())
                    .unwrap_or_default();

                if response.meta.prove_mode == "real" {
                    // Pre-generated artifacts are forwarded verbatim; their
                    // verification keys are opaque to the Sigma core.
                    return StatementOutcome {
                        statement,
                        status: OutcomeStatus::Ok,
                        reason: None,
                        prove_mode: response.meta.prove_mode,
                        fallback: false,
                        proof_bytes,
                        proof: None,
                    };
                }

                match self.verify_sigma(&tag, &proof_bytes) {
                    Ok(proof) => StatementOutcome {
                        statement,
                        status: OutcomeStatus::Ok,
                        reason: None,
                        prove_mode: response.meta.prove_mode,
                        fallback: false,
                        proof_bytes,
                        proof: Some(proof),
                    },
                    Err(reason) => failed(statement, &response.meta.prove_mode, reason),
                }
            }
            ResponseStatus::NotAvailable => {
                if self.config.allow_fallback && !self.config.require_real {
                    return self.local_fallback(statement);
                }
                StatementOutcome {
                    statement,
                    status: OutcomeStatus::Unavailable,
                    reason: response.error,
                    prove_mode: response.meta.prove_mode,
                    fallback: false,
                    proof_bytes: Vec::new(),
                    proof: None,
                }
            }
            ResponseStatus::Failed => {
                let reason = response
                    .error
                    .unwrap_or_else(|| format!("{tag}: unspecified failure"));
                failed(statement, &response.meta.prove_mode, reason)
            }
        }
    }

    fn verify_sigma(&self, tag: &str, proof_bytes: &[u8]) -> Result<ZKProof, String> {
        let proof =
            ZKProof::from_cbor(proof_bytes).map_err(|e| format!("{tag}: {e}"))?;
        ProofBackend::new()
            .verify(&proof)
            .map_err(|e| format!("{tag}: {e}"))?;
        Ok(proof)
    }

    /// Generate an annotated local proof for a statement the server could
    /// not serve. The downgrade is always observable: `fallback` is set on
    /// the outcome and in the prove mode.
    fn local_fallback(&self, statement: WireStatement) -> StatementOutcome {
        warn!(%statement, "server unavailable, generating local fallback proof");
        let backend = ProofBackend::new();
        let context = ProofContext::new(self.config.local_peer_id.clone(), "local-fallback");

        let proved = match statement {
            WireStatement::Membership => backend.membership(&context),
            WireStatement::Continuity => backend.continuity(&context),
            WireStatement::Unlinkability => backend.unlinkability(&context),
        };

        match proved.and_then(|proof| {
            backend.verify(&proof)?;
            Ok(proof)
        }) {
            Ok(proof) => {
                let proof_bytes = proof.to_cbor().unwrap_or_default();
                StatementOutcome {
                    statement,
                    status: OutcomeStatus::Ok,
                    reason: None,
                    prove_mode: "local-sigma".to_string(),
                    fallback: true,
                    proof_bytes,
                    proof: Some(proof),
                }
            }
            Err(e) => failed(
                statement,
                "local-sigma",
                format!("{}: local fallback failed: {e}", statement.tag()),
            ),
        }
    }
}

fn failed(statement: WireStatement, prove_mode: &str, reason: String) -> StatementOutcome {
    info!(%statement, %reason, "statement failed");
    StatementOutcome {
        statement,
        status: OutcomeStatus::Failed,
        reason: Some(reason),
        prove_mode: prove_mode.to_string(),
        fallback: false,
        proof_bytes: Vec::new(),
        proof: None,
    }
}
