//! Proof-exchange protocol scenarios over in-process streams

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use privacyzk::prelude::*;
use privacyzk_exchange::{
    demo_status, serve_connection, CancelFlag, ExchangeError, ExchangeResult, OutcomeStatus,
    ProofPayload, ProofProvider, ProofRequest,
};

fn sigma_provider() -> Arc<dyn ProofProvider> {
    Arc::new(SigmaProvider::new("peer-A").with_session("s1"))
}

fn client(timeout_secs: u64) -> ExchangeClient {
    ExchangeClient::new(ClientConfig {
        total_timeout: Duration::from_secs(timeout_secs),
        require_real: false,
        allow_fallback: false,
        local_peer_id: "test-client".into(),
    })
}

/// Byte-counting stream wrapper for wire-size assertions
struct Counted<S> {
    inner: S,
    bytes: Arc<AtomicUsize>,
}

impl<S: AsyncRead + Unpin> AsyncRead for Counted<S> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let before = buf.filled().len();
        let poll = Pin::new(&mut self.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = poll {
            self.bytes
                .fetch_add(buf.filled().len() - before, Ordering::Relaxed);
        }
        poll
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for Counted<S> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        let poll = Pin::new(&mut self.inner).poll_write(cx, data);
        if let Poll::Ready(Ok(written)) = poll {
            self.bytes.fetch_add(written, Ordering::Relaxed);
        }
        poll
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

// Scenario: sigma server, statement "all". Three OK responses in the
// fixed order, total wire traffic under 8 KiB, no fallback marker.
#[tokio::test]
async fn sigma_batch_is_ordered_and_compact() {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_connection(
        server_side,
        sigma_provider(),
        ServerConfig::default(),
    ));

    let bytes = Arc::new(AtomicUsize::new(0));
    let counted = Counted {
        inner: client_side,
        bytes: bytes.clone(),
    };

    let outcomes = client(30)
        .exchange(counted, StatementSelector::All)
        .await
        .unwrap();
    server.await.unwrap().unwrap();

    assert_eq!(outcomes.len(), 3);
    let statements: Vec<_> = outcomes.iter().map(|o| o.statement).collect();
    assert_eq!(statements, WireStatement::ORDERED.to_vec());
    for outcome in &outcomes {
        assert_eq!(outcome.status, OutcomeStatus::Ok, "{}", outcome.summary());
        assert!(!outcome.fallback);
        assert_eq!(outcome.prove_mode, "sigma");
    }
    assert!(demo_status(&outcomes));

    let total = bytes.load(Ordering::Relaxed);
    assert!(total < 8 * 1024, "wire traffic was {total} bytes");
}

#[tokio::test]
async fn single_statement_request() {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_connection(
        server_side,
        sigma_provider(),
        ServerConfig::default(),
    ));

    let outcomes = client(30)
        .exchange(client_side, StatementSelector::Continuity)
        .await
        .unwrap();
    server.await.unwrap().unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].statement, WireStatement::Continuity);
    assert_eq!(outcomes[0].status, OutcomeStatus::Ok);
    assert!(outcomes[0].proof.is_some());
}

/// Provider that refuses membership with a Merkle failure but serves the
/// other statements. Exercises the per-statement failure surface.
struct BrokenMembership(SigmaProvider);

impl ProofProvider for BrokenMembership {
    fn prove_mode(&self) -> &'static str {
        "sigma"
    }

    fn get_proof(
        &self,
        statement: WireStatement,
        request: &ProofRequest,
        cancel: &CancelFlag,
    ) -> ExchangeResult<ProofPayload> {
        if statement == WireStatement::Membership {
            // A leaf outside the tree refuses to prove
            return Err(ExchangeError::Statement {
                tag: statement.tag(),
                source: privacyzk_statements::StatementError::BadMerklePath,
            });
        }
        self.0.get_proof(statement, request, cancel)
    }
}

// Scenario: membership leaf is not in the tree. The server refuses to
// emit and the failure reaches the client tagged membership_v2.
#[tokio::test]
async fn membership_failure_is_surfaced_with_tag() {
    let provider = Arc::new(BrokenMembership(
        SigmaProvider::new("peer-A").with_session("s1"),
    ));
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_connection(
        server_side,
        provider,
        ServerConfig::default(),
    ));

    let outcomes = client(30)
        .exchange(client_side, StatementSelector::All)
        .await
        .unwrap();
    server.await.unwrap().unwrap();

    assert_eq!(outcomes[0].statement, WireStatement::Membership);
    assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
    let reason = outcomes[0].reason.as_deref().unwrap();
    assert!(reason.contains("membership_v2"), "reason: {reason}");

    // The other statements still arrive, in order
    assert_eq!(outcomes[1].status, OutcomeStatus::Ok);
    assert_eq!(outcomes[2].status, OutcomeStatus::Ok);
    assert!(!demo_status(&outcomes));
}

/// Provider that stalls long enough for the client to give up, then
/// hands the shared flag to a real prover. By the time proving starts the
/// peer is gone, so the prover's own scalar-mul checkpoints abort it.
struct SlowProvider;

impl ProofProvider for SlowProvider {
    fn prove_mode(&self) -> &'static str {
        "sigma"
    }

    fn get_proof(
        &self,
        statement: WireStatement,
        request: &ProofRequest,
        cancel: &CancelFlag,
    ) -> ExchangeResult<ProofPayload> {
        std::thread::sleep(Duration::from_secs(2));
        SigmaProvider::new("slow-peer").get_proof(statement, request, cancel)
    }
}

// Scenario: client deadline far shorter than server proving time.
// The client times out; the server discards in-flight work and emits no
// partial proof.
#[tokio::test]
async fn client_deadline_cancels_slow_server() {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_connection(
        server_side,
        Arc::new(SlowProvider),
        ServerConfig::default(),
    ));

    let client = ExchangeClient::new(ClientConfig {
        total_timeout: Duration::from_millis(300),
        require_real: false,
        allow_fallback: false,
        local_peer_id: "test-client".into(),
    });

    let result = client
        .exchange(client_side, StatementSelector::Unlinkability)
        .await;
    assert!(matches!(result, Err(ExchangeError::Timeout(_))));

    // Server notices the closed stream and ends without a batch
    let server_result = server.await.unwrap();
    assert!(server_result.is_err());
}

fn provision_fixtures(dir: &std::path::Path) {
    for (statement, depth) in [("membership", 16), ("continuity", 0), ("unlinkability", 0)] {
        let base = dir.join(statement).join("v2").join(format!("depth-{depth}"));
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(base.join(format!("{statement}_vk.bin")), b"vk").unwrap();
        std::fs::write(base.join("public_inputs.bin"), b"inputs").unwrap();
        std::fs::write(
            base.join(format!("{statement}_proof.bin")),
            format!("proof-{statement}"),
        )
        .unwrap();
    }
}

#[tokio::test]
async fn fixture_mode_forwards_artifacts_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    provision_fixtures(dir.path());
    let provider = Arc::new(FixtureProvider::new(privacyzk::assets::AssetStore::new(
        dir.path(),
    )));

    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_connection(
        server_side,
        provider,
        ServerConfig::default(),
    ));

    let client = ExchangeClient::new(ClientConfig {
        total_timeout: Duration::from_secs(30),
        require_real: true,
        allow_fallback: false,
        local_peer_id: "test-client".into(),
    });
    let outcomes = client
        .exchange(client_side, StatementSelector::All)
        .await
        .unwrap();
    server.await.unwrap().unwrap();

    for outcome in &outcomes {
        assert_eq!(outcome.status, OutcomeStatus::Ok);
        assert_eq!(outcome.prove_mode, "real");
        assert_eq!(
            outcome.proof_bytes,
            format!("proof-{}", outcome.statement).into_bytes()
        );
    }
}

// The require-real gate refuses sigma proofs outright; no silent downgrade.
#[tokio::test]
async fn require_real_refuses_sigma_mode() {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_connection(
        server_side,
        sigma_provider(),
        ServerConfig::default(),
    ));

    let client = ExchangeClient::new(ClientConfig {
        total_timeout: Duration::from_secs(30),
        require_real: true,
        allow_fallback: false,
        local_peer_id: "test-client".into(),
    });
    let outcomes = client
        .exchange(client_side, StatementSelector::Continuity)
        .await
        .unwrap();
    server.await.unwrap().unwrap();

    assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
    assert!(outcomes[0]
        .reason
        .as_deref()
        .unwrap()
        .contains("expected prove_mode=real"));
}

// A downgrade to a local proof must be observable in the outcome.
#[tokio::test]
async fn fallback_is_annotated() {
    let dir = tempfile::tempdir().unwrap(); // empty store: everything unavailable
    let provider = Arc::new(FixtureProvider::new(privacyzk::assets::AssetStore::new(
        dir.path(),
    )));

    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_connection(
        server_side,
        provider,
        ServerConfig::default(),
    ));

    let client = ExchangeClient::new(ClientConfig {
        total_timeout: Duration::from_secs(30),
        require_real: false,
        allow_fallback: true,
        local_peer_id: "fallback-peer".into(),
    });
    let outcomes = client
        .exchange(client_side, StatementSelector::Unlinkability)
        .await
        .unwrap();
    server.await.unwrap().unwrap();

    assert_eq!(outcomes[0].status, OutcomeStatus::Ok);
    assert!(outcomes[0].fallback);
    assert_eq!(outcomes[0].prove_mode, "local-sigma");
    assert!(outcomes[0].summary().contains("FALLBACK"));
    // The fallback marker keeps the demo gate shut
    assert!(!demo_status(&outcomes));
}

#[tokio::test]
async fn unavailable_without_fallback_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FixtureProvider::new(privacyzk::assets::AssetStore::new(
        dir.path(),
    )));

    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(serve_connection(
        server_side,
        provider,
        ServerConfig::default(),
    ));

    let outcomes = client(30)
        .exchange(client_side, StatementSelector::Membership)
        .await
        .unwrap();
    server.await.unwrap().unwrap();

    assert_eq!(outcomes[0].status, OutcomeStatus::Unavailable);
    assert_eq!(outcomes[0].summary(), "UNAVAILABLE");
}

#[tokio::test]
async fn tcp_round_trip_end_to_end() {
    let server = ExchangeServer::bind(
        "127.0.0.1:0".parse().unwrap(),
        sigma_provider(),
        ServerConfig::default(),
    )
    .await
    .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    let outcomes = client(30)
        .request_from_addr(addr, StatementSelector::All)
        .await
        .unwrap();
    assert!(demo_status(&outcomes));
}
