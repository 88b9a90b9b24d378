//! Proof-exchange server
//!
//! Accepts connections, answers one `ProofRequest` per stream, and
//! terminates the exchange with `EndOfBatch`. Proving is CPU-bound and
//! runs on the blocking pool; network IO stays on the cooperative
//! scheduler and no lock is held across a network wait.
//!
//! Per-statement lifecycle is `Loading -> Proving -> Responded`.
//! Statements prove concurrently, but responses are released in the fixed
//! order membership -> continuity -> unlinkability: completions are
//! buffered until every earlier statement has been written, so a slow
//! statement never reorders the batch (it only delays its successors'
//! delivery, not their proving).

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use privacyzk_statements::CancelFlag;

use crate::error::{ExchangeError, ExchangeResult};
use crate::frames::{read_frame, write_message};
use crate::messages::{Frame, ProofResponse, ResponseStatus, WireStatement};
use crate::provider::{response_meta, ProofPayload, ProofProvider};
use crate::{DEFAULT_TOTAL_TIMEOUT_SECS, FRAME_TIMEOUT_SECS, MAX_REQUEST_BYTES};

/// Per-statement server-side state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatementState {
    /// Request accepted, statement queued
    Loading,
    /// Proving on the CPU pool
    Proving,
    /// Response frame written
    Responded,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Upper bound for one whole exchange (the server's own bound; the
    /// client enforces its deadline end-to-end)
    pub total_timeout: Duration,
    /// Per-frame read/write timeout
    pub frame_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            total_timeout: Duration::from_secs(DEFAULT_TOTAL_TIMEOUT_SECS),
            frame_timeout: Duration::from_secs(FRAME_TIMEOUT_SECS),
        }
    }
}

/// TCP-bound proof-exchange server
pub struct ExchangeServer {
    listener: TcpListener,
    provider: Arc<dyn ProofProvider>,
    config: ServerConfig,
}

impl ExchangeServer {
    /// Bind a listener and serve the given provider
    pub async fn bind(
        addr: SocketAddr,
        provider: Arc<dyn ProofProvider>,
        config: ServerConfig,
    ) -> ExchangeResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, mode = provider.prove_mode(), "proof-exchange server listening");
        Ok(Self {
            listener,
            provider,
            config,
        })
    }

    /// The bound address
    pub fn local_addr(&self) -> ExchangeResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop; one cooperative task per connection
    pub async fn run(self) -> ExchangeResult<()> {
        loop {
            let (socket, peer) = self.listener.accept().await?;
            debug!(%peer, "accepted proof-exchange stream");
            let provider = self.provider.clone();
            let config = self.config.clone();
            tokio::spawn(async move {
                if let Err(e) = serve_connection(socket, provider, config).await {
                    warn!(%peer, error = %e, "exchange ended with error");
                }
            });
        }
    }
}

/// Serve one exchange over an established stream.
///
/// Exposed for in-process tests over duplex pipes; `ExchangeServer::run`
/// calls this per accepted socket.
pub async fn serve_connection<S>(
    stream: S,
    provider: Arc<dyn ProofProvider>,
    config: ServerConfig,
) -> ExchangeResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    match timeout(config.total_timeout, drive(stream, provider, &config)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("exchange exceeded server bound, closing");
            Err(ExchangeError::Timeout("server exchange bound".into()))
        }
    }
}

async fn drive<S>(
    stream: S,
    provider: Arc<dyn ProofProvider>,
    config: &ServerConfig,
) -> ExchangeResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    let request_body = read_frame(&mut reader, config.frame_timeout).await?;
    if request_body.len() > MAX_REQUEST_BYTES {
        return Err(ExchangeError::SizeLimit(format!(
            "request body {} bytes",
            request_body.len()
        )));
    }
    let request = match Frame::from_cbor(&request_body)? {
        Frame::ProofRequest(request) => request,
        other => {
            warn!(?other, "unexpected first frame");
            return Err(ExchangeError::Schema("expected ProofRequest".into()));
        }
    };

    if let Err(e) = request.validate() {
        // Answer malformed requests with a single failed response so the
        // client sees a structured error rather than a dropped stream.
        let statement = request.statement.expand()[0];
        let response = ProofResponse::error(
            statement,
            request.depth,
            ResponseStatus::Failed,
            format!("bad request: {e}"),
            response_meta(statement, provider.prove_mode()),
        );
        write_message(
            &mut writer,
            &Frame::ProofResponse(response),
            config.frame_timeout,
        )
        .await?;
        write_message(&mut writer, &Frame::EndOfBatch, config.frame_timeout).await?;
        return Ok(());
    }

    let statements = request.statement.expand();
    let cancel = CancelFlag::new();
    let mut states = vec![StatementState::Loading; statements.len()];
    for (index, statement) in statements.iter().enumerate() {
        debug!(%statement, state = ?states[index], "statement accepted");
    }

    // Watchdog: the client closing the stream aborts in-flight proving at
    // the provers' next scalar-multiplication checkpoint. No further
    // frames are expected from the client.
    let watchdog_cancel = cancel.clone();
    let watchdog = tokio::spawn(async move {
        let mut buf = [0u8; 1];
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => watchdog_cancel.cancel(),
            Ok(_) => watchdog_cancel.cancel(),
        }
        reader
    });

    // Dispatch every statement to the CPU pool up front
    let (tx, mut rx) = mpsc::channel::<(usize, WireStatement, ExchangeResult<ProofPayload>)>(
        statements.len().max(1),
    );
    for (index, statement) in statements.iter().copied().enumerate() {
        states[index] = StatementState::Proving;
        debug!(%statement, state = ?states[index], "dispatched to prover pool");
        let provider = provider.clone();
        let request = request.clone();
        let cancel = cancel.clone();
        let tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = provider.get_proof(statement, &request, &cancel);
            let _ = tx.blocking_send((index, statement, result));
        });
    }
    drop(tx);

    // Buffer completions, release strictly in request order
    let mut completed: BTreeMap<usize, (WireStatement, ExchangeResult<ProofPayload>)> =
        BTreeMap::new();
    let mut next_to_send = 0usize;
    let outcome = 'exchange: loop {
        if next_to_send >= statements.len() {
            break Ok(());
        }
        let Some((index, statement, result)) = rx.recv().await else {
            break Err(ExchangeError::Provider("prover pool closed early".into()));
        };
        completed.insert(index, (statement, result));

        while let Some((statement, result)) = completed.remove(&next_to_send) {
            if cancel.is_cancelled() {
                // Peer is gone; discard finished proofs, emit nothing partial
                break 'exchange Err(ExchangeError::PeerClosed);
            }
            let response = match build_response(statement, result, provider.prove_mode()) {
                Ok(response) => response,
                Err(e) => break 'exchange Err(e),
            };
            if let Err(e) = write_message(
                &mut writer,
                &Frame::ProofResponse(response),
                config.frame_timeout,
            )
            .await
            {
                cancel.cancel();
                break 'exchange Err(e);
            }
            states[next_to_send] = StatementState::Responded;
            debug!(%statement, state = ?states[next_to_send], "response released");
            next_to_send += 1;
        }

        if cancel.is_cancelled() {
            break Err(ExchangeError::PeerClosed);
        }
    };

    match outcome {
        Ok(()) => {
            write_message(&mut writer, &Frame::EndOfBatch, config.frame_timeout).await?;
            debug!("exchange complete");
            watchdog.abort();
            Ok(())
        }
        Err(e) => {
            info!(error = %e, "exchange cancelled, in-flight proofs discarded");
            watchdog.abort();
            Err(e)
        }
    }
}

fn build_response(
    statement: WireStatement,
    result: ExchangeResult<ProofPayload>,
    prove_mode: &str,
) -> ExchangeResult<ProofResponse> {
    let depth = statement.expected_depth();
    let response = match result {
        Ok(payload) => {
            ProofResponse::ok(statement, depth, payload.proof_cbor, payload.meta)
        }
        Err(ExchangeError::Cancelled) => return Err(ExchangeError::Cancelled),
        Err(ExchangeError::NotAvailable(msg)) => ProofResponse::error(
            statement,
            depth,
            ResponseStatus::NotAvailable,
            msg,
            response_meta(statement, prove_mode),
        ),
        Err(ExchangeError::Statement { tag, source }) => ProofResponse::error(
            statement,
            depth,
            ResponseStatus::Failed,
            format!("{tag}: {source}"),
            response_meta(statement, prove_mode),
        ),
        Err(other) => ProofResponse::error(
            statement,
            depth,
            ResponseStatus::Failed,
            other.to_string(),
            response_meta(statement, prove_mode),
        ),
    };
    response.validate()?;
    Ok(response)
}
