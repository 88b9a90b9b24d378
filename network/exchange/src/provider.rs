//! Proof providers: where response payloads come from
//!
//! Two prove modes exist behind one trait:
//!
//! - [`FixtureProvider`] (`prove-mode = "real"`): loads pre-generated
//!   artifacts from the asset store and forwards them verbatim
//! - [`SigmaProvider`] (`prove-mode = "sigma"`): runs the in-process
//!   Sigma prover for the server's own identity
//!
//! Providers run on the blocking CPU pool. The shared [`CancelFlag`] is
//! handed down into the Sigma provers, which poll it before each group of
//! scalar multiplications; a closed stream therefore interrupts a proof
//! mid-protocol, not just between statements, and nothing partial is ever
//! emitted.

use privacyzk_assets::{AssetError, AssetStore};
use privacyzk_statements::{CancelFlag, ProofBackend, ProofContext, StatementError};
use tracing::debug;

use crate::error::{ExchangeError, ExchangeResult};
use crate::messages::{ProofRequest, ResponseMeta, WireStatement};
use crate::SCHEMA_VERSION;

/// One statement's response payload
#[derive(Debug, Clone)]
pub struct ProofPayload {
    /// Encoded proof bytes forwarded to the client
    pub proof_cbor: Vec<u8>,
    /// Metadata surfaced alongside the proof
    pub meta: ResponseMeta,
}

/// Source of per-statement proof payloads
pub trait ProofProvider: Send + Sync + 'static {
    /// The prove mode this provider implements (`real` or `sigma`)
    fn prove_mode(&self) -> &'static str;

    /// Produce the payload for one statement of a validated request.
    ///
    /// Runs on the blocking pool. Implementations poll `cancel` at their
    /// work boundaries (the Sigma provers poll it before every scalar
    /// multiplication group) and must not emit partial results.
    fn get_proof(
        &self,
        statement: WireStatement,
        request: &ProofRequest,
        cancel: &CancelFlag,
    ) -> ExchangeResult<ProofPayload>;
}

fn validate_statement_depth(statement: WireStatement, depth: u8) -> ExchangeResult<()> {
    let expected = statement.expected_depth();
    if depth != expected {
        return Err(ExchangeError::Schema(format!(
            "statement {statement} expects depth {expected}, got {depth}"
        )));
    }
    Ok(())
}

/// Metadata skeleton for a statement under a prove mode
pub fn response_meta(statement: WireStatement, prove_mode: &str) -> ResponseMeta {
    ResponseMeta {
        depth: statement.expected_depth(),
        fallback: false,
        prove_mode: prove_mode.to_string(),
        schema_version: SCHEMA_VERSION,
        statement: statement.as_str().to_string(),
    }
}

/// Serves pre-generated artifacts from the asset store (`prove-mode real`)
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    store: AssetStore,
}

impl FixtureProvider {
    /// Provider over the given asset store
    pub fn new(store: AssetStore) -> Self {
        Self { store }
    }
}

impl ProofProvider for FixtureProvider {
    fn prove_mode(&self) -> &'static str {
        "real"
    }

    fn get_proof(
        &self,
        statement: WireStatement,
        request: &ProofRequest,
        cancel: &CancelFlag,
    ) -> ExchangeResult<ProofPayload> {
        if cancel.is_cancelled() {
            return Err(ExchangeError::Cancelled);
        }
        validate_statement_depth(statement, statement.expected_depth())?;

        let bundle = self
            .store
            .load(
                statement.as_str(),
                request.schema_version,
                statement.expected_depth(),
            )
            .map_err(|e| match e {
                AssetError::NotAvailable(msg) => ExchangeError::NotAvailable(msg),
                AssetError::BadAsset(msg) => ExchangeError::Provider(msg),
            })?;

        if cancel.is_cancelled() {
            return Err(ExchangeError::Cancelled);
        }
        debug!(%statement, bytes = bundle.proof.len(), "serving fixture proof");

        Ok(ProofPayload {
            proof_cbor: bundle.proof,
            meta: response_meta(statement, self.prove_mode()),
        })
    }
}

/// Runs the in-process Sigma prover (`prove-mode sigma`)
#[derive(Debug, Clone)]
pub struct SigmaProvider {
    backend: ProofBackend,
    peer_id: String,
    session_id: Option<String>,
}

impl SigmaProvider {
    /// Prover for the server's own identity
    pub fn new(peer_id: impl Into<String>) -> Self {
        Self {
            backend: ProofBackend::new(),
            peer_id: peer_id.into(),
            session_id: None,
        }
    }

    /// Pin the session id instead of deriving it from the request nonce
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Override the statement backend profile
    pub fn with_backend(mut self, backend: ProofBackend) -> Self {
        self.backend = backend;
        self
    }

    fn context_for(&self, request: &ProofRequest) -> ProofContext {
        // Binding the session to the request nonce makes each exchange's
        // context (and therefore its challenges) unique per request.
        let session_id = self
            .session_id
            .clone()
            .unwrap_or_else(|| hex::encode(&request.nonce));
        ProofContext::new(self.peer_id.clone(), session_id)
    }
}

impl ProofProvider for SigmaProvider {
    fn prove_mode(&self) -> &'static str {
        "sigma"
    }

    fn get_proof(
        &self,
        statement: WireStatement,
        request: &ProofRequest,
        cancel: &CancelFlag,
    ) -> ExchangeResult<ProofPayload> {
        if cancel.is_cancelled() {
            return Err(ExchangeError::Cancelled);
        }
        validate_statement_depth(statement, statement.expected_depth())?;

        // The backend shares the exchange's flag, so the provers poll it
        // before each scalar-multiplication group and a closed stream
        // interrupts proving mid-protocol.
        let backend = self.backend.clone().with_cancel_flag(cancel.clone());
        let context = self.context_for(request);
        let proof = match statement {
            WireStatement::Membership => backend.membership(&context),
            WireStatement::Continuity => backend.continuity(&context),
            WireStatement::Unlinkability => backend.unlinkability(&context),
        }
        .map_err(|source| match source {
            StatementError::Cancelled => ExchangeError::Cancelled,
            source => ExchangeError::Statement {
                tag: statement.tag(),
                source,
            },
        })?;

        // A proof finished racing the cancellation is still discarded
        if cancel.is_cancelled() {
            return Err(ExchangeError::Cancelled);
        }

        let proof_cbor = proof.to_cbor().map_err(|source| ExchangeError::Statement {
            tag: statement.tag(),
            source,
        })?;
        debug!(%statement, bytes = proof_cbor.len(), "generated sigma proof");

        Ok(ProofPayload {
            proof_cbor,
            meta: response_meta(statement, self.prove_mode()),
        })
    }
}
