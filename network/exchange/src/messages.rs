//! Wire message schemas
//!
//! Canonical CBOR bodies carried inside length-prefixed frames. Map keys
//! are short and declared in ascending byte order so encoding is
//! byte-stable across runs.

use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::error::{ExchangeError, ExchangeResult};
use crate::{
    MAX_ERROR_CHARS, MAX_PROOF_BYTES, MSG_VERSION, NONCE_MAX_LEN, NONCE_MIN_LEN, SCHEMA_VERSION,
    WIRE_MEMBERSHIP_DEPTH,
};

/// A single statement on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireStatement {
    /// Anonymity-set membership
    #[serde(rename = "membership")]
    Membership,
    /// Identity continuity
    #[serde(rename = "continuity")]
    Continuity,
    /// Session unlinkability
    #[serde(rename = "unlinkability")]
    Unlinkability,
}

impl WireStatement {
    /// Fixed server-side delivery order
    pub const ORDERED: [WireStatement; 3] = [
        WireStatement::Membership,
        WireStatement::Continuity,
        WireStatement::Unlinkability,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            WireStatement::Membership => "membership",
            WireStatement::Continuity => "continuity",
            WireStatement::Unlinkability => "unlinkability",
        }
    }

    /// Surfaced statement tag including the wire schema, e.g. `membership_v2`
    pub fn tag(&self) -> String {
        format!("{}_v{}", self.as_str(), SCHEMA_VERSION)
    }

    /// Expected depth for this statement on the wire
    pub fn expected_depth(&self) -> u8 {
        match self {
            WireStatement::Membership => WIRE_MEMBERSHIP_DEPTH,
            _ => 0,
        }
    }
}

impl std::fmt::Display for WireStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the client asks for: one statement or the whole batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementSelector {
    /// Anonymity-set membership only
    #[serde(rename = "membership")]
    Membership,
    /// Identity continuity only
    #[serde(rename = "continuity")]
    Continuity,
    /// Session unlinkability only
    #[serde(rename = "unlinkability")]
    Unlinkability,
    /// All three statements, delivered in fixed order
    #[serde(rename = "all")]
    All,
}

impl StatementSelector {
    /// Expand into the fixed delivery order
    pub fn expand(&self) -> Vec<WireStatement> {
        match self {
            StatementSelector::Membership => vec![WireStatement::Membership],
            StatementSelector::Continuity => vec![WireStatement::Continuity],
            StatementSelector::Unlinkability => vec![WireStatement::Unlinkability],
            StatementSelector::All => WireStatement::ORDERED.to_vec(),
        }
    }

    /// Depth field matching this selector
    pub fn request_depth(&self) -> u8 {
        match self {
            StatementSelector::Continuity | StatementSelector::Unlinkability => 0,
            _ => WIRE_MEMBERSHIP_DEPTH,
        }
    }

    /// Parse a CLI-facing name
    pub fn parse(name: &str) -> Option<StatementSelector> {
        match name {
            "membership" => Some(StatementSelector::Membership),
            "continuity" => Some(StatementSelector::Continuity),
            "unlinkability" => Some(StatementSelector::Unlinkability),
            "all" => Some(StatementSelector::All),
            _ => None,
        }
    }
}

/// Client request frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRequest {
    /// Client deadline in milliseconds (0 = server default)
    #[serde(rename = "dl")]
    pub deadline_ms: u32,
    /// Merkle depth for membership; 0 for the others
    #[serde(rename = "dp")]
    pub depth: u8,
    /// Message version
    #[serde(rename = "m")]
    pub msg_version: u8,
    /// Anti-replay nonce, 16..=64 bytes
    #[serde(rename = "n")]
    pub nonce: ByteBuf,
    /// Statement schema version
    #[serde(rename = "sv")]
    pub schema_version: u8,
    /// Requested statement(s)
    #[serde(rename = "t")]
    pub statement: StatementSelector,
}

impl ProofRequest {
    /// Build a request for the pinned wire tuple
    pub fn new(statement: StatementSelector, nonce: [u8; 16], deadline_ms: u32) -> Self {
        Self {
            deadline_ms,
            depth: statement.request_depth(),
            msg_version: MSG_VERSION,
            nonce: ByteBuf::from(nonce.to_vec()),
            schema_version: SCHEMA_VERSION,
            statement,
        }
    }

    /// Validate version, depth, and nonce bounds
    pub fn validate(&self) -> ExchangeResult<()> {
        if self.msg_version != MSG_VERSION {
            return Err(ExchangeError::Schema(format!(
                "unsupported msg version {}",
                self.msg_version
            )));
        }
        if self.schema_version != SCHEMA_VERSION {
            return Err(ExchangeError::Schema(format!(
                "unsupported schema version {}",
                self.schema_version
            )));
        }
        let nonce_len = self.nonce.len();
        if !(NONCE_MIN_LEN..=NONCE_MAX_LEN).contains(&nonce_len) {
            return Err(ExchangeError::Schema(format!(
                "nonce length {nonce_len} out of bounds"
            )));
        }
        match self.statement {
            StatementSelector::Continuity | StatementSelector::Unlinkability => {
                if self.depth != 0 {
                    return Err(ExchangeError::Schema(
                        "non-membership depth must be 0".into(),
                    ));
                }
            }
            _ => {
                if self.depth == 0 {
                    return Err(ExchangeError::Schema(
                        "membership depth must be nonzero".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Per-statement response status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// Proof attached
    #[serde(rename = "ok")]
    Ok,
    /// Artifacts for this statement are not provisioned
    #[serde(rename = "not_available")]
    NotAvailable,
    /// Proving or validation failed
    #[serde(rename = "failed")]
    Failed,
}

/// Response metadata surfaced to the client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Depth the statement was proven at
    #[serde(rename = "d")]
    pub depth: u8,
    /// Set when the proof was produced by a client-side downgrade
    #[serde(rename = "f")]
    pub fallback: bool,
    /// `real` (pre-generated assets), `sigma` (in-process prover), or
    /// `local-sigma` (client fallback)
    #[serde(rename = "pm")]
    pub prove_mode: String,
    /// Statement schema version
    #[serde(rename = "sv")]
    pub schema_version: u8,
    /// Statement name
    #[serde(rename = "t")]
    pub statement: String,
}

/// Server response frame, one per statement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProofResponse {
    /// Depth the statement was proven at
    #[serde(rename = "dp")]
    pub depth: u8,
    /// Error string for non-OK statuses, at most 256 chars
    #[serde(rename = "e")]
    pub error: Option<String>,
    /// Message version
    #[serde(rename = "m")]
    pub msg_version: u8,
    /// Response metadata
    #[serde(rename = "md")]
    pub meta: ResponseMeta,
    /// Encoded proof when status is OK
    #[serde(rename = "p")]
    pub proof_cbor: Option<ByteBuf>,
    /// Outcome for this statement
    #[serde(rename = "st")]
    pub status: ResponseStatus,
    /// Statement schema version
    #[serde(rename = "sv")]
    pub schema_version: u8,
    /// Which statement this answers
    #[serde(rename = "t")]
    pub statement: WireStatement,
}

impl ProofResponse {
    /// Successful response carrying a proof
    pub fn ok(statement: WireStatement, depth: u8, proof_cbor: Vec<u8>, meta: ResponseMeta) -> Self {
        Self {
            depth,
            error: None,
            msg_version: MSG_VERSION,
            meta,
            proof_cbor: Some(ByteBuf::from(proof_cbor)),
            status: ResponseStatus::Ok,
            schema_version: SCHEMA_VERSION,
            statement,
        }
    }

    /// Non-OK response with an error string
    pub fn error(
        statement: WireStatement,
        depth: u8,
        status: ResponseStatus,
        error: impl Into<String>,
        meta: ResponseMeta,
    ) -> Self {
        let mut error: String = error.into();
        error.truncate(MAX_ERROR_CHARS);
        Self {
            depth,
            error: Some(error),
            msg_version: MSG_VERSION,
            meta,
            proof_cbor: None,
            status,
            schema_version: SCHEMA_VERSION,
            statement,
        }
    }

    /// Validate status/payload consistency and size caps
    pub fn validate(&self) -> ExchangeResult<()> {
        if self.msg_version != MSG_VERSION {
            return Err(ExchangeError::Schema(format!(
                "unsupported msg version {}",
                self.msg_version
            )));
        }
        if self.schema_version != SCHEMA_VERSION {
            return Err(ExchangeError::Schema(format!(
                "unsupported schema version {}",
                self.schema_version
            )));
        }
        if let Some(proof) = &self.proof_cbor {
            if proof.len() > MAX_PROOF_BYTES {
                return Err(ExchangeError::SizeLimit(format!(
                    "proof payload {} bytes",
                    proof.len()
                )));
            }
        }
        if let Some(error) = &self.error {
            if error.chars().count() > MAX_ERROR_CHARS {
                return Err(ExchangeError::SizeLimit("error string too long".into()));
            }
        }
        match self.status {
            ResponseStatus::Ok => {
                if self.proof_cbor.as_ref().map_or(true, |p| p.is_empty()) {
                    return Err(ExchangeError::Schema("OK response without proof".into()));
                }
                if self.error.as_ref().is_some_and(|e| !e.is_empty()) {
                    return Err(ExchangeError::Schema("OK response with error".into()));
                }
            }
            ResponseStatus::NotAvailable | ResponseStatus::Failed => {
                if self.proof_cbor.is_some() {
                    return Err(ExchangeError::Schema(
                        "non-OK response carrying a proof".into(),
                    ));
                }
                if self.status == ResponseStatus::Failed
                    && self.error.as_ref().map_or(true, |e| e.is_empty())
                {
                    return Err(ExchangeError::Schema("FAILED response without error".into()));
                }
            }
        }
        Ok(())
    }
}

/// Top-level frame bodies
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Frame {
    /// Terminates an exchange
    EndOfBatch,
    /// Client request
    ProofRequest(ProofRequest),
    /// One per-statement server response
    ProofResponse(ProofResponse),
}

impl Frame {
    /// Encode as canonical CBOR
    pub fn to_cbor(&self) -> ExchangeResult<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| ExchangeError::BadEncoding(format!("cbor encode: {e}")))?;
        Ok(buf)
    }

    /// Decode from CBOR
    pub fn from_cbor(bytes: &[u8]) -> ExchangeResult<Frame> {
        ciborium::from_reader(bytes)
            .map_err(|e| ExchangeError::BadEncoding(format!("cbor decode: {e}")))
    }
}
