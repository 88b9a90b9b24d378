//! Self-contained proof envelope with canonical CBOR encoding

use serde::{Deserialize, Serialize};

use crate::continuity::ContinuityStatement;
use crate::error::{StatementError, StatementResult};
use crate::membership::MembershipStatement;
use crate::opening::OpeningStatement;
use crate::registry;
use crate::unlinkability::UnlinkabilityStatement;

/// Envelope schema version; bump on breaking changes
pub const PROOF_SCHEMA_VERSION: u8 = 1;

/// Statement payload: public inputs plus the Sigma proof, tagged by
/// statement type. A tagged variant keeps verifier dispatch static — no
/// trait objects on the verification path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StatementBody {
    /// Anonymity-set membership (§ membership)
    #[serde(rename = "anon_set_membership_v1")]
    Membership(MembershipStatement),
    /// Session unlinkability
    #[serde(rename = "session_unlinkability_v1")]
    Unlinkability(UnlinkabilityStatement),
    /// Identity continuity
    #[serde(rename = "identity_continuity_v1")]
    Continuity(ContinuityStatement),
    /// Commitment opening
    #[serde(rename = "commitment_opening_v1")]
    Opening(OpeningStatement),
}

impl StatementBody {
    /// The statement type tag of this body
    pub fn type_tag(&self) -> &'static str {
        match self {
            StatementBody::Membership(_) => "anon_set_membership_v1",
            StatementBody::Unlinkability(_) => "session_unlinkability_v1",
            StatementBody::Continuity(_) => "identity_continuity_v1",
            StatementBody::Opening(_) => "commitment_opening_v1",
        }
    }
}

/// A complete, self-contained zero-knowledge proof.
///
/// Everything verification needs is here plus the process-wide public
/// parameters; nothing is looked up out-of-band. Encoding is canonical
/// CBOR: short map keys in ascending byte order, fixed-width binary
/// fields, byte-stable across runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZKProof {
    /// Statement payload (public inputs + Sigma proof)
    #[serde(rename = "b")]
    pub body: StatementBody,
    /// Envelope schema version
    #[serde(rename = "s")]
    pub schema: u8,
    /// Statement type tag; must agree with the body variant
    #[serde(rename = "t")]
    pub statement_type: String,
    /// Statement version; the (type, version) pair selects the verifier
    #[serde(rename = "v")]
    pub statement_version: u16,
    /// Context hash the proof is bound to
    #[serde(rename = "x", with = "serde_bytes")]
    pub context_hash: [u8; 32],
}

impl ZKProof {
    /// Wrap a statement body in an envelope
    pub fn new(body: StatementBody, context_hash: [u8; 32]) -> Self {
        let statement_type = body.type_tag().to_string();
        Self {
            body,
            schema: PROOF_SCHEMA_VERSION,
            statement_type,
            statement_version: 1,
            context_hash,
        }
    }

    /// Encode as canonical CBOR
    pub fn to_cbor(&self) -> StatementResult<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| StatementError::BadEncoding(format!("cbor encode: {e}")))?;
        Ok(buf)
    }

    /// Decode from CBOR.
    ///
    /// The (type, version, schema) triple is checked against the registry
    /// before the body is materialized, so unknown statements surface as
    /// `BadMetadata` rather than a decode error.
    pub fn from_cbor(bytes: &[u8]) -> StatementResult<ZKProof> {
        let value: ciborium::Value = ciborium::from_reader(bytes)
            .map_err(|e| StatementError::BadEncoding(format!("cbor decode: {e}")))?;

        let (schema, statement_type, statement_version) = envelope_metadata(&value)?;
        if schema != PROOF_SCHEMA_VERSION {
            return Err(StatementError::BadMetadata(format!(
                "unsupported proof schema {schema}"
            )));
        }
        registry::lookup(&statement_type, statement_version).ok_or_else(|| {
            StatementError::BadMetadata(format!(
                "unknown statement ({statement_type}, v{statement_version})"
            ))
        })?;

        let proof: ZKProof = value
            .deserialized()
            .map_err(|e| StatementError::BadEncoding(format!("cbor body: {e}")))?;

        if proof.body.type_tag() != proof.statement_type {
            return Err(StatementError::BadMetadata(format!(
                "envelope type {} does not match body {}",
                proof.statement_type,
                proof.body.type_tag()
            )));
        }

        Ok(proof)
    }
}

/// Pull `(schema, type, version)` out of the raw CBOR map
fn envelope_metadata(value: &ciborium::Value) -> StatementResult<(u8, String, u16)> {
    let entries = value
        .as_map()
        .ok_or_else(|| StatementError::BadEncoding("proof envelope is not a map".into()))?;

    let mut schema = None;
    let mut statement_type = None;
    let mut statement_version = None;
    for (key, val) in entries {
        match key.as_text() {
            Some("s") => schema = val.as_integer().and_then(|i| u8::try_from(i).ok()),
            Some("t") => statement_type = val.as_text().map(str::to_string),
            Some("v") => statement_version = val.as_integer().and_then(|i| u16::try_from(i).ok()),
            _ => {}
        }
    }

    match (schema, statement_type, statement_version) {
        (Some(s), Some(t), Some(v)) => Ok((s, t, v)),
        _ => Err(StatementError::BadEncoding(
            "proof envelope missing schema/type/version".into(),
        )),
    }
}
