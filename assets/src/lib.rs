//! PRIVACYZK Asset Loader
//!
//! Resolves pre-generated verification keys, public inputs, and proof
//! bytes from a read-only asset store. Paths follow the deterministic
//! template
//!
//! ```text
//! {assets_dir}/{statement}/v{schema}/depth-{d}/{file}
//! ```
//!
//! with `{file}` drawn from a small enumerated candidate set per
//! statement. A missing file means the statement is simply not
//! provisioned (`NotAvailable`); a present file with a wrong size is a
//! provisioning defect (`BadAsset`).

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Default asset store root
pub const DEFAULT_ASSETS_DIR: &str = "privacy_circuits/params";

/// Maximum verification key size
pub const MAX_VK_BYTES: u64 = 1024 * 1024;

/// Maximum public-inputs blob size
pub const MAX_PUBLIC_INPUTS_BYTES: u64 = 65536;

/// Maximum proof blob size
pub const MAX_PROOF_BYTES: u64 = 4096;

/// Statement names the store recognizes
pub const KNOWN_STATEMENTS: [&str; 3] = ["membership", "continuity", "unlinkability"];

/// Errors from asset resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The statement's artifacts are not provisioned; not fatal
    #[error("Asset not available: {0}")]
    NotAvailable(String),

    /// An artifact exists but is malformed (wrong size, unreadable)
    #[error("Bad asset: {0}")]
    BadAsset(String),
}

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;

/// Resolved artifact paths for one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    /// Verification key
    pub vk: PathBuf,
    /// Public inputs blob
    pub public_inputs: PathBuf,
    /// Proof blob
    pub proof: PathBuf,
}

/// Loaded artifact bytes for one statement
#[derive(Debug, Clone)]
pub struct AssetBundle {
    /// Verification key bytes
    pub vk: Vec<u8>,
    /// Public inputs bytes
    pub public_inputs: Vec<u8>,
    /// Proof bytes
    pub proof: Vec<u8>,
}

/// Read-only resolver over an asset directory
#[derive(Debug, Clone)]
pub struct AssetStore {
    base_dir: PathBuf,
}

impl AssetStore {
    /// Store rooted at the given directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Store rooted at the default directory
    pub fn default_store() -> Self {
        Self::new(DEFAULT_ASSETS_DIR)
    }

    /// The store root
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve the artifact paths for `(statement, schema, depth)`.
    pub fn resolve(&self, statement: &str, schema: u8, depth: u8) -> AssetResult<AssetPaths> {
        if !KNOWN_STATEMENTS.contains(&statement) {
            return Err(AssetError::BadAsset(format!(
                "unknown statement '{statement}'"
            )));
        }

        let base = self
            .base_dir
            .join(statement)
            .join(format!("v{schema}"))
            .join(format!("depth-{depth}"));
        if !base.is_dir() {
            return Err(AssetError::NotAvailable(format!(
                "missing asset directory {}",
                base.display()
            )));
        }

        let vk = resolve_one(&base, &vk_candidates(statement), "vk")?;
        let public_inputs =
            resolve_one(&base, &public_inputs_candidates(statement), "public_inputs")?;
        let proof = resolve_one(&base, &proof_candidates(statement), "proof")?;

        check_size(&vk, MAX_VK_BYTES, "vk")?;
        check_size(&public_inputs, MAX_PUBLIC_INPUTS_BYTES, "public_inputs")?;
        check_size(&proof, MAX_PROOF_BYTES, "proof")?;

        debug!(statement, schema, depth, vk = %vk.display(), "resolved assets");

        Ok(AssetPaths {
            vk,
            public_inputs,
            proof,
        })
    }

    /// Resolve and read the artifact bytes for `(statement, schema, depth)`.
    pub fn load(&self, statement: &str, schema: u8, depth: u8) -> AssetResult<AssetBundle> {
        let paths = self.resolve(statement, schema, depth)?;
        Ok(AssetBundle {
            vk: read_asset(&paths.vk)?,
            public_inputs: read_asset(&paths.public_inputs)?,
            proof: read_asset(&paths.proof)?,
        })
    }
}

fn resolve_one(base: &Path, candidates: &[String], label: &str) -> AssetResult<PathBuf> {
    for name in candidates {
        let path = base.join(name);
        if path.is_file() {
            return Ok(path);
        }
    }
    Err(AssetError::NotAvailable(format!(
        "missing {label} asset in {}",
        base.display()
    )))
}

fn check_size(path: &Path, limit: u64, label: &str) -> AssetResult<()> {
    let size = fs::metadata(path)
        .map_err(|e| AssetError::BadAsset(format!("{label}: {e}")))?
        .len();
    if size == 0 {
        return Err(AssetError::BadAsset(format!(
            "{label} asset is empty: {}",
            path.display()
        )));
    }
    if size > limit {
        return Err(AssetError::BadAsset(format!(
            "{label} asset is {size} bytes (limit {limit})"
        )));
    }
    Ok(())
}

fn read_asset(path: &Path) -> AssetResult<Vec<u8>> {
    fs::read(path).map_err(|e| AssetError::BadAsset(format!("{}: {e}", path.display())))
}

fn vk_candidates(statement: &str) -> Vec<String> {
    vec![format!("{statement}_vk.bin"), "vk.bin".to_string()]
}

fn public_inputs_candidates(statement: &str) -> Vec<String> {
    match statement {
        "membership" => vec![
            "public_inputs.bin".to_string(),
            "membership_public_inputs.bin".to_string(),
        ],
        _ => vec![
            format!("{statement}_public_inputs.bin"),
            "public_inputs.bin".to_string(),
        ],
    }
}

fn proof_candidates(statement: &str) -> Vec<String> {
    vec![format!("{statement}_proof.bin"), "proof.bin".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provision(dir: &Path, statement: &str, schema: u8, depth: u8) {
        let base = dir
            .join(statement)
            .join(format!("v{schema}"))
            .join(format!("depth-{depth}"));
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join(format!("{statement}_vk.bin")), b"vk-bytes").unwrap();
        fs::write(base.join("public_inputs.bin"), b"inputs-bytes").unwrap();
        fs::write(base.join(format!("{statement}_proof.bin")), b"proof-bytes").unwrap();
    }

    #[test]
    fn resolves_provisioned_statement() {
        let dir = tempfile::tempdir().unwrap();
        provision(dir.path(), "membership", 2, 16);
        let store = AssetStore::new(dir.path());

        let bundle = store.load("membership", 2, 16).unwrap();
        assert_eq!(bundle.vk, b"vk-bytes");
        assert_eq!(bundle.proof, b"proof-bytes");
    }

    #[test]
    fn missing_directory_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        assert!(matches!(
            store.resolve("continuity", 2, 0),
            Err(AssetError::NotAvailable(_))
        ));
    }

    #[test]
    fn missing_file_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        provision(dir.path(), "unlinkability", 2, 0);
        fs::remove_file(
            dir.path()
                .join("unlinkability/v2/depth-0/unlinkability_proof.bin"),
        )
        .unwrap();
        let store = AssetStore::new(dir.path());
        assert!(matches!(
            store.resolve("unlinkability", 2, 0),
            Err(AssetError::NotAvailable(_))
        ));
    }

    #[test]
    fn oversize_asset_is_bad() {
        let dir = tempfile::tempdir().unwrap();
        provision(dir.path(), "membership", 2, 16);
        let proof = dir.path().join("membership/v2/depth-16/membership_proof.bin");
        fs::write(&proof, vec![0u8; (MAX_PROOF_BYTES + 1) as usize]).unwrap();
        let store = AssetStore::new(dir.path());
        assert!(matches!(
            store.resolve("membership", 2, 16),
            Err(AssetError::BadAsset(_))
        ));
    }

    #[test]
    fn empty_asset_is_bad() {
        let dir = tempfile::tempdir().unwrap();
        provision(dir.path(), "continuity", 2, 0);
        fs::write(dir.path().join("continuity/v2/depth-0/continuity_vk.bin"), b"").unwrap();
        let store = AssetStore::new(dir.path());
        assert!(matches!(
            store.resolve("continuity", 2, 0),
            Err(AssetError::BadAsset(_))
        ));
    }

    #[test]
    fn unknown_statement_is_bad() {
        let store = AssetStore::new("/nonexistent");
        assert!(matches!(
            store.resolve("range_proof", 2, 0),
            Err(AssetError::BadAsset(_))
        ));
    }

    #[test]
    fn generic_fallback_names_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("continuity/v2/depth-0");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("vk.bin"), b"vk").unwrap();
        fs::write(base.join("continuity_public_inputs.bin"), b"pi").unwrap();
        fs::write(base.join("proof.bin"), b"pf").unwrap();

        let store = AssetStore::new(dir.path());
        let paths = store.resolve("continuity", 2, 0).unwrap();
        assert!(paths.vk.ends_with("vk.bin"));
        assert!(paths.proof.ends_with("proof.bin"));
    }
}
