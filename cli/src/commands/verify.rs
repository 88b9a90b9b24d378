//! zk-verify - fetch one statement from a peer and verify it

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use multiaddr::Multiaddr;
use tracing::{error, info, warn};

use privacyzk_assets::{AssetStore, DEFAULT_ASSETS_DIR};
use privacyzk_exchange::{
    multiaddr_to_socketaddr, ClientConfig, ExchangeClient, ExchangeError, OutcomeStatus,
    StatementOutcome, StatementSelector, SCHEMA_VERSION,
};

use crate::exit;

/// Fetch and verify a single statement from a peer
#[derive(Args)]
pub struct ZkVerifyCommand {
    /// Peer endpoint, e.g. /ip4/127.0.0.1/tcp/9555
    #[arg(long)]
    peer: Multiaddr,

    /// Statement to verify
    #[arg(long, value_parser = ["membership", "continuity", "unlinkability"])]
    statement: String,

    /// Asset store root for cross-checking real artifacts
    #[arg(long, env = "ASSETS_DIR", default_value = DEFAULT_ASSETS_DIR)]
    assets_dir: PathBuf,

    /// Overall exchange timeout in seconds
    #[arg(long, env = "ZK_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Refuse anything that is not prove_mode=real (no fallback)
    #[arg(long)]
    require_real: bool,
}

impl ZkVerifyCommand {
    pub async fn execute(self) -> ExitCode {
        let addr = match multiaddr_to_socketaddr(&self.peer) {
            Ok(addr) => addr,
            Err(e) => {
                error!(error = %e, "bad peer address");
                return exit::bad_usage();
            }
        };
        let Some(selector) = StatementSelector::parse(&self.statement) else {
            error!(statement = %self.statement, "unknown statement");
            return exit::bad_usage();
        };

        let client = ExchangeClient::new(ClientConfig {
            total_timeout: Duration::from_secs(self.timeout),
            require_real: self.require_real,
            allow_fallback: false,
            local_peer_id: "zk-verify".to_string(),
        });

        let outcomes = match client.request_from_addr(addr, selector).await {
            Ok(outcomes) => outcomes,
            Err(e @ ExchangeError::Timeout(_)) => {
                error!(error = %e, "exchange timed out");
                return exit::protocol_error();
            }
            Err(e) => {
                error!(error = %e, "exchange failed");
                return exit::protocol_error();
            }
        };

        let mut all_ok = true;
        for outcome in &outcomes {
            let cross_checked = self.cross_check(outcome);
            println!("{}: {}", outcome.statement.tag(), outcome.summary());
            if outcome.status != OutcomeStatus::Ok || !cross_checked {
                all_ok = false;
            }
        }

        if all_ok {
            info!("verification succeeded");
            exit::SUCCESS
        } else {
            exit::verification_failure()
        }
    }

    /// Compare verbatim real artifacts against the local asset store when
    /// it is provisioned for this statement.
    fn cross_check(&self, outcome: &StatementOutcome) -> bool {
        if outcome.status != OutcomeStatus::Ok || outcome.prove_mode != "real" {
            return true;
        }
        let store = AssetStore::new(&self.assets_dir);
        match store.load(
            outcome.statement.as_str(),
            SCHEMA_VERSION,
            outcome.statement.expected_depth(),
        ) {
            Ok(bundle) => {
                if bundle.proof == outcome.proof_bytes {
                    true
                } else {
                    warn!(
                        statement = %outcome.statement,
                        "received artifact differs from local asset store"
                    );
                    false
                }
            }
            // No local copy to compare against; accept the peer's bytes
            Err(_) => true,
        }
    }
}
