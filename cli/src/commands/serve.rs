//! zk-serve - run the proof-exchange server

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use multiaddr::Multiaddr;
use tracing::{error, info};

use privacyzk_assets::{AssetStore, DEFAULT_ASSETS_DIR};
use privacyzk_exchange::{
    multiaddr_to_socketaddr, ExchangeServer, FixtureProvider, ProofProvider, ServerConfig,
    SigmaProvider, PROTOCOL_ID,
};

use crate::exit;

/// Serve proofs to peers over /privacyzk/1.0.0
#[derive(Args)]
pub struct ZkServeCommand {
    /// Listen endpoint, e.g. /ip4/127.0.0.1/tcp/9555
    #[arg(long)]
    listen_addr: Multiaddr,

    /// Where proofs come from: pre-generated assets or the in-process
    /// Sigma prover
    #[arg(long, value_parser = ["real", "sigma"], default_value = "sigma")]
    prove_mode: String,

    /// Asset store root (prove-mode real)
    #[arg(long, env = "ASSETS_DIR", default_value = DEFAULT_ASSETS_DIR)]
    assets_dir: PathBuf,

    /// Identity the sigma prover proves statements about
    #[arg(long, default_value = "privacyzk-server")]
    peer_id: String,
}

impl ZkServeCommand {
    pub async fn execute(self) -> ExitCode {
        let addr = match multiaddr_to_socketaddr(&self.listen_addr) {
            Ok(addr) => addr,
            Err(e) => {
                error!(error = %e, "bad listen address");
                return exit::bad_usage();
            }
        };

        let provider: Arc<dyn ProofProvider> = match self.prove_mode.as_str() {
            "real" => Arc::new(FixtureProvider::new(AssetStore::new(&self.assets_dir))),
            _ => Arc::new(SigmaProvider::new(self.peer_id.clone())),
        };

        info!(
            protocol = PROTOCOL_ID,
            mode = self.prove_mode,
            assets = %self.assets_dir.display(),
            "starting proof-exchange server"
        );

        let server = match ExchangeServer::bind(addr, provider, ServerConfig::default()).await {
            Ok(server) => server,
            Err(e) => {
                error!(error = %e, "failed to bind listener");
                return exit::protocol_error();
            }
        };

        match server.run().await {
            Ok(()) => exit::SUCCESS,
            Err(e) => {
                error!(error = %e, "server stopped");
                exit::protocol_error()
            }
        }
    }
}
