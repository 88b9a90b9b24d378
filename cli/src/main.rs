//! PRIVACYZK CLI
//!
//! Command-line surface for the privacy-proof core.
//!
//! # Usage
//!
//! ```bash
//! # Serve proofs with the in-process Sigma prover
//! privacyzk zk-serve --listen-addr /ip4/127.0.0.1/tcp/9555 --prove-mode sigma
//!
//! # Serve pre-generated artifacts
//! privacyzk zk-serve --listen-addr /ip4/0.0.0.0/tcp/9555 --prove-mode real \
//!     --assets-dir privacy_circuits/params
//!
//! # Fetch and verify one statement from a peer
//! privacyzk zk-verify --peer /ip4/127.0.0.1/tcp/9555 --statement membership
//!
//! # Full analysis gate: all three statements
//! privacyzk analyze --zk-peer /ip4/127.0.0.1/tcp/9555 --zk-statement all
//! ```
//!
//! Exit codes: 0 success, 1 verification failure, 2 protocol/timeout
//! error, 3 bad usage.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;
mod logging;

use commands::{AnalyzeCommand, ZkServeCommand, ZkVerifyCommand};

/// Peer-to-peer privacy-proof toolkit
#[derive(Parser)]
#[command(name = "privacyzk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Privacy proofs over /privacyzk/1.0.0", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve proofs to peers
    #[command(name = "zk-serve")]
    ZkServe(ZkServeCommand),

    /// Fetch and verify one statement from a peer
    #[command(name = "zk-verify")]
    ZkVerify(ZkVerifyCommand),

    /// Run the proof-exchange analysis gate against a peer
    Analyze(AnalyzeCommand),
}

/// Process exit codes
pub(crate) mod exit {
    use std::process::ExitCode;

    /// Everything verified
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;
    /// One or more statements failed verification
    pub fn verification_failure() -> ExitCode {
        ExitCode::from(1)
    }
    /// Protocol or timeout error
    pub fn protocol_error() -> ExitCode {
        ExitCode::from(2)
    }
    /// Bad usage
    pub fn bad_usage() -> ExitCode {
        ExitCode::from(3)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = logging::LogFormat::from_flag(cli.json_logs);
    if let Err(e) = logging::init(&cli.log_level, format) {
        eprintln!("failed to initialize logging: {e}");
        return exit::bad_usage();
    }

    match cli.command {
        Commands::ZkServe(cmd) => cmd.execute().await,
        Commands::ZkVerify(cmd) => cmd.execute().await,
        Commands::Analyze(cmd) => cmd.execute().await,
    }
}
