//! Cooperative cancellation for long-running proving

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{SigmaError, SigmaResult};

/// Cancellation flag polled at scalar-multiplication boundaries.
///
/// Proving never suspends on IO, so cancellation is cooperative: the
/// prover calls [`CancelFlag::checkpoint`] immediately before each group
/// of scalar multiplications and abandons the protocol mid-proof when the
/// flag is set. A cancelled call returns [`SigmaError::Cancelled`]; no
/// partial proof survives it. Cloning shares the flag, so a network task
/// can cancel work already running on a CPU pool.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Fresh, uncancelled flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Abandon the current proof if cancellation was requested
    pub fn checkpoint(&self) -> SigmaResult<()> {
        if self.is_cancelled() {
            Err(SigmaError::Cancelled)
        } else {
            Ok(())
        }
    }
}
