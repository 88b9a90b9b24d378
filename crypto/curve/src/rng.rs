//! Fork-safe randomness source

use rand_core::{CryptoRng, OsRng, RngCore};

/// Cryptographically secure RNG with fork detection.
///
/// Wraps the OS CSPRNG and re-checks the process id around every draw.
/// If the process forked since the last draw the source is reinitialized,
/// so a child can never replay the parent's nonce stream. The demo path is
/// single-process; the contract exists for library users.
#[derive(Debug)]
pub struct SecureRng {
    pid: u32,
    inner: OsRng,
}

impl SecureRng {
    /// Create a new randomness source bound to the current process
    pub fn new() -> Self {
        Self {
            pid: std::process::id(),
            inner: OsRng,
        }
    }

    /// Fill a buffer with random bytes
    pub fn fill(&mut self, dest: &mut [u8]) {
        self.check_fork();
        self.inner.fill_bytes(dest);
    }

    /// Draw a fixed-size random array
    pub fn random_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        self.fill(&mut out);
        out
    }

    fn check_fork(&mut self) {
        let pid = std::process::id();
        if pid != self.pid {
            // Reinitialize the source in the child process
            self.pid = pid;
            self.inner = OsRng;
        }
    }
}

impl Default for SecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.check_fork();
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.check_fork();
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.check_fork();
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_are_not_constant() {
        let mut rng = SecureRng::new();
        let a: [u8; 32] = rng.random_array();
        let b: [u8; 32] = rng.random_array();
        assert_ne!(a, b);
    }

    #[test]
    fn fill_covers_buffer() {
        let mut rng = SecureRng::new();
        let mut buf = [0u8; 64];
        rng.fill(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }
}
