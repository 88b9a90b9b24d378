//! Commitment parameters: the two generators

use privacyzk_curve::{CurveResult, Point, GENERATOR_H_TAG};
use std::sync::OnceLock;

/// Pedersen commitment parameters.
///
/// `g` is the standard secp256k1 base point. `h` is derived once per
/// process from the fixed domain tag so its discrete log relative to `g`
/// is unknown to everyone; anyone can recompute the derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    g: Point,
    h: Point,
}

static PARAMS: OnceLock<Params> = OnceLock::new();

impl Params {
    /// The process-wide parameter set.
    ///
    /// Generators are created on first use and are immutable afterwards.
    pub fn get() -> &'static Params {
        PARAMS.get_or_init(|| {
            Params::derive().expect("generator derivation from a fixed tag cannot fail")
        })
    }

    fn derive() -> CurveResult<Params> {
        Ok(Params {
            g: Point::generator(),
            h: Point::hash_to_point(GENERATOR_H_TAG)?,
        })
    }

    /// First generator `G` (standard base point)
    pub fn g(&self) -> &Point {
        &self.g
    }

    /// Second generator `H` (hash-to-curve derived)
    pub fn h(&self) -> &Point {
        &self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_stable_across_calls() {
        let a = Params::get();
        let b = Params::get();
        assert_eq!(a.g(), b.g());
        assert_eq!(a.h(), b.h());
    }

    #[test]
    fn generators_are_distinct() {
        let params = Params::get();
        assert_ne!(params.g(), params.h());
        assert!(!params.h().is_identity());
    }
}
