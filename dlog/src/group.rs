//! Cyclic groups of prime order `q` in which discrete logarithms are hard.
//!
//! Scalars are arbitrary-precision integers in `[0, q)`. Elements are owned
//! values; every operation returns a fresh element and never mutates its
//! arguments.

mod ristretto;
mod zp;

pub use ristretto::RistrettoGroup;
pub use zp::{ZpElement, ZpSafePrimeGroup};

use crate::errors::Error;
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, Rng};
use std::fmt::Debug;

/// A discrete-log group.
///
/// Implementations are immutable after construction and can be shared
/// between threads running independent protocol instances.
pub trait DlogGroup: Clone + Send + Sync + Debug {
    /// Group element.
    type Element: Clone + Debug + PartialEq + Eq + Send + Sync;

    /// A short human-readable description of the group.
    fn name(&self) -> String;

    /// The fixed generator `g`.
    fn generator(&self) -> Self::Element;

    /// The group order `q`.
    fn order(&self) -> &BigUint;

    /// The neutral element.
    fn identity(&self) -> Self::Element;

    /// Compute `base^exponent`.
    fn exponentiate(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element;

    /// Compute `g^exponent`.
    fn exponentiate_generator(&self, exponent: &BigUint) -> Self::Element {
        self.exponentiate(&self.generator(), exponent)
    }

    /// Compute the group operation `a · b`.
    fn multiply(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Compute `a^-1`.
    fn inverse(&self, a: &Self::Element) -> Self::Element {
        let e = self.order() - BigUint::one();
        self.exponentiate(a, &e)
    }

    /// Whether `e` lies in the prime-order group.
    fn is_member(&self, e: &Self::Element) -> bool;

    /// Whether `e` is the neutral element.
    fn is_identity(&self, e: &Self::Element) -> bool {
        *e == self.identity()
    }

    /// Whether the group is believed to satisfy the Decisional Diffie-Hellman
    /// assumption at a useful security level.
    fn is_ddh_hard(&self) -> bool;

    /// Sample a uniform scalar in `[0, q)`.
    fn random_scalar<R: Rng + CryptoRng>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_below(self.order())
    }

    /// Sample a uniform group element.
    fn random_element<R: Rng + CryptoRng>(&self, rng: &mut R) -> Self::Element {
        let x = self.random_scalar(rng);
        self.exponentiate_generator(&x)
    }

    /// Encode an element into bytes suitable for transport.
    fn encode(&self, e: &Self::Element) -> Vec<u8>;

    /// Decode an element. With `checked` set, bytes that do not encode a
    /// member of the group are rejected.
    fn decode(&self, bytes: &[u8], checked: bool) -> Result<Self::Element, Error>;

    /// Bytes of an element used as keying material.
    fn map_to_bytes(&self, e: &Self::Element) -> Vec<u8> {
        self.encode(e)
    }
}
