//! The Ristretto prime-order group over Curve25519, from the
//! `curve25519-dalek` library.

use super::DlogGroup;
use crate::errors::Error;
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::Identity,
};
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};

// 2^252 + 27742317777372353535851937790883648493
const ORDER_HEX: &[u8] = b"1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed";

/// The Ristretto group. Every `RistrettoPoint` is a member, so membership
/// checks reduce to canonical decoding.
#[derive(Clone, Debug)]
pub struct RistrettoGroup {
    order: BigUint,
}

impl RistrettoGroup {
    /// Create the group.
    pub fn new() -> Self {
        let order = BigUint::parse_bytes(ORDER_HEX, 16).expect("well-formed order constant");
        Self { order }
    }

    fn scalar(&self, exponent: &BigUint) -> Scalar {
        let reduced = exponent % &self.order;
        let mut bytes = [0u8; 32];
        let le = reduced.to_bytes_le();
        bytes[..le.len()].copy_from_slice(&le);
        Scalar::from_bytes_mod_order(bytes)
    }
}

impl Default for RistrettoGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl DlogGroup for RistrettoGroup {
    type Element = RistrettoPoint;

    fn name(&self) -> String {
        "ristretto255".to_string()
    }

    fn generator(&self) -> RistrettoPoint {
        RISTRETTO_BASEPOINT_POINT
    }

    fn order(&self) -> &BigUint {
        &self.order
    }

    fn identity(&self) -> RistrettoPoint {
        RistrettoPoint::identity()
    }

    fn exponentiate(&self, base: &RistrettoPoint, exponent: &BigUint) -> RistrettoPoint {
        base * self.scalar(exponent)
    }

    fn multiply(&self, a: &RistrettoPoint, b: &RistrettoPoint) -> RistrettoPoint {
        a + b
    }

    fn inverse(&self, a: &RistrettoPoint) -> RistrettoPoint {
        -a
    }

    fn is_member(&self, _: &RistrettoPoint) -> bool {
        true
    }

    fn is_ddh_hard(&self) -> bool {
        true
    }

    fn random_element<R: Rng + CryptoRng>(&self, rng: &mut R) -> RistrettoPoint {
        RistrettoPoint::random(rng)
    }

    fn encode(&self, e: &RistrettoPoint) -> Vec<u8> {
        e.compress().to_bytes().to_vec()
    }

    fn decode(&self, bytes: &[u8], _checked: bool) -> Result<RistrettoPoint, Error> {
        let data: [u8; 32] = bytes.try_into().map_err(|_| {
            Error::InvalidEncoding(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        CompressedRistretto(data).decompress().ok_or_else(|| {
            Error::InvalidEncoding("unable to decompress ristretto point".to_string())
        })
    }
}
