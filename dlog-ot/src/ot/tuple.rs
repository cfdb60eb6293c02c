//! The group algebra behind every transfer, shared by the single and batch
//! engines.
//!
//! The receiver hides its choice in a tuple whose `σ` side is a genuine
//! Diffie-Hellman relation. The sender derives one key per side from that
//! tuple; only the key on side `σ` can be recomputed by the receiver.

use super::messages::{ReceiverPairMsg, ReceiverQuadrupleMsg, SenderQuadrupleMsg};
use crate::errors::Error;
use dlog::DlogGroup;
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};

/// Decode an element sent by the peer, treating anything outside the group
/// as cheating.
pub(crate) fn decode_member<G: DlogGroup>(
    group: &G,
    bytes: &[u8],
    what: &str,
) -> Result<G::Element, Error> {
    group.decode(bytes, true).map_err(|e| {
        log::warn!("{} is not a member of {}: {}", what, group.name(), e);
        Error::CheatDetected(format!("{} is not a group member", what))
    })
}

/// The receiver's side of a semi-honest transfer: `h_σ = g^α` and a random
/// element on the other side.
#[derive(Clone, Debug)]
pub(crate) struct ReceiverPair<E> {
    alpha: BigUint,
    pub(crate) h0: E,
    pub(crate) h1: E,
}

impl<E: Clone> ReceiverPair<E> {
    pub(crate) fn sample<G, R>(group: &G, sigma: bool, rng: &mut R) -> Self
    where
        G: DlogGroup<Element = E>,
        R: Rng + CryptoRng,
    {
        let alpha = group.random_scalar(rng);
        let other = group.random_element(rng);
        Self::from_parts(group, sigma, alpha, other)
    }

    pub(crate) fn from_parts<G: DlogGroup<Element = E>>(
        group: &G,
        sigma: bool,
        alpha: BigUint,
        other: E,
    ) -> Self {
        let real = group.exponentiate_generator(&alpha);
        let (h0, h1) = if sigma { (other, real) } else { (real, other) };
        Self { alpha, h0, h1 }
    }

    pub(crate) fn message<G: DlogGroup<Element = E>>(&self, group: &G) -> ReceiverPairMsg {
        ReceiverPairMsg {
            h0: group.encode(&self.h0),
            h1: group.encode(&self.h1),
        }
    }

    /// The key on side `σ`: `u^α = h_σ^r`.
    pub(crate) fn key<G: DlogGroup<Element = E>>(&self, group: &G, u: &E) -> E {
        group.exponentiate(u, &self.alpha)
    }
}

/// Decode and check a semi-honest tuple.
pub(crate) fn sender_pair<G: DlogGroup>(
    group: &G,
    msg: &ReceiverPairMsg,
) -> Result<(G::Element, G::Element), Error> {
    Ok((
        decode_member(group, &msg.h0, "h0")?,
        decode_member(group, &msg.h1, "h1")?,
    ))
}

/// The receiver's side of a malicious-secure transfer:
/// `(x, y, z_σ, z_{1-σ}) = (g^α, g^β, g^{αβ}, g^γ)` with `γ ≠ αβ`.
#[derive(Clone, Debug)]
pub(crate) struct ReceiverQuadruple<E> {
    pub(crate) alpha: BigUint,
    beta: BigUint,
    pub(crate) x: E,
    y: E,
    z0: E,
    z1: E,
}

impl<E: Clone> ReceiverQuadruple<E> {
    pub(crate) fn sample<G, R>(group: &G, sigma: bool, rng: &mut R) -> Self
    where
        G: DlogGroup<Element = E>,
        R: Rng + CryptoRng,
    {
        let alpha = group.random_scalar(rng);
        let beta = group.random_scalar(rng);
        let ab = (&alpha * &beta) % group.order();
        let gamma = loop {
            let gamma = group.random_scalar(rng);
            if gamma != ab {
                break gamma;
            }
        };
        let real = group.exponentiate_generator(&ab);
        let fake = group.exponentiate_generator(&gamma);
        let (z0, z1) = if sigma { (fake, real) } else { (real, fake) };
        Self {
            x: group.exponentiate_generator(&alpha),
            y: group.exponentiate_generator(&beta),
            alpha,
            beta,
            z0,
            z1,
        }
    }

    pub(crate) fn message<G: DlogGroup<Element = E>>(&self, group: &G) -> ReceiverQuadrupleMsg {
        ReceiverQuadrupleMsg {
            x: group.encode(&self.x),
            y: group.encode(&self.y),
            z0: group.encode(&self.z0),
            z1: group.encode(&self.z1),
        }
    }

    /// The key on side `σ`: `w_σ^β`.
    pub(crate) fn key<G: DlogGroup<Element = E>>(&self, group: &G, w: &E) -> E {
        group.exponentiate(w, &self.beta)
    }
}

/// A quadruple as received and checked by the sender.
#[derive(Clone, Debug)]
pub(crate) struct SenderQuadruple<E> {
    pub(crate) x: E,
    y: E,
    z0: E,
    z1: E,
}

impl<E: Clone + PartialEq> SenderQuadruple<E> {
    /// Decode the tuple, rejecting non-members and `z0 = z1`.
    pub(crate) fn from_message<G: DlogGroup<Element = E>>(
        group: &G,
        msg: &ReceiverQuadrupleMsg,
    ) -> Result<Self, Error> {
        let tuple = Self {
            x: decode_member(group, &msg.x, "x")?,
            y: decode_member(group, &msg.y, "y")?,
            z0: decode_member(group, &msg.z0, "z0")?,
            z1: decode_member(group, &msg.z1, "z1")?,
        };
        if tuple.z0 == tuple.z1 {
            log::warn!("receiver sent z0 = z1");
            return Err(Error::CheatDetected("z0 equals z1".to_string()));
        }
        Ok(tuple)
    }

    /// Randomize side `b`: `w_b = x^u · g^v` and key `k_b = z_b^u · y^v` for
    /// fresh `u, v`.
    pub(crate) fn side<G, R>(&self, group: &G, b: bool, rng: &mut R) -> (E, E)
    where
        G: DlogGroup<Element = E>,
        R: Rng + CryptoRng,
    {
        let u = group.random_scalar(rng);
        let v = group.random_scalar(rng);
        let z = if b { &self.z1 } else { &self.z0 };
        let w = group.multiply(
            &group.exponentiate(&self.x, &u),
            &group.exponentiate_generator(&v),
        );
        let k = group.multiply(&group.exponentiate(z, &u), &group.exponentiate(&self.y, &v));
        (w, k)
    }
}

/// Decode the randomizers `w0, w1` of a sender answer.
pub(crate) fn receiver_quadruple_answer<G: DlogGroup>(
    group: &G,
    msg: &SenderQuadrupleMsg,
) -> Result<(G::Element, G::Element), Error> {
    Ok((
        decode_member(group, &msg.w0, "w0")?,
        decode_member(group, &msg.w1, "w1")?,
    ))
}
