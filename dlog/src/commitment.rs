//! Pedersen trapdoor commitments over a discrete-log group.
//!
//! The receiver samples a trapdoor `τ` and publishes `h = g^τ`. A commitment
//! to `value` is `c = g^r · h^H(value)` for a fresh random `r`, where `H` is
//! SHA-256 reduced modulo the group order. Commitments are perfectly hiding;
//! they are binding for anyone who does not know `τ`.
//!
//! # Usage
//! ```rust
//! use dlog::{
//!     commitment::{CommitmentReceiver, Committer, PedersenCommitter, PedersenReceiver},
//!     RistrettoGroup,
//! };
//!
//! let group = RistrettoGroup::new();
//! let mut rng = rand::thread_rng();
//! let mut receiver = PedersenReceiver::new(&group, &mut rng);
//! let mut committer = PedersenCommitter::new(&group, receiver.key().clone()).unwrap();
//!
//! let commitment = committer.commit(b"hello world", &mut rng).unwrap();
//! let id = receiver.receive_commitment(&commitment).unwrap();
//! let opening = committer.decommit(id).unwrap();
//! assert!(receiver.verify_decommitment(&opening).unwrap());
//! ```

use crate::{
    channel::{AbstractChannel, MessageChannel, WireMessage},
    errors::Error,
    group::DlogGroup,
};
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

/// Identifier of a commitment, chosen by the committer.
pub type CommitmentId = u64;

/// The receiver's public key `h`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PedersenKeyMsg {
    /// Encoding of `h`.
    pub h: Vec<u8>,
}

impl WireMessage for PedersenKeyMsg {
    const TAG: u8 = 0x10;
    const NAME: &'static str = "PedersenKeyMsg";
}

/// A commitment `c` together with its id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PedersenCommitmentMsg {
    /// Commitment id.
    pub id: CommitmentId,
    /// Encoding of `c`.
    pub c: Vec<u8>,
}

impl WireMessage for PedersenCommitmentMsg {
    const TAG: u8 = 0x11;
    const NAME: &'static str = "PedersenCommitmentMsg";
}

/// The opening of a commitment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PedersenDecommitmentMsg {
    /// Commitment id.
    pub id: CommitmentId,
    /// Committed value.
    pub value: Vec<u8>,
    /// Big-endian encoding of the randomness `r`.
    pub randomness: Vec<u8>,
}

impl WireMessage for PedersenDecommitmentMsg {
    const TAG: u8 = 0x12;
    const NAME: &'static str = "PedersenDecommitmentMsg";
}

/// The committing half of a commitment scheme.
pub trait Committer {
    /// Message carrying a commitment.
    type Commitment: WireMessage;
    /// Message carrying an opening.
    type Opening: WireMessage;

    /// Commit to `value` under a fresh id.
    fn commit<R: Rng + CryptoRng>(
        &mut self,
        value: &[u8],
        rng: &mut R,
    ) -> Result<Self::Commitment, Error>;

    /// Hand out the opening of commitment `id`. Each opening is released once.
    fn decommit(&mut self, id: CommitmentId) -> Result<Self::Opening, Error>;
}

/// The receiving half of a commitment scheme.
pub trait CommitmentReceiver {
    /// Message carrying a commitment.
    type Commitment: WireMessage;
    /// Message carrying an opening.
    type Opening: WireMessage;

    /// Store a received commitment and return its id.
    fn receive_commitment(&mut self, msg: &Self::Commitment) -> Result<CommitmentId, Error>;

    /// Check an opening against the stored commitment, consuming it.
    fn verify_decommitment(&mut self, msg: &Self::Opening) -> Result<bool, Error>;
}

fn hash_to_scalar(value: &[u8], order: &BigUint) -> BigUint {
    BigUint::from_bytes_be(&Sha256::digest(value)) % order
}

fn commitment_value<G: DlogGroup>(
    group: &G,
    h: &G::Element,
    value: &[u8],
    r: &BigUint,
) -> G::Element {
    let m = hash_to_scalar(value, group.order());
    group.multiply(&group.exponentiate_generator(r), &group.exponentiate(h, &m))
}

/// Commits to values under a receiver's key.
#[derive(Debug)]
pub struct PedersenCommitter<G: DlogGroup> {
    group: G,
    h: G::Element,
    next_id: CommitmentId,
    openings: HashMap<CommitmentId, (Vec<u8>, BigUint)>,
}

impl<G: DlogGroup> PedersenCommitter<G> {
    /// Create a committer for the key `h`.
    pub fn new(group: &G, h: G::Element) -> Result<Self, Error> {
        if !group.is_member(&h) || group.is_identity(&h) {
            return Err(Error::InvalidEncoding(
                "commitment key must be a non-identity group member".to_string(),
            ));
        }
        Ok(Self {
            group: group.clone(),
            h,
            next_id: 0,
            openings: HashMap::new(),
        })
    }

    /// Receive the key from the receiver and create a committer for it.
    pub fn from_channel<C: AbstractChannel>(group: &G, channel: &mut C) -> Result<Self, Error> {
        let msg: PedersenKeyMsg = channel.receive_message()?;
        let h = group.decode(&msg.h, true)?;
        Self::new(group, h)
    }

    /// Check that `trapdoor` is the discrete log of the key.
    pub fn validate_trapdoor(&self, trapdoor: &BigUint) -> bool {
        self.group.exponentiate_generator(trapdoor) == self.h
    }
}

impl<G: DlogGroup> Committer for PedersenCommitter<G> {
    type Commitment = PedersenCommitmentMsg;
    type Opening = PedersenDecommitmentMsg;

    fn commit<R: Rng + CryptoRng>(
        &mut self,
        value: &[u8],
        rng: &mut R,
    ) -> Result<PedersenCommitmentMsg, Error> {
        let r = self.group.random_scalar(rng);
        let c = commitment_value(&self.group, &self.h, value, &r);
        let id = self.next_id;
        self.next_id += 1;
        self.openings.insert(id, (value.to_vec(), r));
        log::debug!("committed to {} bytes under id {}", value.len(), id);
        Ok(PedersenCommitmentMsg {
            id,
            c: self.group.encode(&c),
        })
    }

    fn decommit(&mut self, id: CommitmentId) -> Result<PedersenDecommitmentMsg, Error> {
        let (value, r) = self
            .openings
            .remove(&id)
            .ok_or(Error::ResourceNotFound(id))?;
        Ok(PedersenDecommitmentMsg {
            id,
            value,
            randomness: r.to_bytes_be(),
        })
    }
}

/// Holds the trapdoor and checks openings of received commitments.
#[derive(Debug)]
pub struct PedersenReceiver<G: DlogGroup> {
    group: G,
    trapdoor: BigUint,
    h: G::Element,
    commitments: HashMap<CommitmentId, G::Element>,
}

impl<G: DlogGroup> PedersenReceiver<G> {
    /// Sample a fresh trapdoor and key.
    pub fn new<R: Rng + CryptoRng>(group: &G, rng: &mut R) -> Self {
        let trapdoor = rng.gen_biguint_range(&BigUint::one(), group.order());
        let h = group.exponentiate_generator(&trapdoor);
        Self {
            group: group.clone(),
            trapdoor,
            h,
            commitments: HashMap::new(),
        }
    }

    /// The public key `h`.
    pub fn key(&self) -> &G::Element {
        &self.h
    }

    /// The trapdoor `τ` with `h = g^τ`.
    pub fn trapdoor(&self) -> &BigUint {
        &self.trapdoor
    }

    /// The key as a wire message.
    pub fn key_message(&self) -> PedersenKeyMsg {
        PedersenKeyMsg {
            h: self.group.encode(&self.h),
        }
    }

    /// Send the key to the committer.
    pub fn setup<C: AbstractChannel>(&self, channel: &mut C) -> Result<(), Error> {
        channel.send_message(&self.key_message())
    }

    /// Check that `(value, randomness)` opens commitment `id`. The stored
    /// commitment is consumed whatever the outcome.
    pub fn decommit(
        &mut self,
        id: CommitmentId,
        value: &[u8],
        randomness: &BigUint,
    ) -> Result<bool, Error> {
        let c = self
            .commitments
            .remove(&id)
            .ok_or(Error::ResourceNotFound(id))?;
        if randomness >= self.group.order() {
            return Ok(false);
        }
        let expected = commitment_value(&self.group, &self.h, value, randomness);
        let ok: bool = self
            .group
            .encode(&expected)
            .ct_eq(&self.group.encode(&c))
            .into();
        log::debug!("opening of commitment {} accepted: {}", id, ok);
        Ok(ok)
    }
}

impl<G: DlogGroup> CommitmentReceiver for PedersenReceiver<G> {
    type Commitment = PedersenCommitmentMsg;
    type Opening = PedersenDecommitmentMsg;

    fn receive_commitment(&mut self, msg: &PedersenCommitmentMsg) -> Result<CommitmentId, Error> {
        if self.commitments.contains_key(&msg.id) {
            return Err(Error::InvalidInput(format!(
                "commitment id {} is already in use",
                msg.id
            )));
        }
        let c = self.group.decode(&msg.c, true)?;
        self.commitments.insert(msg.id, c);
        Ok(msg.id)
    }

    fn verify_decommitment(&mut self, msg: &PedersenDecommitmentMsg) -> Result<bool, Error> {
        let r = BigUint::from_bytes_be(&msg.randomness);
        self.decommit(msg.id, &msg.value, &r)
    }
}
