//! Sigma protocols: three-move honest-verifier zero-knowledge proofs.
//!
//! A concrete relation supplies a prover, a verifier and a simulator through
//! the [`SigmaProverComputation`], [`SigmaVerifierComputation`] and
//! [`SigmaSimulator`] traits. These describe the computations only; the
//! [`SigmaProver`] and [`SigmaVerifier`] drivers run them over a channel, and
//! [`zkpok`] wraps them in a commit-then-open proof of knowledge.
//!
//! This module provides the following relations and compositions:
//!
//! * `dlog`: knowledge of `w` with `h = g^w`.
//! * `and`: knowledge of witnesses for every statement in a list.
//! * `or`: knowledge of witnesses for at least `k` of `n` statements.

pub mod and;
pub mod dlog;
pub mod or;
pub mod zkpok;

use crate::errors::Error;
use ::dlog::{AbstractChannel, MessageChannel, WireMessage};
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;

pub use self::{
    and::{SigmaAndProver, SigmaAndSimulator, SigmaAndVerifier},
    dlog::{DlogStatement, SigmaDlogProver, SigmaDlogSimulator, SigmaDlogVerifier},
    or::{OrStatement, SigmaOrProver, SigmaOrSimulator, SigmaOrVerifier},
    zkpok::{ZkPokProver, ZkPokState, ZkPokVerifier},
};

/// Bounds shared by every Sigma protocol message.
pub trait SigmaMsg: Serialize + DeserializeOwned + Clone + Debug {}

impl<T: Serialize + DeserializeOwned + Clone + Debug> SigmaMsg for T {}

/// A verifier challenge: a uniformly random `t`-bit string, stored as `t / 8`
/// big-endian bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Challenge(Vec<u8>);

impl Challenge {
    /// Sample a random challenge of `bits` bits.
    pub fn random<R: Rng + CryptoRng>(bits: u32, rng: &mut R) -> Self {
        let mut bytes = vec![0u8; (bits / 8) as usize];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// A challenge of `bits` bits from its encoding.
    pub fn from_bytes(bits: u32, bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() * 8 != bits as usize {
            return Err(Error::InvalidInput(format!(
                "challenge must be {} bits, got {} bytes",
                bits,
                bytes.len()
            )));
        }
        Ok(Self(bytes.to_vec()))
    }

    /// The encoded challenge.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bits.
    pub fn bits(&self) -> u32 {
        (self.0.len() * 8) as u32
    }

    /// The challenge read as a non-negative integer.
    pub fn to_scalar(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    pub(crate) fn check_bits(&self, bits: u32) -> Result<(), Error> {
        if self.bits() != bits {
            return Err(Error::InvalidInput(format!(
                "expected a {}-bit challenge, got {} bits",
                bits,
                self.bits()
            )));
        }
        Ok(())
    }
}

/// An accepting (or simulated) conversation `(a, e, z)`.
#[derive(Clone, Debug)]
pub struct Transcript<A, Z> {
    /// The prover's first message.
    pub first: A,
    /// The verifier's challenge.
    pub challenge: Challenge,
    /// The prover's response.
    pub second: Z,
}

/// The prover side of a Sigma protocol.
///
/// A prover object runs one proof at a time: `compute_first_msg` fixes the
/// randomness that `compute_second_msg` consumes.
pub trait SigmaProverComputation {
    /// Public statement.
    type Input;
    /// Secret witness.
    type Witness;
    /// First message `a`.
    type FirstMsg: SigmaMsg;
    /// Response `z`.
    type SecondMsg: SigmaMsg;
    /// Simulator for the same relation.
    type Simulator: SigmaSimulator<
        Input = Self::Input,
        FirstMsg = Self::FirstMsg,
        SecondMsg = Self::SecondMsg,
    >;

    /// The soundness parameter `t`.
    fn soundness_bits(&self) -> u32;

    /// Compute `a` for `input`, remembering the randomness used.
    fn compute_first_msg<R: Rng + CryptoRng>(
        &mut self,
        input: &Self::Input,
        witness: &Self::Witness,
        rng: &mut R,
    ) -> Result<Self::FirstMsg, Error>;

    /// Answer `challenge`. Fails with `IllegalUsage` unless a first message is
    /// outstanding.
    fn compute_second_msg(&mut self, challenge: &Challenge) -> Result<Self::SecondMsg, Error>;

    /// A simulator with the same parameters.
    fn simulator(&self) -> Self::Simulator;
}

/// The verifier side of a Sigma protocol.
pub trait SigmaVerifierComputation {
    /// Public statement.
    type Input;
    /// First message `a`.
    type FirstMsg: SigmaMsg;
    /// Response `z`.
    type SecondMsg: SigmaMsg;

    /// The soundness parameter `t`.
    fn soundness_bits(&self) -> u32;

    /// Sample and remember a uniformly random challenge.
    fn sample_challenge<R: Rng + CryptoRng>(&mut self, rng: &mut R) -> Challenge;

    /// Use `challenge` instead of sampling one.
    fn set_challenge(&mut self, challenge: Challenge) -> Result<(), Error>;

    /// The current challenge, if any.
    fn challenge(&self) -> Option<&Challenge>;

    /// Check `(a, e, z)` against `input` for the current challenge `e`.
    /// Malformed messages are rejected, not reported as errors.
    fn verify(
        &self,
        input: &Self::Input,
        first: &Self::FirstMsg,
        second: &Self::SecondMsg,
    ) -> Result<bool, Error>;
}

/// Produces transcripts indistinguishable from honest ones, without a
/// witness.
pub trait SigmaSimulator {
    /// Public statement.
    type Input;
    /// First message `a`.
    type FirstMsg: SigmaMsg;
    /// Response `z`.
    type SecondMsg: SigmaMsg;

    /// The soundness parameter `t`.
    fn soundness_bits(&self) -> u32;

    /// Simulate a transcript for a challenge fixed in advance.
    fn simulate_with_challenge<R: Rng + CryptoRng>(
        &self,
        input: &Self::Input,
        challenge: &Challenge,
        rng: &mut R,
    ) -> Result<Transcript<Self::FirstMsg, Self::SecondMsg>, Error>;

    /// Simulate a transcript for a random challenge.
    fn simulate<R: Rng + CryptoRng>(
        &self,
        input: &Self::Input,
        rng: &mut R,
    ) -> Result<Transcript<Self::FirstMsg, Self::SecondMsg>, Error> {
        let challenge = Challenge::random(self.soundness_bits(), rng);
        self.simulate_with_challenge(input, &challenge, rng)
    }
}

/// Wire form of a first message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SigmaFirstMessage<A> {
    /// The first message `a`.
    pub first: A,
}

impl<A: SigmaMsg> WireMessage for SigmaFirstMessage<A> {
    const TAG: u8 = 0x20;
    const NAME: &'static str = "SigmaFirstMessage";
}

/// Wire form of a challenge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChallengeMessage {
    /// The challenge `e`.
    pub challenge: Challenge,
}

impl WireMessage for ChallengeMessage {
    const TAG: u8 = 0x21;
    const NAME: &'static str = "ChallengeMessage";
}

/// Wire form of a response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SigmaSecondMessage<Z> {
    /// The response `z`.
    pub second: Z,
}

impl<Z: SigmaMsg> WireMessage for SigmaSecondMessage<Z> {
    const TAG: u8 = 0x22;
    const NAME: &'static str = "SigmaSecondMessage";
}

/// Runs the prover side of a plain Sigma protocol over a channel.
#[derive(Debug)]
pub struct SigmaProver<P> {
    prover: P,
}

impl<P: SigmaProverComputation> SigmaProver<P> {
    /// Wrap a prover computation.
    pub fn new(prover: P) -> Self {
        Self { prover }
    }

    /// Send `a`, receive `e`, send `z`.
    pub fn prove<C: AbstractChannel, R: Rng + CryptoRng>(
        &mut self,
        channel: &mut C,
        input: &P::Input,
        witness: &P::Witness,
        rng: &mut R,
    ) -> Result<(), Error> {
        let first = self.prover.compute_first_msg(input, witness, rng)?;
        channel.send_message(&SigmaFirstMessage { first })?;
        let ChallengeMessage { challenge } = channel.receive_message()?;
        if challenge.bits() != self.prover.soundness_bits() {
            log::warn!("verifier sent a {}-bit challenge", challenge.bits());
            return Err(Error::CheatDetected(
                "challenge has the wrong length".to_string(),
            ));
        }
        let second = self.prover.compute_second_msg(&challenge)?;
        channel.send_message(&SigmaSecondMessage { second })?;
        log::debug!("sigma proof sent");
        Ok(())
    }
}

/// Runs the verifier side of a plain Sigma protocol over a channel.
#[derive(Debug)]
pub struct SigmaVerifier<V> {
    verifier: V,
}

impl<V: SigmaVerifierComputation> SigmaVerifier<V> {
    /// Wrap a verifier computation.
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Receive `a`, send a random `e`, receive `z` and check the transcript.
    pub fn verify<C: AbstractChannel, R: Rng + CryptoRng>(
        &mut self,
        channel: &mut C,
        input: &V::Input,
        rng: &mut R,
    ) -> Result<bool, Error> {
        let SigmaFirstMessage { first } = channel.receive_message()?;
        let challenge = self.verifier.sample_challenge(rng);
        channel.send_message(&ChallengeMessage { challenge })?;
        let SigmaSecondMessage { second } = channel.receive_message()?;
        let ok = self.verifier.verify(input, &first, &second)?;
        if !ok {
            log::warn!("sigma proof rejected");
        }
        Ok(ok)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use ::dlog::{unix_channel_pair, DlogGroup, RistrettoGroup};
    use crate::ProtocolConfig;
    use num_bigint::BigUint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn challenge_encoding() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let e = Challenge::random(80, &mut rng);
        assert_eq!(e.as_bytes().len(), 10);
        assert_eq!(e.bits(), 80);
        assert!(e.to_scalar().bits() <= 80);
        assert!(Challenge::from_bytes(80, &[0u8; 9]).is_err());
        assert_eq!(
            Challenge::from_bytes(16, &[1, 2]).unwrap().to_scalar(),
            BigUint::from(0x0102u32)
        );
    }

    fn run_dlog(witness_matches: bool) -> bool {
        let _ = pretty_env_logger::try_init();
        let group = RistrettoGroup::new();
        let config = ProtocolConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let w = group.random_scalar(&mut rng);
        let h = if witness_matches {
            group.exponentiate_generator(&w)
        } else {
            group.random_element(&mut rng)
        };
        let statement = DlogStatement { h };
        let prover_statement = if witness_matches {
            statement.clone()
        } else {
            DlogStatement {
                h: group.exponentiate_generator(&w),
            }
        };
        let (mut sender, mut receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            let mut rng = ChaCha20Rng::seed_from_u64(2);
            let group = RistrettoGroup::new();
            let prover = SigmaDlogProver::new(&group, &config).unwrap();
            SigmaProver::new(prover)
                .prove(&mut sender, &prover_statement, &w, &mut rng)
                .unwrap();
        });
        let verifier = SigmaDlogVerifier::new(&group, &config).unwrap();
        let ok = SigmaVerifier::new(verifier)
            .verify(&mut receiver, &statement, &mut rng)
            .unwrap();
        handle.join().unwrap();
        ok
    }

    #[test]
    fn interactive_dlog_proof() {
        assert!(run_dlog(true));
        assert!(!run_dlog(false));
    }

    #[test]
    fn short_challenge_from_verifier_is_cheating() {
        let _ = pretty_env_logger::try_init();
        let group = RistrettoGroup::new();
        let config = ProtocolConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let w = group.random_scalar(&mut rng);
        let statement = DlogStatement {
            h: group.exponentiate_generator(&w),
        };
        let (mut sender, mut receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            let _: SigmaFirstMessage<crate::sigma::dlog::GroupElementMsg> = receiver.receive_message().unwrap();
            let challenge = Challenge::from_bytes(16, &[1, 2]).unwrap();
            receiver
                .send_message(&ChallengeMessage { challenge })
                .unwrap();
        });
        let prover = SigmaDlogProver::new(&group, &config).unwrap();
        let err = SigmaProver::new(prover)
            .prove(&mut sender, &statement, &w, &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::CheatDetected(_)));
        assert!(err.is_cheat());
        handle.join().unwrap();
    }
}
