//! Zero-knowledge proof of knowledge from any Sigma protocol.
//!
//! The verifier first publishes a Pedersen key. The prover commits to its
//! first message `a` under that key before the challenge is revealed, then
//! opens the commitment together with its response `z`. The verifier accepts
//! iff the opening is valid and `(a, e, z)` verifies.

use super::{ChallengeMessage, SigmaMsg, SigmaProverComputation, SigmaVerifierComputation};
use crate::errors::Error;
use ::dlog::{
    commitment::{
        CommitmentReceiver, Committer, PedersenCommitmentMsg, PedersenCommitter,
        PedersenDecommitmentMsg, PedersenReceiver,
    },
    AbstractChannel, DlogGroup, MessageChannel, WireMessage,
};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// Progress of a proof, from either party's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZkPokState {
    /// Nothing has happened yet.
    Idle,
    /// The commitment to `a` has been exchanged.
    Committed,
    /// The challenge has been exchanged.
    ChallengeReceived,
    /// The opening and response have been exchanged.
    Opened,
    /// The verifier accepted.
    Accepted,
    /// The verifier rejected.
    Rejected,
}

/// The prover's last message: the opening of `a` and the response `z`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZkPokOpening<Z> {
    /// Opening of the commitment to `a`.
    pub decommitment: PedersenDecommitmentMsg,
    /// The response `z`.
    pub second: Z,
}

impl<Z: SigmaMsg> WireMessage for ZkPokOpening<Z> {
    const TAG: u8 = 0x25;
    const NAME: &'static str = "ZkPokOpening";
}

/// Proves knowledge of a witness for `P`'s relation.
pub struct ZkPokProver<P, G> {
    prover: P,
    group: G,
    state: ZkPokState,
}

impl<P: SigmaProverComputation, G: DlogGroup> ZkPokProver<P, G> {
    /// Wrap `prover`; commitments are made in `group`.
    pub fn new(group: &G, prover: P) -> Self {
        Self {
            prover,
            group: group.clone(),
            state: ZkPokState::Idle,
        }
    }

    /// Where the proof stands.
    pub fn state(&self) -> ZkPokState {
        self.state
    }

    /// Run the proof. A prover object proves once.
    pub fn prove<C: AbstractChannel, R: Rng + CryptoRng>(
        &mut self,
        channel: &mut C,
        input: &P::Input,
        witness: &P::Witness,
        rng: &mut R,
    ) -> Result<(), Error> {
        if self.state != ZkPokState::Idle {
            return Err(Error::IllegalUsage(format!(
                "proof already run (state {:?})",
                self.state
            )));
        }
        let mut committer = PedersenCommitter::from_channel(&self.group, channel)?;
        let a = self.prover.compute_first_msg(input, witness, rng)?;
        let bytes = bincode::serialize(&a).map_err(::dlog::Error::from)?;
        let commitment = committer.commit(&bytes, rng)?;
        channel.send_message(&commitment)?;
        self.state = ZkPokState::Committed;

        let ChallengeMessage { challenge } = channel.receive_message()?;
        if challenge.bits() != self.prover.soundness_bits() {
            log::warn!("verifier sent a {}-bit challenge", challenge.bits());
            return Err(Error::CheatDetected(
                "challenge has the wrong length".to_string(),
            ));
        }
        self.state = ZkPokState::ChallengeReceived;

        let second = self.prover.compute_second_msg(&challenge)?;
        let decommitment = committer.decommit(commitment.id)?;
        channel.send_message(&ZkPokOpening {
            decommitment,
            second,
        })?;
        self.state = ZkPokState::Opened;
        log::debug!("proof of knowledge sent");
        Ok(())
    }
}

/// Verifies a proof of knowledge for `V`'s relation.
pub struct ZkPokVerifier<V, G> {
    verifier: V,
    group: G,
    state: ZkPokState,
}

impl<V: SigmaVerifierComputation, G: DlogGroup> ZkPokVerifier<V, G> {
    /// Wrap `verifier`; the commitment key is sampled in `group`.
    pub fn new(group: &G, verifier: V) -> Self {
        Self {
            verifier,
            group: group.clone(),
            state: ZkPokState::Idle,
        }
    }

    /// Where the proof stands.
    pub fn state(&self) -> ZkPokState {
        self.state
    }

    /// Run the proof and report whether it was accepted.
    pub fn verify<C: AbstractChannel, R: Rng + CryptoRng>(
        &mut self,
        channel: &mut C,
        input: &V::Input,
        rng: &mut R,
    ) -> Result<bool, Error> {
        if self.state != ZkPokState::Idle {
            return Err(Error::IllegalUsage(format!(
                "proof already run (state {:?})",
                self.state
            )));
        }
        let mut receiver = PedersenReceiver::new(&self.group, rng);
        receiver.setup(channel)?;
        let commitment: PedersenCommitmentMsg = channel.receive_message()?;
        let id = receiver.receive_commitment(&commitment)?;
        self.state = ZkPokState::Committed;

        let challenge = self.verifier.sample_challenge(rng);
        channel.send_message(&ChallengeMessage { challenge })?;
        self.state = ZkPokState::ChallengeReceived;

        let opening: ZkPokOpening<V::SecondMsg> = channel.receive_message()?;
        self.state = ZkPokState::Opened;
        let ok = opening.decommitment.id == id
            && receiver.verify_decommitment(&opening.decommitment)?
            && match bincode::deserialize::<V::FirstMsg>(&opening.decommitment.value) {
                Ok(a) => self.verifier.verify(input, &a, &opening.second)?,
                Err(_) => false,
            };
        if ok {
            self.state = ZkPokState::Accepted;
        } else {
            log::warn!("proof of knowledge rejected");
            self.state = ZkPokState::Rejected;
        }
        Ok(ok)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::{
        sigma::{
            DlogStatement, SigmaAndProver, SigmaAndVerifier, SigmaDlogProver, SigmaDlogVerifier,
        },
        ProtocolConfig,
    };
    use ::dlog::{unix_channel_pair, RistrettoGroup};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Runs a dlog proof where the prover knows the log of `g^w` and the
    /// verifier checks it against `h` (`None` meaning `g^w`).
    fn run(claimed: Option<u64>) -> (bool, ZkPokState) {
        let _ = pretty_env_logger::try_init();
        let group = RistrettoGroup::new();
        let config = ProtocolConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(30);
        let w = group.random_scalar(&mut rng);
        let known = DlogStatement {
            h: group.exponentiate_generator(&w),
        };
        let checked = match claimed {
            Some(x) => DlogStatement {
                h: group.exponentiate_generator(&x.into()),
            },
            None => known.clone(),
        };
        let (mut sender, mut receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            let mut rng = ChaCha20Rng::seed_from_u64(31);
            let group = RistrettoGroup::new();
            let prover = SigmaDlogProver::new(&group, &config).unwrap();
            let mut zk = ZkPokProver::new(&group, prover);
            zk.prove(&mut sender, &known, &w, &mut rng).unwrap();
            assert_eq!(zk.state(), ZkPokState::Opened);
            assert!(matches!(
                zk.prove(&mut sender, &known, &w, &mut rng),
                Err(Error::IllegalUsage(_))
            ));
        });
        let verifier = SigmaDlogVerifier::new(&group, &config).unwrap();
        let mut zk = ZkPokVerifier::new(&group, verifier);
        let ok = zk.verify(&mut receiver, &checked, &mut rng).unwrap();
        handle.join().unwrap();
        (ok, zk.state())
    }

    #[test]
    fn honest_proof_is_accepted() {
        assert_eq!(run(None), (true, ZkPokState::Accepted));
    }

    #[test]
    fn proof_for_another_statement_is_rejected() {
        assert_eq!(run(Some(12345)), (false, ZkPokState::Rejected));
    }

    #[test]
    fn and_composition_inside_zkpok() {
        let group = RistrettoGroup::new();
        let config = ProtocolConfig::new(128);
        let mut rng = ChaCha20Rng::seed_from_u64(32);
        let witnesses: Vec<_> = (0..3).map(|_| group.random_scalar(&mut rng)).collect();
        let statements: Vec<_> = witnesses
            .iter()
            .map(|w| DlogStatement {
                h: group.exponentiate_generator(w),
            })
            .collect();
        let prover_statements = statements.clone();
        let (mut sender, mut receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            let mut rng = ChaCha20Rng::seed_from_u64(33);
            let group = RistrettoGroup::new();
            let provers = (0..3)
                .map(|_| SigmaDlogProver::new(&group, &config).unwrap())
                .collect();
            let mut zk = ZkPokProver::new(&group, SigmaAndProver::new(provers).unwrap());
            zk.prove(&mut sender, &prover_statements, &witnesses, &mut rng)
                .unwrap();
        });
        let verifiers = (0..3)
            .map(|_| SigmaDlogVerifier::new(&group, &config).unwrap())
            .collect();
        let mut zk = ZkPokVerifier::new(&group, SigmaAndVerifier::new(verifiers).unwrap());
        assert!(zk.verify(&mut receiver, &statements, &mut rng).unwrap());
        handle.join().unwrap();
    }
}
