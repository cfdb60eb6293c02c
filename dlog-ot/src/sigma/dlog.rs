//! Knowledge of a discrete logarithm: the prover knows `w` with `h = g^w`.
//!
//! The prover sends `a = g^r`, receives `e`, and answers `z = r + e·w mod q`.
//! The verifier accepts iff `g^z = a · h^e`.

use super::{
    Challenge, SigmaProverComputation, SigmaSimulator, SigmaVerifierComputation, Transcript,
};
use crate::{config::ProtocolConfig, errors::Error};
use ::dlog::DlogGroup;
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// The public statement: the element `h` whose discrete log is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DlogStatement<E> {
    /// The element `h`.
    pub h: E,
}

/// An encoded group element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupElementMsg {
    /// Encoding of the element.
    pub element: Vec<u8>,
}

/// An encoded scalar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarMsg {
    /// Big-endian encoding of the scalar.
    pub value: Vec<u8>,
}

/// Prover for [`DlogStatement`].
#[derive(Clone, Debug)]
pub struct SigmaDlogProver<G: DlogGroup> {
    group: G,
    soundness: u32,
    state: Option<(BigUint, BigUint)>,
}

impl<G: DlogGroup> SigmaDlogProver<G> {
    /// Create a prover; fails if the soundness parameter does not fit `group`.
    pub fn new(group: &G, config: &ProtocolConfig) -> Result<Self, Error> {
        config.challenge_field(group)?;
        Ok(Self {
            group: group.clone(),
            soundness: config.soundness_bits,
            state: None,
        })
    }
}

impl<G: DlogGroup> SigmaProverComputation for SigmaDlogProver<G> {
    type Input = DlogStatement<G::Element>;
    type Witness = BigUint;
    type FirstMsg = GroupElementMsg;
    type SecondMsg = ScalarMsg;
    type Simulator = SigmaDlogSimulator<G>;

    fn soundness_bits(&self) -> u32 {
        self.soundness
    }

    fn compute_first_msg<R: Rng + CryptoRng>(
        &mut self,
        input: &Self::Input,
        witness: &BigUint,
        rng: &mut R,
    ) -> Result<GroupElementMsg, Error> {
        if self.group.exponentiate_generator(witness) != input.h {
            return Err(Error::InvalidInput(
                "witness is not the discrete log of the statement".to_string(),
            ));
        }
        let r = self.group.random_scalar(rng);
        let a = self.group.exponentiate_generator(&r);
        self.state = Some((r, witness % self.group.order()));
        Ok(GroupElementMsg {
            element: self.group.encode(&a),
        })
    }

    fn compute_second_msg(&mut self, challenge: &Challenge) -> Result<ScalarMsg, Error> {
        challenge.check_bits(self.soundness)?;
        let (r, w) = self.state.take().ok_or_else(|| {
            Error::IllegalUsage("second message requested before the first".to_string())
        })?;
        let z = (r + challenge.to_scalar() * w) % self.group.order();
        Ok(ScalarMsg {
            value: z.to_bytes_be(),
        })
    }

    fn simulator(&self) -> SigmaDlogSimulator<G> {
        SigmaDlogSimulator {
            group: self.group.clone(),
            soundness: self.soundness,
        }
    }
}

/// Verifier for [`DlogStatement`].
#[derive(Clone, Debug)]
pub struct SigmaDlogVerifier<G: DlogGroup> {
    group: G,
    soundness: u32,
    challenge: Option<Challenge>,
}

impl<G: DlogGroup> SigmaDlogVerifier<G> {
    /// Create a verifier; fails if the soundness parameter does not fit
    /// `group`.
    pub fn new(group: &G, config: &ProtocolConfig) -> Result<Self, Error> {
        config.challenge_field(group)?;
        Ok(Self {
            group: group.clone(),
            soundness: config.soundness_bits,
            challenge: None,
        })
    }
}

impl<G: DlogGroup> SigmaVerifierComputation for SigmaDlogVerifier<G> {
    type Input = DlogStatement<G::Element>;
    type FirstMsg = GroupElementMsg;
    type SecondMsg = ScalarMsg;

    fn soundness_bits(&self) -> u32 {
        self.soundness
    }

    fn sample_challenge<R: Rng + CryptoRng>(&mut self, rng: &mut R) -> Challenge {
        let e = Challenge::random(self.soundness, rng);
        self.challenge = Some(e.clone());
        e
    }

    fn set_challenge(&mut self, challenge: Challenge) -> Result<(), Error> {
        challenge.check_bits(self.soundness)?;
        self.challenge = Some(challenge);
        Ok(())
    }

    fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    fn verify(
        &self,
        input: &Self::Input,
        first: &GroupElementMsg,
        second: &ScalarMsg,
    ) -> Result<bool, Error> {
        let e = self
            .challenge
            .as_ref()
            .ok_or_else(|| Error::IllegalUsage("no challenge to verify against".to_string()))?;
        let group = &self.group;
        if !group.is_member(&input.h) {
            return Ok(false);
        }
        let a = match group.decode(&first.element, true) {
            Ok(a) => a,
            Err(_) => return Ok(false),
        };
        let z = BigUint::from_bytes_be(&second.value);
        if &z >= group.order() {
            return Ok(false);
        }
        let lhs = group.exponentiate_generator(&z);
        let rhs = group.multiply(&a, &group.exponentiate(&input.h, &e.to_scalar()));
        Ok(lhs == rhs)
    }
}

/// Simulator for [`DlogStatement`]: picks `z` first and solves for `a`.
#[derive(Clone, Debug)]
pub struct SigmaDlogSimulator<G: DlogGroup> {
    group: G,
    soundness: u32,
}

impl<G: DlogGroup> SigmaDlogSimulator<G> {
    /// Create a simulator; fails if the soundness parameter does not fit
    /// `group`.
    pub fn new(group: &G, config: &ProtocolConfig) -> Result<Self, Error> {
        config.challenge_field(group)?;
        Ok(Self {
            group: group.clone(),
            soundness: config.soundness_bits,
        })
    }
}

impl<G: DlogGroup> SigmaSimulator for SigmaDlogSimulator<G> {
    type Input = DlogStatement<G::Element>;
    type FirstMsg = GroupElementMsg;
    type SecondMsg = ScalarMsg;

    fn soundness_bits(&self) -> u32 {
        self.soundness
    }

    fn simulate_with_challenge<R: Rng + CryptoRng>(
        &self,
        input: &Self::Input,
        challenge: &Challenge,
        rng: &mut R,
    ) -> Result<Transcript<GroupElementMsg, ScalarMsg>, Error> {
        challenge.check_bits(self.soundness)?;
        let group = &self.group;
        let z = group.random_scalar(rng);
        let he = group.exponentiate(&input.h, &challenge.to_scalar());
        let a = group.multiply(&group.exponentiate_generator(&z), &group.inverse(&he));
        Ok(Transcript {
            first: GroupElementMsg {
                element: group.encode(&a),
            },
            challenge: challenge.clone(),
            second: ScalarMsg {
                value: z.to_bytes_be(),
            },
        })
    }
}
