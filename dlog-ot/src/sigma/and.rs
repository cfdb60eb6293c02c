//! AND-composition: one challenge answered by every sub-protocol.

use super::{
    Challenge, SigmaProverComputation, SigmaSimulator, SigmaVerifierComputation, Transcript,
};
use crate::errors::Error;
use rand::{CryptoRng, Rng};

fn common_soundness(bits: impl Iterator<Item = u32>) -> Result<u32, Error> {
    let mut bits = bits.peekable();
    let first = *bits.peek().ok_or_else(|| {
        Error::ConfigurationError("composition needs at least one sub-protocol".to_string())
    })?;
    if bits.any(|b| b != first) {
        return Err(Error::ConfigurationError(
            "sub-protocols use different soundness parameters".to_string(),
        ));
    }
    Ok(first)
}

fn check_len(expected: usize, got: usize, what: &str) -> Result<(), Error> {
    if expected != got {
        return Err(Error::InvalidInput(format!(
            "expected {} {}, got {}",
            expected, what, got
        )));
    }
    Ok(())
}

/// Proves every statement in a list.
#[derive(Clone, Debug)]
pub struct SigmaAndProver<P> {
    provers: Vec<P>,
    soundness: u32,
}

impl<P: SigmaProverComputation> SigmaAndProver<P> {
    /// Compose `provers`, one per statement.
    pub fn new(provers: Vec<P>) -> Result<Self, Error> {
        let soundness = common_soundness(provers.iter().map(|p| p.soundness_bits()))?;
        Ok(Self { provers, soundness })
    }
}

impl<P: SigmaProverComputation> SigmaProverComputation for SigmaAndProver<P> {
    type Input = Vec<P::Input>;
    type Witness = Vec<P::Witness>;
    type FirstMsg = Vec<P::FirstMsg>;
    type SecondMsg = Vec<P::SecondMsg>;
    type Simulator = SigmaAndSimulator<P::Simulator>;

    fn soundness_bits(&self) -> u32 {
        self.soundness
    }

    fn compute_first_msg<R: Rng + CryptoRng>(
        &mut self,
        input: &Self::Input,
        witness: &Self::Witness,
        rng: &mut R,
    ) -> Result<Self::FirstMsg, Error> {
        check_len(self.provers.len(), input.len(), "statements")?;
        check_len(self.provers.len(), witness.len(), "witnesses")?;
        self.provers
            .iter_mut()
            .zip(input.iter().zip(witness.iter()))
            .map(|(p, (x, w))| p.compute_first_msg(x, w, &mut *rng))
            .collect()
    }

    fn compute_second_msg(&mut self, challenge: &Challenge) -> Result<Self::SecondMsg, Error> {
        self.provers
            .iter_mut()
            .map(|p| p.compute_second_msg(challenge))
            .collect()
    }

    fn simulator(&self) -> Self::Simulator {
        SigmaAndSimulator {
            simulators: self.provers.iter().map(|p| p.simulator()).collect(),
            soundness: self.soundness,
        }
    }
}

/// Verifies a proof for every statement in a list.
#[derive(Clone, Debug)]
pub struct SigmaAndVerifier<V> {
    verifiers: Vec<V>,
    soundness: u32,
    challenge: Option<Challenge>,
}

impl<V: SigmaVerifierComputation> SigmaAndVerifier<V> {
    /// Compose `verifiers`, one per statement.
    pub fn new(verifiers: Vec<V>) -> Result<Self, Error> {
        let soundness = common_soundness(verifiers.iter().map(|v| v.soundness_bits()))?;
        Ok(Self {
            verifiers,
            soundness,
            challenge: None,
        })
    }
}

impl<V: SigmaVerifierComputation> SigmaVerifierComputation for SigmaAndVerifier<V> {
    type Input = Vec<V::Input>;
    type FirstMsg = Vec<V::FirstMsg>;
    type SecondMsg = Vec<V::SecondMsg>;

    fn soundness_bits(&self) -> u32 {
        self.soundness
    }

    fn sample_challenge<R: Rng + CryptoRng>(&mut self, rng: &mut R) -> Challenge {
        let e = Challenge::random(self.soundness, rng);
        // Every sub-verifier shares `self.soundness`, so none can refuse `e`.
        for v in self.verifiers.iter_mut() {
            let set = v.set_challenge(e.clone());
            debug_assert!(set.is_ok(), "sub-verifier refused a {}-bit challenge", e.bits());
        }
        self.challenge = Some(e.clone());
        e
    }

    fn set_challenge(&mut self, challenge: Challenge) -> Result<(), Error> {
        for v in self.verifiers.iter_mut() {
            v.set_challenge(challenge.clone())?;
        }
        self.challenge = Some(challenge);
        Ok(())
    }

    fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    fn verify(
        &self,
        input: &Self::Input,
        first: &Self::FirstMsg,
        second: &Self::SecondMsg,
    ) -> Result<bool, Error> {
        let e = self
            .challenge
            .as_ref()
            .ok_or_else(|| Error::IllegalUsage("no challenge to verify against".to_string()))?;
        if self.verifiers.iter().any(|v| v.challenge() != Some(e)) {
            return Err(Error::IllegalUsage(
                "sub-verifiers hold a different challenge".to_string(),
            ));
        }
        let n = self.verifiers.len();
        if input.len() != n || first.len() != n || second.len() != n {
            return Ok(false);
        }
        for (i, v) in self.verifiers.iter().enumerate() {
            if !v.verify(&input[i], &first[i], &second[i])? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Simulates proofs for every statement in a list.
#[derive(Clone, Debug)]
pub struct SigmaAndSimulator<S> {
    simulators: Vec<S>,
    soundness: u32,
}

impl<S: SigmaSimulator> SigmaAndSimulator<S> {
    /// Compose `simulators`, one per statement.
    pub fn new(simulators: Vec<S>) -> Result<Self, Error> {
        let soundness = common_soundness(simulators.iter().map(|s| s.soundness_bits()))?;
        Ok(Self {
            simulators,
            soundness,
        })
    }
}

impl<S: SigmaSimulator> SigmaSimulator for SigmaAndSimulator<S> {
    type Input = Vec<S::Input>;
    type FirstMsg = Vec<S::FirstMsg>;
    type SecondMsg = Vec<S::SecondMsg>;

    fn soundness_bits(&self) -> u32 {
        self.soundness
    }

    fn simulate_with_challenge<R: Rng + CryptoRng>(
        &self,
        input: &Self::Input,
        challenge: &Challenge,
        rng: &mut R,
    ) -> Result<Transcript<Self::FirstMsg, Self::SecondMsg>, Error> {
        check_len(self.simulators.len(), input.len(), "statements")?;
        let mut first = Vec::with_capacity(input.len());
        let mut second = Vec::with_capacity(input.len());
        for (s, x) in self.simulators.iter().zip(input.iter()) {
            let t = s.simulate_with_challenge(x, challenge, rng)?;
            first.push(t.first);
            second.push(t.second);
        }
        Ok(Transcript {
            first,
            challenge: challenge.clone(),
            second,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sigma::{DlogStatement, SigmaDlogProver, SigmaDlogVerifier},
        ProtocolConfig,
    };
    use ::dlog::{DlogGroup, RistrettoGroup};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn statements(
        group: &RistrettoGroup,
        n: usize,
        rng: &mut ChaCha20Rng,
    ) -> (
        Vec<DlogStatement<<RistrettoGroup as DlogGroup>::Element>>,
        Vec<num_bigint::BigUint>,
    ) {
        let witnesses: Vec<_> = (0..n).map(|_| group.random_scalar(rng)).collect();
        let inputs = witnesses
            .iter()
            .map(|w| DlogStatement {
                h: group.exponentiate_generator(w),
            })
            .collect();
        (inputs, witnesses)
    }

    #[test]
    fn and_proof_accepts_and_rejects() {
        let group = RistrettoGroup::new();
        let config = ProtocolConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let (mut inputs, witnesses) = statements(&group, 3, &mut rng);
        let mut prover = SigmaAndProver::new(
            (0..3)
                .map(|_| SigmaDlogProver::new(&group, &config).unwrap())
                .collect(),
        )
        .unwrap();
        let mut verifier = SigmaAndVerifier::new(
            (0..3)
                .map(|_| SigmaDlogVerifier::new(&group, &config).unwrap())
                .collect(),
        )
        .unwrap();
        let a = prover
            .compute_first_msg(&inputs, &witnesses, &mut rng)
            .unwrap();
        let e = verifier.sample_challenge(&mut rng);
        let z = prover.compute_second_msg(&e).unwrap();
        assert!(verifier.verify(&inputs, &a, &z).unwrap());
        assert!(!verifier.verify(&inputs[..2].to_vec(), &a, &z).unwrap());
        inputs[1].h = group.random_element(&mut rng);
        assert!(!verifier.verify(&inputs, &a, &z).unwrap());
    }

    #[test]
    fn sampled_challenge_reaches_every_verifier() {
        let group = RistrettoGroup::new();
        let config = ProtocolConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(33);
        let verifiers = (0..3)
            .map(|_| SigmaDlogVerifier::new(&group, &config).unwrap())
            .collect();
        let mut verifier = SigmaAndVerifier::new(verifiers).unwrap();
        let e = verifier.sample_challenge(&mut rng);
        assert_eq!(verifier.challenge(), Some(&e));
        assert!(verifier.verifiers.iter().all(|v| v.challenge() == Some(&e)));
    }

    #[test]
    fn simulated_and_proofs_verify() {
        let group = RistrettoGroup::new();
        let config = ProtocolConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let (inputs, _) = statements(&group, 2, &mut rng);
        let prover = SigmaAndProver::new(vec![
            SigmaDlogProver::new(&group, &config).unwrap(),
            SigmaDlogProver::new(&group, &config).unwrap(),
        ])
        .unwrap();
        let t = prover.simulator().simulate(&inputs, &mut rng).unwrap();
        let mut verifier = SigmaAndVerifier::new(vec![
            SigmaDlogVerifier::new(&group, &config).unwrap(),
            SigmaDlogVerifier::new(&group, &config).unwrap(),
        ])
        .unwrap();
        verifier.set_challenge(t.challenge.clone()).unwrap();
        assert!(verifier.verify(&inputs, &t.first, &t.second).unwrap());
    }

    #[test]
    fn mismatched_soundness_is_a_configuration_error() {
        let group = RistrettoGroup::new();
        let provers = vec![
            SigmaDlogProver::new(&group, &ProtocolConfig::new(80)).unwrap(),
            SigmaDlogProver::new(&group, &ProtocolConfig::new(128)).unwrap(),
        ];
        assert!(matches!(
            SigmaAndProver::new(provers),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            SigmaAndVerifier::<SigmaDlogVerifier<RistrettoGroup>>::new(vec![]),
            Err(Error::ConfigurationError(_))
        ));
    }
}
