//! k-of-n OR-composition.
//!
//! The prover knows witnesses for a set `I` of `k` statements out of `n`. For
//! every other index `j` it picks a challenge `e_j` in `GF(2^t)` up front and
//! simulates that transcript. Once the verifier's challenge `e` arrives, the
//! prover interpolates the polynomial `Q` of degree `n - k` through `(0, e)`
//! and the points `(j + 1, e_j)`, and answers each `i` in `I` honestly with
//! challenge `Q(i + 1)`. Statement `i` (zero-based) sits at the field point
//! `i + 1`, so `0` is reserved for `e`.
//!
//! The verifier checks that `Q` has `n - k + 1` coefficients, that `Q(0) = e`,
//! that every declared `e_i` equals `Q(i + 1)`, and that every sub-transcript
//! verifies.

use super::{
    Challenge, SigmaProverComputation, SigmaSimulator, SigmaVerifierComputation, Transcript,
};
use crate::errors::Error;
use ::dlog::{Gf2t, Gf2tElement, Polynomial};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// The claim that at least `threshold` of `statements` hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrStatement<I> {
    /// The `n` sub-statements.
    pub statements: Vec<I>,
    /// The number `k` of statements the prover can prove.
    pub threshold: usize,
}

impl<I> OrStatement<I> {
    /// Create a statement, requiring `1 <= threshold <= statements.len()`.
    pub fn new(statements: Vec<I>, threshold: usize) -> Result<Self, Error> {
        let statement = Self {
            statements,
            threshold,
        };
        statement.check()?;
        Ok(statement)
    }

    fn check(&self) -> Result<(), Error> {
        if self.threshold == 0 || self.threshold > self.statements.len() {
            return Err(Error::ConfigurationError(format!(
                "threshold {} is out of range for {} statements",
                self.threshold,
                self.statements.len()
            )));
        }
        Ok(())
    }

    /// Like `check`, and also require every field point `1..=n` to exist in
    /// `field`.
    fn check_in(&self, field: &Gf2t) -> Result<(), Error> {
        self.check()?;
        let n = self.statements.len();
        if field.from_index(n).is_err() {
            return Err(Error::ConfigurationError(format!(
                "{} statements do not fit in GF(2^{})",
                n,
                field.bits()
            )));
        }
        Ok(())
    }

    /// Number of coefficients of the challenge polynomial, `n - k + 1`.
    fn polynomial_len(&self) -> usize {
        self.statements.len() - self.threshold + 1
    }
}

/// The first messages of all `n` sub-protocols.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrFirstMsg<A> {
    /// `a_1, ..., a_n`.
    pub messages: Vec<A>,
}

/// The challenge polynomial and every sub-protocol's challenge and response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrSecondMsg<Z> {
    /// Coefficients of `Q`, lowest degree first, `t / 8` bytes each.
    pub polynomial: Vec<Vec<u8>>,
    /// `e_1, ..., e_n`.
    pub challenges: Vec<Vec<u8>>,
    /// `z_1, ..., z_n`.
    pub messages: Vec<Z>,
}

fn point(field: &Gf2t, index: usize) -> Result<Gf2tElement, Error> {
    Ok(field.from_index(index + 1)?)
}

fn to_challenge(field: &Gf2t, e: Gf2tElement) -> Result<Challenge, Error> {
    Challenge::from_bytes(field.bits(), &field.to_bytes(e))
}

struct ProverState<P: SigmaProverComputation> {
    n: usize,
    simulated: Vec<(usize, Challenge, P::SecondMsg)>,
    real: Vec<(usize, P)>,
}

/// Prover for [`OrStatement`].
///
/// The supplied prover is cloned once for every statement with a witness.
pub struct SigmaOrProver<P: SigmaProverComputation> {
    prover: P,
    field: Gf2t,
    state: Option<ProverState<P>>,
}

impl<P: SigmaProverComputation + Clone> SigmaOrProver<P> {
    /// Compose copies of `prover`.
    pub fn new(prover: P) -> Result<Self, Error> {
        let field = Gf2t::new(prover.soundness_bits())?;
        Ok(Self {
            prover,
            field,
            state: None,
        })
    }
}

impl<P: SigmaProverComputation + Clone> SigmaProverComputation for SigmaOrProver<P> {
    type Input = OrStatement<P::Input>;
    /// Pairs of statement index and witness.
    type Witness = Vec<(usize, P::Witness)>;
    type FirstMsg = OrFirstMsg<P::FirstMsg>;
    type SecondMsg = OrSecondMsg<P::SecondMsg>;
    type Simulator = SigmaOrSimulator<P::Simulator>;

    fn soundness_bits(&self) -> u32 {
        self.field.bits()
    }

    fn compute_first_msg<R: Rng + CryptoRng>(
        &mut self,
        input: &Self::Input,
        witness: &Self::Witness,
        rng: &mut R,
    ) -> Result<Self::FirstMsg, Error> {
        input.check_in(&self.field)?;
        if witness.is_empty() {
            return Err(Error::ConfigurationError(
                "an OR proof needs at least one witness".to_string(),
            ));
        }
        let n = input.statements.len();
        if witness.len() != input.threshold {
            return Err(Error::InvalidInput(format!(
                "expected {} witnesses, got {}",
                input.threshold,
                witness.len()
            )));
        }
        let mut witnesses: Vec<Option<&P::Witness>> = vec![None; n];
        for (i, w) in witness {
            let slot = witnesses.get_mut(*i).ok_or_else(|| {
                Error::InvalidInput(format!("witness index {} is out of range", i))
            })?;
            if slot.is_some() {
                return Err(Error::InvalidInput(format!("duplicate witness index {}", i)));
            }
            *slot = Some(w);
        }

        let simulator = self.prover.simulator();
        let mut messages = Vec::with_capacity(n);
        let mut simulated = Vec::with_capacity(n - input.threshold);
        let mut real = Vec::with_capacity(input.threshold);
        for (j, (x, w)) in input.statements.iter().zip(witnesses).enumerate() {
            match w {
                Some(w) => {
                    let mut prover = self.prover.clone();
                    messages.push(prover.compute_first_msg(x, w, rng)?);
                    real.push((j, prover));
                }
                None => {
                    let e = to_challenge(&self.field, self.field.random(rng))?;
                    let t = simulator.simulate_with_challenge(x, &e, rng)?;
                    messages.push(t.first);
                    simulated.push((j, t.challenge, t.second));
                }
            }
        }
        self.state = Some(ProverState { n, simulated, real });
        Ok(OrFirstMsg { messages })
    }

    fn compute_second_msg(&mut self, challenge: &Challenge) -> Result<Self::SecondMsg, Error> {
        let state = self.state.take().ok_or_else(|| {
            Error::IllegalUsage("second message requested before the first".to_string())
        })?;
        challenge.check_bits(self.field.bits())?;
        let field = &self.field;

        let mut points = Vec::with_capacity(state.simulated.len() + 1);
        points.push((field.zero(), field.from_bytes(challenge.as_bytes())?));
        for (j, e, _) in &state.simulated {
            points.push((point(field, *j)?, field.from_bytes(e.as_bytes())?));
        }
        let q = Polynomial::interpolate(field, &points)?;

        let mut challenges = vec![Vec::new(); state.n];
        let mut responses: Vec<Option<P::SecondMsg>> = vec![None; state.n];
        for (j, e, z) in state.simulated {
            challenges[j] = e.as_bytes().to_vec();
            responses[j] = Some(z);
        }
        for (i, mut prover) in state.real {
            let e = to_challenge(field, q.eval(field, point(field, i)?))?;
            responses[i] = Some(prover.compute_second_msg(&e)?);
            challenges[i] = e.as_bytes().to_vec();
        }
        let messages = responses
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::IllegalUsage("incomplete OR prover state".to_string()))?;
        Ok(OrSecondMsg {
            polynomial: q.coefficients().iter().map(|c| field.to_bytes(*c)).collect(),
            challenges,
            messages,
        })
    }

    fn simulator(&self) -> Self::Simulator {
        SigmaOrSimulator {
            simulator: self.prover.simulator(),
            field: self.field,
        }
    }
}

/// Verifier for [`OrStatement`].
///
/// The supplied verifier is cloned once per statement.
pub struct SigmaOrVerifier<V> {
    verifier: V,
    field: Gf2t,
    challenge: Option<Challenge>,
}

impl<V: SigmaVerifierComputation + Clone> SigmaOrVerifier<V> {
    /// Compose copies of `verifier`.
    pub fn new(verifier: V) -> Result<Self, Error> {
        let field = Gf2t::new(verifier.soundness_bits())?;
        Ok(Self {
            verifier,
            field,
            challenge: None,
        })
    }
}

impl<V: SigmaVerifierComputation + Clone> SigmaVerifierComputation for SigmaOrVerifier<V> {
    type Input = OrStatement<V::Input>;
    type FirstMsg = OrFirstMsg<V::FirstMsg>;
    type SecondMsg = OrSecondMsg<V::SecondMsg>;

    fn soundness_bits(&self) -> u32 {
        self.field.bits()
    }

    fn sample_challenge<R: Rng + CryptoRng>(&mut self, rng: &mut R) -> Challenge {
        let e = Challenge::random(self.field.bits(), rng);
        self.challenge = Some(e.clone());
        e
    }

    fn set_challenge(&mut self, challenge: Challenge) -> Result<(), Error> {
        challenge.check_bits(self.field.bits())?;
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
        input.check_in(&self.field)?;
        let field = &self.field;
        let n = input.statements.len();
        if first.messages.len() != n
            || second.challenges.len() != n
            || second.messages.len() != n
            || second.polynomial.len() != input.polynomial_len()
        {
            log::warn!("OR proof has the wrong shape");
            return Ok(false);
        }
        let coefficients = match second
            .polynomial
            .iter()
            .map(|c| field.from_bytes(c))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(c) => c,
            Err(_) => return Ok(false),
        };
        let q = Polynomial::new(coefficients);
        if field.to_bytes(q.eval(field, field.zero())) != e.as_bytes() {
            log::warn!("OR proof polynomial does not pass through the challenge");
            return Ok(false);
        }
        for (i, x) in input.statements.iter().enumerate() {
            let ei = match field.from_bytes(&second.challenges[i]) {
                Ok(ei) => ei,
                Err(_) => return Ok(false),
            };
            if q.eval(field, point(field, i)?) != ei {
                log::warn!("OR proof challenge {} is off the polynomial", i);
                return Ok(false);
            }
            let mut verifier = self.verifier.clone();
            verifier.set_challenge(to_challenge(field, ei)?)?;
            if !verifier.verify(x, &first.messages[i], &second.messages[i])? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Simulator for [`OrStatement`]: draws a random polynomial through the
/// challenge and simulates every sub-transcript.
#[derive(Clone, Debug)]
pub struct SigmaOrSimulator<S> {
    simulator: S,
    field: Gf2t,
}

impl<S: SigmaSimulator> SigmaOrSimulator<S> {
    /// Compose copies of `simulator`.
    pub fn new(simulator: S) -> Result<Self, Error> {
        let field = Gf2t::new(simulator.soundness_bits())?;
        Ok(Self { simulator, field })
    }
}

impl<S: SigmaSimulator> SigmaSimulator for SigmaOrSimulator<S> {
    type Input = OrStatement<S::Input>;
    type FirstMsg = OrFirstMsg<S::FirstMsg>;
    type SecondMsg = OrSecondMsg<S::SecondMsg>;

    fn soundness_bits(&self) -> u32 {
        self.field.bits()
    }

    fn simulate_with_challenge<R: Rng + CryptoRng>(
        &self,
        input: &Self::Input,
        challenge: &Challenge,
        rng: &mut R,
    ) -> Result<Transcript<Self::FirstMsg, Self::SecondMsg>, Error> {
        input.check_in(&self.field)?;
        challenge.check_bits(self.field.bits())?;
        let field = &self.field;
        let mut coefficients = vec![field.from_bytes(challenge.as_bytes())?];
        coefficients.extend((1..input.polynomial_len()).map(|_| field.random(&mut *rng)));
        let q = Polynomial::new(coefficients);

        let n = input.statements.len();
        let mut first = Vec::with_capacity(n);
        let mut challenges = Vec::with_capacity(n);
        let mut messages = Vec::with_capacity(n);
        for (i, x) in input.statements.iter().enumerate() {
            let e = to_challenge(field, q.eval(field, point(field, i)?))?;
            let t = self.simulator.simulate_with_challenge(x, &e, rng)?;
            first.push(t.first);
            challenges.push(e.as_bytes().to_vec());
            messages.push(t.second);
        }
        Ok(Transcript {
            first: OrFirstMsg { messages: first },
            challenge: challenge.clone(),
            second: OrSecondMsg {
                polynomial: q.coefficients().iter().map(|c| field.to_bytes(*c)).collect(),
                challenges,
                messages,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sigma::{DlogStatement, SigmaDlogProver, SigmaDlogSimulator, SigmaDlogVerifier},
        ProtocolConfig,
    };
    use ::dlog::{DlogGroup, RistrettoGroup};
    use num_bigint::BigUint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    type Point = <RistrettoGroup as DlogGroup>::Element;

    struct Setup {
        group: RistrettoGroup,
        config: ProtocolConfig,
        statements: Vec<DlogStatement<Point>>,
        witnesses: Vec<BigUint>,
        rng: ChaCha20Rng,
    }

    fn setup(n: usize, seed: u64) -> Setup {
        let group = RistrettoGroup::new();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let witnesses: Vec<_> = (0..n).map(|_| group.random_scalar(&mut rng)).collect();
        let statements = witnesses
            .iter()
            .map(|w| DlogStatement {
                h: group.exponentiate_generator(w),
            })
            .collect();
        Setup {
            group,
            config: ProtocolConfig::default(),
            statements,
            witnesses,
            rng,
        }
    }

    fn prove(
        s: &mut Setup,
        threshold: usize,
        known: &[usize],
    ) -> (
        SigmaOrVerifier<SigmaDlogVerifier<RistrettoGroup>>,
        OrStatement<DlogStatement<Point>>,
        OrFirstMsg<crate::sigma::dlog::GroupElementMsg>,
        OrSecondMsg<crate::sigma::dlog::ScalarMsg>,
    ) {
        let input = OrStatement::new(s.statements.clone(), threshold).unwrap();
        let witness = known
            .iter()
            .map(|i| (*i, s.witnesses[*i].clone()))
            .collect();
        let mut prover =
            SigmaOrProver::new(SigmaDlogProver::new(&s.group, &s.config).unwrap()).unwrap();
        let mut verifier =
            SigmaOrVerifier::new(SigmaDlogVerifier::new(&s.group, &s.config).unwrap()).unwrap();
        let a = prover
            .compute_first_msg(&input, &witness, &mut s.rng)
            .unwrap();
        let e = verifier.sample_challenge(&mut s.rng);
        let z = prover.compute_second_msg(&e).unwrap();
        (verifier, input, a, z)
    }

    #[test]
    fn one_of_five() {
        let mut s = setup(5, 20);
        // Only statement 2 has a witness.
        let (verifier, input, a, z) = prove(&mut s, 1, &[2]);
        assert_eq!(z.polynomial.len(), 5);
        assert!(verifier.verify(&input, &a, &z).unwrap());
    }

    #[test]
    fn all_witnesses_give_a_constant_polynomial() {
        let mut s = setup(3, 21);
        let (verifier, input, a, z) = prove(&mut s, 3, &[0, 1, 2]);
        assert_eq!(z.polynomial.len(), 1);
        let e = verifier.challenge().unwrap().as_bytes().to_vec();
        assert_eq!(z.polynomial[0], e);
        assert!(z.challenges.iter().all(|c| *c == e));
        assert!(verifier.verify(&input, &a, &z).unwrap());
    }

    #[test]
    fn two_of_four_and_tampering() {
        let mut s = setup(4, 22);
        let (verifier, input, a, z) = prove(&mut s, 2, &[3, 1]);
        assert!(verifier.verify(&input, &a, &z).unwrap());

        let mut bad = z.clone();
        bad.challenges[0][0] ^= 1;
        assert!(!verifier.verify(&input, &a, &bad).unwrap());

        let mut bad = z.clone();
        bad.polynomial.push(vec![0u8; 10]);
        assert!(!verifier.verify(&input, &a, &bad).unwrap());

        let mut bad = z;
        bad.messages.swap(0, 1);
        assert!(!verifier.verify(&input, &a, &bad).unwrap());
    }

    #[test]
    fn zero_threshold_is_a_configuration_error() {
        let mut s = setup(5, 23);
        assert!(matches!(
            OrStatement::new(s.statements.clone(), 0),
            Err(Error::ConfigurationError(_))
        ));
        let input = OrStatement {
            statements: s.statements.clone(),
            threshold: 1,
        };
        let mut prover =
            SigmaOrProver::new(SigmaDlogProver::new(&s.group, &s.config).unwrap()).unwrap();
        assert!(matches!(
            prover.compute_first_msg(&input, &vec![], &mut s.rng),
            Err(Error::ConfigurationError(_))
        ));
        let input = OrStatement {
            statements: s.statements.clone(),
            threshold: 0,
        };
        assert!(matches!(
            prover.compute_first_msg(&input, &vec![], &mut s.rng),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn too_many_statements_for_the_field() {
        let mut s = setup(1, 26);
        let config = ProtocolConfig::new(8);
        let input = OrStatement::new(vec![s.statements[0].clone(); 256], 1).unwrap();
        let witness = vec![(0, s.witnesses[0].clone())];

        let mut prover =
            SigmaOrProver::new(SigmaDlogProver::new(&s.group, &config).unwrap()).unwrap();
        assert!(matches!(
            prover.compute_first_msg(&input, &witness, &mut s.rng),
            Err(Error::ConfigurationError(_))
        ));

        let mut verifier =
            SigmaOrVerifier::new(SigmaDlogVerifier::new(&s.group, &config).unwrap()).unwrap();
        verifier.sample_challenge(&mut s.rng);
        let first = OrFirstMsg { messages: vec![] };
        let second = OrSecondMsg {
            polynomial: vec![],
            challenges: vec![],
            messages: vec![],
        };
        assert!(matches!(
            verifier.verify(&input, &first, &second),
            Err(Error::ConfigurationError(_))
        ));

        let simulator =
            SigmaOrSimulator::new(SigmaDlogSimulator::new(&s.group, &config).unwrap()).unwrap();
        assert!(matches!(
            simulator.simulate(&input, &mut s.rng),
            Err(Error::ConfigurationError(_))
        ));

        // 255 statements use every non-zero point of GF(2^8).
        let input = OrStatement::new(vec![s.statements[0].clone(); 255], 255).unwrap();
        assert!(input.check_in(&Gf2t::new(8).unwrap()).is_ok());
    }

    #[test]
    fn bad_witness_sets_are_rejected() {
        let mut s = setup(3, 24);
        let input = OrStatement::new(s.statements.clone(), 2).unwrap();
        let mut prover =
            SigmaOrProver::new(SigmaDlogProver::new(&s.group, &s.config).unwrap()).unwrap();
        let w = |i: usize| (i, s.witnesses[i].clone());
        let one = vec![w(0)];
        let duplicate = vec![w(1), w(1)];
        let out_of_range = vec![w(0), (7, BigUint::from(1u32))];
        for witness in [one, duplicate, out_of_range] {
            assert!(matches!(
                prover.compute_first_msg(&input, &witness, &mut s.rng),
                Err(Error::InvalidInput(_))
            ));
        }
        let e = Challenge::random(80, &mut s.rng);
        assert!(matches!(
            prover.compute_second_msg(&e),
            Err(Error::IllegalUsage(_))
        ));
    }

    #[test]
    fn simulated_or_proofs_verify() {
        let mut s = setup(4, 25);
        let input = OrStatement::new(s.statements.clone(), 2).unwrap();
        let simulator =
            SigmaOrSimulator::new(SigmaDlogSimulator::new(&s.group, &s.config).unwrap()).unwrap();
        let t = simulator.simulate(&input, &mut s.rng).unwrap();
        assert_eq!(t.second.polynomial.len(), 3);
        let mut verifier =
            SigmaOrVerifier::new(SigmaDlogVerifier::new(&s.group, &s.config).unwrap()).unwrap();
        verifier.set_challenge(t.challenge.clone()).unwrap();
        assert!(verifier.verify(&input, &t.first, &t.second).unwrap());
    }
}
