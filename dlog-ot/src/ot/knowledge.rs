//! Proof that the receiver knows `log_g x` for every quadruple it sent.
//!
//! One exponent is proven with the plain discrete-log proof; a batch proves
//! all of them under a single challenge with the AND composition.

use crate::{
    config::ProtocolConfig,
    errors::Error,
    sigma::{
        DlogStatement, SigmaAndProver, SigmaAndVerifier, SigmaDlogProver, SigmaDlogVerifier,
        ZkPokProver, ZkPokVerifier,
    },
};
use dlog::{AbstractChannel, DlogGroup};
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};

fn statements<E: Clone>(xs: &[E]) -> Vec<DlogStatement<E>> {
    xs.iter().map(|x| DlogStatement { h: x.clone() }).collect()
}

pub(crate) fn prove_exponents<G, C, R>(
    group: &G,
    config: &ProtocolConfig,
    channel: &mut C,
    xs: &[G::Element],
    alphas: &[BigUint],
    rng: &mut R,
) -> Result<(), Error>
where
    G: DlogGroup,
    C: AbstractChannel,
    R: Rng + CryptoRng,
{
    let statements = statements(xs);
    if let ([statement], [alpha]) = (statements.as_slice(), alphas) {
        let prover = SigmaDlogProver::new(group, config)?;
        ZkPokProver::new(group, prover).prove(channel, statement, alpha, rng)
    } else {
        let provers = statements
            .iter()
            .map(|_| SigmaDlogProver::new(group, config))
            .collect::<Result<Vec<_>, Error>>()?;
        ZkPokProver::new(group, SigmaAndProver::new(provers)?).prove(
            channel,
            &statements,
            &alphas.to_vec(),
            rng,
        )
    }
}

pub(crate) fn verify_exponents<G, C, R>(
    group: &G,
    config: &ProtocolConfig,
    channel: &mut C,
    xs: &[G::Element],
    rng: &mut R,
) -> Result<(), Error>
where
    G: DlogGroup,
    C: AbstractChannel,
    R: Rng + CryptoRng,
{
    let statements = statements(xs);
    let accepted = if let [statement] = statements.as_slice() {
        let verifier = SigmaDlogVerifier::new(group, config)?;
        ZkPokVerifier::new(group, verifier).verify(channel, statement, rng)?
    } else {
        let verifiers = statements
            .iter()
            .map(|_| SigmaDlogVerifier::new(group, config))
            .collect::<Result<Vec<_>, Error>>()?;
        ZkPokVerifier::new(group, SigmaAndVerifier::new(verifiers)?).verify(
            channel,
            &statements,
            rng,
        )?
    };
    if !accepted {
        log::warn!("receiver failed to prove knowledge of its exponents");
        return Err(Error::CheatDetected(
            "proof of knowledge rejected".to_string(),
        ));
    }
    Ok(())
}
