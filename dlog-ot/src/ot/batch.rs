//! Many oblivious transfers in one round trip.
//!
//! The receiver sends every tuple in one message and the sender answers all
//! of them in one message. At the semi-honest level every instance is keyed
//! with the same sender exponent `r`, so `g^r` is computed and sent once.
//! The quadruple levels randomize each instance separately. A bad tuple in
//! any instance aborts the whole batch.

use super::{
    knowledge,
    messages::{
        ReceiverPairBatchMsg, ReceiverQuadrupleBatchMsg, SenderPairBatchMsg,
        SenderQuadrupleBatchMsg, SenderQuadrupleMsg,
    },
    single::check_group,
    tuple::{self, ReceiverPair, ReceiverQuadruple, SenderQuadruple},
    Payload, SecurityLevel,
};
use crate::{config::ProtocolConfig, errors::Error};
use dlog::{AbstractChannel, DlogGroup, MessageChannel};
use rand::{CryptoRng, Rng};
use std::marker::PhantomData;

fn check_count(expected: usize, got: usize, what: &str) -> Result<(), Error> {
    if expected != got {
        log::warn!("expected {} {}, peer sent {}", expected, what, got);
        return Err(Error::CheatDetected(format!(
            "expected {} {}, got {}",
            expected, what, got
        )));
    }
    Ok(())
}

/// Batched oblivious transfer sender.
#[derive(Clone, Debug)]
pub struct BatchOtSender<G, S, P> {
    group: G,
    config: ProtocolConfig,
    _marker: PhantomData<(S, P)>,
}

impl<G: DlogGroup, S: SecurityLevel, P: Payload<G>> BatchOtSender<G, S, P> {
    /// Create a sender over `group`; see [`OtSender::new`](super::OtSender::new).
    pub fn new(group: &G, config: ProtocolConfig) -> Result<Self, Error> {
        check_group::<G, S>(group, &config)?;
        Ok(Self {
            group: group.clone(),
            config,
            _marker: PhantomData,
        })
    }

    /// Transfer one value of each pair in `inputs`.
    pub fn transfer<C: AbstractChannel, R: Rng + CryptoRng>(
        &mut self,
        channel: &mut C,
        inputs: &[(P, P)],
        rng: &mut R,
    ) -> Result<(), Error> {
        let group = &self.group;
        for (x0, x1) in inputs.iter() {
            P::validate_pair(x0, x1, group)?;
        }
        if inputs.is_empty() {
            return Ok(());
        }
        if S::QUADRUPLE {
            let msg: ReceiverQuadrupleBatchMsg = channel.receive_message()?;
            check_count(inputs.len(), msg.tuples.len(), "quadruples")?;
            let tuples = msg
                .tuples
                .iter()
                .map(|t| SenderQuadruple::from_message(group, t))
                .collect::<Result<Vec<_>, Error>>()?;
            if S::PROVES_KNOWLEDGE {
                let xs: Vec<_> = tuples.iter().map(|t| t.x.clone()).collect();
                knowledge::verify_exponents(group, &self.config, channel, &xs, rng)?;
            }
            let masks = tuples
                .iter()
                .zip(inputs.iter())
                .map(|(t, (x0, x1))| {
                    let (w0, k0) = t.side(group, false, rng);
                    let (w1, k1) = t.side(group, true, rng);
                    Ok(SenderQuadrupleMsg {
                        w0: group.encode(&w0),
                        c0: x0.mask(group, &k0)?,
                        w1: group.encode(&w1),
                        c1: x1.mask(group, &k1)?,
                    })
                })
                .collect::<Result<Vec<_>, Error>>()?;
            channel.send_message(&SenderQuadrupleBatchMsg { masks })?;
        } else {
            let msg: ReceiverPairBatchMsg = channel.receive_message()?;
            check_count(inputs.len(), msg.tuples.len(), "pairs")?;
            let pairs = msg
                .tuples
                .iter()
                .map(|t| tuple::sender_pair(group, t))
                .collect::<Result<Vec<_>, Error>>()?;
            let r = group.random_scalar(rng);
            let masked = pairs
                .iter()
                .zip(inputs.iter())
                .map(|((h0, h1), (x0, x1))| {
                    Ok((
                        x0.mask(group, &group.exponentiate(h0, &r))?,
                        x1.mask(group, &group.exponentiate(h1, &r))?,
                    ))
                })
                .collect::<Result<Vec<_>, Error>>()?;
            channel.send_message(&SenderPairBatchMsg {
                u: group.encode(&group.exponentiate_generator(&r)),
                masked,
            })?;
        }
        log::debug!(
            "{} batch sender: {} masked pairs sent",
            S::NAME,
            inputs.len()
        );
        Ok(())
    }
}

/// Batched oblivious transfer receiver.
#[derive(Clone, Debug)]
pub struct BatchOtReceiver<G, S, P> {
    group: G,
    config: ProtocolConfig,
    _marker: PhantomData<(S, P)>,
}

impl<G: DlogGroup, S: SecurityLevel, P: Payload<G>> BatchOtReceiver<G, S, P> {
    /// Create a receiver over `group`; see [`OtSender::new`](super::OtSender::new).
    pub fn new(group: &G, config: ProtocolConfig) -> Result<Self, Error> {
        check_group::<G, S>(group, &config)?;
        Ok(Self {
            group: group.clone(),
            config,
            _marker: PhantomData,
        })
    }

    /// Obtain, for every choice bit, the value on the chosen side.
    pub fn transfer<C: AbstractChannel, R: Rng + CryptoRng>(
        &mut self,
        channel: &mut C,
        choices: &[bool],
        rng: &mut R,
    ) -> Result<Vec<P>, Error> {
        let group = &self.group;
        if choices.is_empty() {
            return Ok(Vec::new());
        }
        if S::QUADRUPLE {
            let tuples: Vec<_> = choices
                .iter()
                .map(|&sigma| ReceiverQuadruple::sample(group, sigma, rng))
                .collect();
            channel.send_message(&ReceiverQuadrupleBatchMsg {
                tuples: tuples.iter().map(|t| t.message(group)).collect(),
            })?;
            log::debug!("{} batch receiver: {} quadruples sent", S::NAME, tuples.len());
            if S::PROVES_KNOWLEDGE {
                let xs: Vec<_> = tuples.iter().map(|t| t.x.clone()).collect();
                let alphas: Vec<_> = tuples.iter().map(|t| t.alpha.clone()).collect();
                knowledge::prove_exponents(group, &self.config, channel, &xs, &alphas, rng)?;
            }
            let msg: SenderQuadrupleBatchMsg = channel.receive_message()?;
            check_count(choices.len(), msg.masks.len(), "answers")?;
            let mut keyed = Vec::with_capacity(choices.len());
            for (answer, (tuple, &sigma)) in msg.masks.iter().zip(tuples.iter().zip(choices)) {
                let (w0, w1) = tuple::receiver_quadruple_answer(group, answer)?;
                P::check_masked_pair(&answer.c0, &answer.c1, group)?;
                let (w, c) = if sigma {
                    (w1, &answer.c1)
                } else {
                    (w0, &answer.c0)
                };
                keyed.push((c, tuple.key(group, &w)));
            }
            keyed
                .into_iter()
                .map(|(c, k)| P::unmask(c, group, &k))
                .collect()
        } else {
            let tuples: Vec<_> = choices
                .iter()
                .map(|&sigma| ReceiverPair::sample(group, sigma, rng))
                .collect();
            channel.send_message(&ReceiverPairBatchMsg {
                tuples: tuples.iter().map(|t| t.message(group)).collect(),
            })?;
            log::debug!("{} batch receiver: {} pairs sent", S::NAME, tuples.len());
            let msg: SenderPairBatchMsg = channel.receive_message()?;
            check_count(choices.len(), msg.masked.len(), "answers")?;
            let u = tuple::decode_member(group, &msg.u, "u")?;
            for (c0, c1) in msg.masked.iter() {
                P::check_masked_pair(c0, c1, group)?;
            }
            msg.masked
                .iter()
                .zip(tuples.iter().zip(choices))
                .map(|((c0, c1), (tuple, &sigma))| {
                    let c = if sigma { c1 } else { c0 };
                    P::unmask(c, group, &tuple.key(group, &u))
                })
                .collect()
        }
    }
}
