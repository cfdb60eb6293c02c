//! One oblivious transfer per call.

use super::{
    knowledge,
    messages::{ReceiverPairMsg, ReceiverQuadrupleMsg, SenderPairMsg, SenderQuadrupleMsg},
    tuple::{self, ReceiverPair, ReceiverQuadruple, SenderQuadruple},
    Payload, SecurityLevel,
};
use crate::{config::ProtocolConfig, errors::Error};
use dlog::{AbstractChannel, DlogGroup, MessageChannel};
use rand::{CryptoRng, Rng};
use std::marker::PhantomData;

pub(super) fn check_group<G: DlogGroup, S: SecurityLevel>(
    group: &G,
    config: &ProtocolConfig,
) -> Result<(), Error> {
    config.require_ddh_hard(group)?;
    if S::PROVES_KNOWLEDGE {
        config.challenge_field(group)?;
    }
    Ok(())
}

/// Oblivious transfer sender holding two inputs of type `P`.
#[derive(Clone, Debug)]
pub struct OtSender<G, S, P> {
    group: G,
    config: ProtocolConfig,
    _marker: PhantomData<(S, P)>,
}

impl<G: DlogGroup, S: SecurityLevel, P: Payload<G>> OtSender<G, S, P> {
    /// Create a sender over `group`. Fails unless `group` is DDH-hard and, at
    /// the one-sided simulation level, supports the soundness parameter.
    pub fn new(group: &G, config: ProtocolConfig) -> Result<Self, Error> {
        check_group::<G, S>(group, &config)?;
        Ok(Self {
            group: group.clone(),
            config,
            _marker: PhantomData,
        })
    }

    /// The group this sender works in.
    pub fn group(&self) -> &G {
        &self.group
    }

    /// Transfer `x0` or `x1`, as chosen by the receiver.
    ///
    /// The inputs are checked before anything is read from or written to
    /// `channel`.
    pub fn transfer<C: AbstractChannel, R: Rng + CryptoRng>(
        &mut self,
        channel: &mut C,
        x0: &P,
        x1: &P,
        rng: &mut R,
    ) -> Result<(), Error> {
        let group = &self.group;
        P::validate_pair(x0, x1, group)?;
        if S::QUADRUPLE {
            let msg: ReceiverQuadrupleMsg = channel.receive_message()?;
            let tuple = SenderQuadruple::from_message(group, &msg)?;
            if S::PROVES_KNOWLEDGE {
                knowledge::verify_exponents(
                    group,
                    &self.config,
                    channel,
                    std::slice::from_ref(&tuple.x),
                    rng,
                )?;
            }
            let (w0, k0) = tuple.side(group, false, rng);
            let (w1, k1) = tuple.side(group, true, rng);
            channel.send_message(&SenderQuadrupleMsg {
                w0: group.encode(&w0),
                c0: x0.mask(group, &k0)?,
                w1: group.encode(&w1),
                c1: x1.mask(group, &k1)?,
            })?;
        } else {
            let msg: ReceiverPairMsg = channel.receive_message()?;
            let (h0, h1) = tuple::sender_pair(group, &msg)?;
            let r = group.random_scalar(rng);
            channel.send_message(&SenderPairMsg {
                u: group.encode(&group.exponentiate_generator(&r)),
                c0: x0.mask(group, &group.exponentiate(&h0, &r))?,
                c1: x1.mask(group, &group.exponentiate(&h1, &r))?,
            })?;
        }
        log::debug!("{} sender: masked inputs sent", S::NAME);
        Ok(())
    }
}

/// Oblivious transfer receiver obtaining one value of type `P`.
#[derive(Clone, Debug)]
pub struct OtReceiver<G, S, P> {
    group: G,
    config: ProtocolConfig,
    _marker: PhantomData<(S, P)>,
}

impl<G: DlogGroup, S: SecurityLevel, P: Payload<G>> OtReceiver<G, S, P> {
    /// Create a receiver over `group`, under the same conditions as
    /// [`OtSender::new`].
    pub fn new(group: &G, config: ProtocolConfig) -> Result<Self, Error> {
        check_group::<G, S>(group, &config)?;
        Ok(Self {
            group: group.clone(),
            config,
            _marker: PhantomData,
        })
    }

    /// The group this receiver works in.
    pub fn group(&self) -> &G {
        &self.group
    }

    /// Obtain `x1` if `sigma` is set and `x0` otherwise.
    pub fn transfer<C: AbstractChannel, R: Rng + CryptoRng>(
        &mut self,
        channel: &mut C,
        sigma: bool,
        rng: &mut R,
    ) -> Result<P, Error> {
        let group = &self.group;
        let out = if S::QUADRUPLE {
            let tuple = ReceiverQuadruple::sample(group, sigma, rng);
            channel.send_message(&tuple.message(group))?;
            log::debug!("{} receiver: quadruple sent", S::NAME);
            if S::PROVES_KNOWLEDGE {
                knowledge::prove_exponents(
                    group,
                    &self.config,
                    channel,
                    std::slice::from_ref(&tuple.x),
                    std::slice::from_ref(&tuple.alpha),
                    rng,
                )?;
            }
            let msg: SenderQuadrupleMsg = channel.receive_message()?;
            let (w0, w1) = tuple::receiver_quadruple_answer(group, &msg)?;
            P::check_masked_pair(&msg.c0, &msg.c1, group)?;
            let (w, c) = if sigma { (w1, &msg.c1) } else { (w0, &msg.c0) };
            P::unmask(c, group, &tuple.key(group, &w))?
        } else {
            let tuple = ReceiverPair::sample(group, sigma, rng);
            channel.send_message(&tuple.message(group))?;
            log::debug!("{} receiver: pair sent", S::NAME);
            let msg: SenderPairMsg = channel.receive_message()?;
            let u = tuple::decode_member(group, &msg.u, "u")?;
            P::check_masked_pair(&msg.c0, &msg.c1, group)?;
            let c = if sigma { &msg.c1 } else { &msg.c0 };
            P::unmask(c, group, &tuple.key(group, &u))?
        };
        Ok(out)
    }
}
