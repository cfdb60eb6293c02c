//! Oblivious transfer under the Decisional Diffie-Hellman assumption.
//!
//! A sender holds two values `x0, x1`; a receiver holding a choice bit `σ`
//! learns `x_σ` and nothing about `x_{1-σ}`, while the sender learns nothing
//! about `σ`. One engine covers every variant. It is parameterized by:
//!
//! * a [`SecurityLevel`]: [`SemiHonest`], [`PrivacyOnly`] or
//!   [`OneSidedSimulation`] (the receiver additionally proves knowledge of
//!   its exponent in zero knowledge);
//! * a [`Payload`]: byte strings (`Vec<u8>`, masked with a key-derived pad)
//!   or group elements ([`ElementPayload`], masked by multiplication).
//!
//! [`OtSender`] / [`OtReceiver`] run one transfer per call;
//! [`BatchOtSender`] / [`BatchOtReceiver`] run many in a single round trip.
//! Both implement the slice-based [`Sender`] and [`Receiver`] traits.

mod batch;
mod knowledge;
pub mod messages;
mod payload;
mod security;
mod single;
mod tuple;

pub use self::{
    batch::{BatchOtReceiver, BatchOtSender},
    payload::{ElementPayload, Payload},
    security::{OneSidedSimulation, PrivacyOnly, SecurityLevel, SemiHonest},
    single::{OtReceiver, OtSender},
};

use crate::errors::Error;
use dlog::{AbstractChannel, DlogGroup};
use rand::{CryptoRng, Rng};

/// Semi-honest OT sender.
pub type SemiHonestSender<G, P> = OtSender<G, SemiHonest, P>;
/// Semi-honest OT receiver.
pub type SemiHonestReceiver<G, P> = OtReceiver<G, SemiHonest, P>;
/// Privacy-only OT sender.
pub type PrivacyOnlySender<G, P> = OtSender<G, PrivacyOnly, P>;
/// Privacy-only OT receiver.
pub type PrivacyOnlyReceiver<G, P> = OtReceiver<G, PrivacyOnly, P>;
/// One-sided simulation OT sender.
pub type OneSidedSimulationSender<G, P> = OtSender<G, OneSidedSimulation, P>;
/// One-sided simulation OT receiver.
pub type OneSidedSimulationReceiver<G, P> = OtReceiver<G, OneSidedSimulation, P>;

/// Trait for one-out-of-two oblivious transfer from the sender's
/// point-of-view.
pub trait Sender
where
    Self: Sized,
{
    /// Group the transfer runs in.
    type Group: DlogGroup;
    /// Message type.
    type Msg: Payload<Self::Group>;
    /// Sends one of each pair of messages.
    fn send<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[(Self::Msg, Self::Msg)],
        rng: &mut RNG,
    ) -> Result<(), Error>;
}

/// Trait for one-out-of-two oblivious transfer from the receiver's
/// point-of-view.
pub trait Receiver
where
    Self: Sized,
{
    /// Group the transfer runs in.
    type Group: DlogGroup;
    /// Message type.
    type Msg: Payload<Self::Group>;
    /// Receives the message selected by each choice bit.
    fn receive<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[bool],
        rng: &mut RNG,
    ) -> Result<Vec<Self::Msg>, Error>;
}

impl<G: DlogGroup, S: SecurityLevel, P: Payload<G>> Sender for OtSender<G, S, P> {
    type Group = G;
    type Msg = P;

    fn send<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[(P, P)],
        rng: &mut RNG,
    ) -> Result<(), Error> {
        for (x0, x1) in inputs.iter() {
            self.transfer(channel, x0, x1, rng)?;
        }
        Ok(())
    }
}

impl<G: DlogGroup, S: SecurityLevel, P: Payload<G>> Receiver for OtReceiver<G, S, P> {
    type Group = G;
    type Msg = P;

    fn receive<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[bool],
        rng: &mut RNG,
    ) -> Result<Vec<P>, Error> {
        inputs
            .iter()
            .map(|&b| self.transfer(channel, b, rng))
            .collect()
    }
}

impl<G: DlogGroup, S: SecurityLevel, P: Payload<G>> Sender for BatchOtSender<G, S, P> {
    type Group = G;
    type Msg = P;

    fn send<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[(P, P)],
        rng: &mut RNG,
    ) -> Result<(), Error> {
        self.transfer(channel, inputs, rng)
    }
}

impl<G: DlogGroup, S: SecurityLevel, P: Payload<G>> Receiver for BatchOtReceiver<G, S, P> {
    type Group = G;
    type Msg = P;

    fn receive<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[bool],
        rng: &mut RNG,
    ) -> Result<Vec<P>, Error> {
        self.transfer(channel, inputs, rng)
    }
}
