//! Messages exchanged by the OT engine.
//!
//! Group elements travel as their encodings; masked payloads travel as the
//! bytes produced by [`Payload::mask`](super::Payload::mask).

use dlog::WireMessage;
use serde::{Deserialize, Serialize};

/// Semi-honest receiver tuple `(h0, h1)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiverPairMsg {
    pub h0: Vec<u8>,
    pub h1: Vec<u8>,
}

/// Receiver tuple `(x, y, z0, z1)` of the malicious-secure levels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverQuadrupleMsg {
    pub x: Vec<u8>,
    pub y: Vec<u8>,
    pub z0: Vec<u8>,
    pub z1: Vec<u8>,
}

/// Semi-honest sender answer: `u = g^r` and the two masked inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderPairMsg {
    pub u: Vec<u8>,
    pub c0: Vec<u8>,
    pub c1: Vec<u8>,
}

/// Sender answer of the malicious-secure levels: `(w0, c0, w1, c1)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderQuadrupleMsg {
    pub w0: Vec<u8>,
    pub c0: Vec<u8>,
    pub w1: Vec<u8>,
    pub c1: Vec<u8>,
}

/// All semi-honest receiver tuples of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverPairBatchMsg {
    pub tuples: Vec<ReceiverPairMsg>,
}

/// All quadruples of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverQuadrupleBatchMsg {
    pub tuples: Vec<ReceiverQuadrupleMsg>,
}

/// Semi-honest batch answer: one shared `u` and a masked pair per instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderPairBatchMsg {
    pub u: Vec<u8>,
    pub masked: Vec<(Vec<u8>, Vec<u8>)>,
}

/// Batch answer of the malicious-secure levels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderQuadrupleBatchMsg {
    pub masks: Vec<SenderQuadrupleMsg>,
}

macro_rules! wire_message {
    ($($ty:ident = $tag:literal),* $(,)?) => {
        $(
            impl WireMessage for $ty {
                const TAG: u8 = $tag;
                const NAME: &'static str = stringify!($ty);
            }
        )*
    };
}

wire_message! {
    ReceiverPairMsg = 0x30,
    ReceiverQuadrupleMsg = 0x31,
    SenderPairMsg = 0x32,
    SenderQuadrupleMsg = 0x33,
    ReceiverPairBatchMsg = 0x34,
    ReceiverQuadrupleBatchMsg = 0x35,
    SenderPairBatchMsg = 0x36,
    SenderQuadrupleBatchMsg = 0x37,
}
