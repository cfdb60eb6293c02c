// -*- mode: rust; -*-
//
// This file is part of `dlog`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

#![allow(clippy::many_single_char_names)]

//! Building blocks shared by the discrete-log based two-party protocols:
//! groups in which the discrete logarithm problem is hard, blocking
//! communication channels with tagged message framing, a key derivation
//! function, arithmetic over `GF(2^t)`, and Pedersen trapdoor commitments.

/// Module for encapsulating communication channels.
pub mod channel;
pub mod commitment;
mod errors;
pub mod field;
pub mod group;
pub mod kdf;

pub use crate::{
    channel::{AbstractChannel, Channel, MessageChannel, SyncChannel, TrackChannel, WireMessage},
    errors::Error,
    field::{Gf2t, Gf2tElement, Polynomial},
    group::{DlogGroup, RistrettoGroup, ZpElement, ZpSafePrimeGroup},
    kdf::{HkdfSha256, KeyDerivation},
};

#[cfg(unix)]
pub use crate::channel::{
    track_unix_channel_pair, unix_channel_pair, TrackUnixChannel, UnixChannel,
};
