// -*- mode: rust; -*-
//
// This file is part of `dlog`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

#![allow(clippy::many_single_char_names)]
#![allow(clippy::type_complexity)]

//! Oblivious transfer under the Decisional Diffie-Hellman assumption, and the
//! Sigma-protocol machinery its strongest variant uses to prove knowledge of
//! a discrete logarithm.
//!
//! The `ot` module provides one generic engine for every combination of
//! security level (semi-honest, privacy-only, one-sided simulation) and
//! payload (byte strings or group elements), in single and batched form.
//! The `sigma` module provides the three-move protocols, their AND and
//! k-of-n OR compositions, and a zero-knowledge proof-of-knowledge wrapper
//! built on Pedersen commitments.

mod config;
mod errors;
pub mod ot;
pub mod sigma;

pub use crate::{config::ProtocolConfig, errors::Error};
