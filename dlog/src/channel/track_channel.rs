// -*- mode: rust; -*-
//
// This file is part of `dlog`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

use crate::AbstractChannel;
use std::io::Result;

/// A channel for tracking the number of bytes read/written and the number of
/// flushes, which is the number of messages sent by the protocols in this
/// workspace.
pub struct TrackChannel<C> {
    channel: C,
    nbytes_read: usize,
    nbytes_written: usize,
    nflushes: usize,
}

impl<C: AbstractChannel> TrackChannel<C> {
    /// Make a new `TrackChannel` wrapping `channel`.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            nbytes_read: 0,
            nbytes_written: 0,
            nflushes: 0,
        }
    }

    /// Return the number of bytes written to the channel.
    pub fn bytes_written(&self) -> usize {
        self.nbytes_written
    }

    /// Return the number of bytes read from the channel.
    pub fn bytes_read(&self) -> usize {
        self.nbytes_read
    }

    /// Return the number of times the channel was flushed.
    pub fn flushes(&self) -> usize {
        self.nflushes
    }
}

impl<C: AbstractChannel> AbstractChannel for TrackChannel<C> {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.nbytes_written += bytes.len();
        self.channel.write_bytes(bytes)
    }

    #[inline]
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.nbytes_read += bytes.len();
        self.channel.read_bytes(bytes)
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        self.nflushes += 1;
        self.channel.flush()
    }

    #[inline]
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            nbytes_written: self.nbytes_written,
            nbytes_read: self.nbytes_read,
            nflushes: self.nflushes,
        }
    }
}
