// -*- mode: rust; -*-
//
// This file is part of `dlog`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

/// Errors produced by `dlog-ot`.
#[derive(Debug)]
pub enum Error {
    /// The protocol was configured with unusable parameters: a group that is
    /// not DDH-hard, an unsupported soundness parameter, or sub-protocols
    /// whose soundness parameters disagree.
    ConfigurationError(String),
    /// The peer deviated from the protocol. The run is abandoned and no
    /// output is produced.
    CheatDetected(String),
    /// The channel failed, or a message of the wrong type arrived.
    TransportError(dlog::Error),
    /// An operation was invoked out of order.
    IllegalUsage(String),
    /// The caller's own input is malformed.
    InvalidInput(String),
    /// No commitment is stored under the given id.
    ResourceNotFound(u64),
}

impl Error {
    /// Whether this error reports a deviation by the peer.
    pub fn is_cheat(&self) -> bool {
        matches!(self, Error::CheatDetected(_))
    }
}

impl From<dlog::Error> for Error {
    fn from(e: dlog::Error) -> Error {
        match e {
            dlog::Error::InvalidEncoding(s) => Error::CheatDetected(s),
            dlog::Error::InvalidGroupParameters(s) | dlog::Error::InvalidFieldParameters(s) => {
                Error::ConfigurationError(s)
            }
            dlog::Error::InvalidInput(s) => Error::InvalidInput(s),
            dlog::Error::ResourceNotFound(id) => Error::ResourceNotFound(id),
            e => Error::TransportError(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::TransportError(dlog::Error::IoError(e))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::TransportError(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ConfigurationError(s) => write!(f, "configuration error: {}", s),
            Error::CheatDetected(s) => write!(f, "cheat detected: {}", s),
            Error::TransportError(e) => write!(f, "transport error: {}", e),
            Error::IllegalUsage(s) => write!(f, "illegal usage: {}", s),
            Error::InvalidInput(s) => write!(f, "invalid input: {}", s),
            Error::ResourceNotFound(id) => write!(f, "no commitment with id {}", id),
        }
    }
}
