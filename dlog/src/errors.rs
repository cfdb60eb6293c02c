// -*- mode: rust; -*-
//
// This file is part of `dlog`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

/// Errors produced by `dlog`.
#[derive(Debug)]
pub enum Error {
    /// An I/O error has occurred.
    IoError(std::io::Error),
    /// A message could not be serialized or deserialized.
    SerializationError(String),
    /// A message with an unexpected tag arrived.
    UnexpectedMessage {
        /// Name of the message type the caller asked for.
        expected: &'static str,
        /// Tag found on the wire.
        tag: u8,
    },
    /// A message announced a body larger than the framing limit.
    MessageTooLarge(usize),
    /// Bytes do not encode a member of the group.
    InvalidEncoding(String),
    /// The group parameters are inconsistent.
    InvalidGroupParameters(String),
    /// The field parameters are unsupported or the modulus is reducible.
    InvalidFieldParameters(String),
    /// The caller supplied malformed input.
    InvalidInput(String),
    /// No commitment is stored under the given id.
    ResourceNotFound(u64),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IoError(e)
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Error {
        Error::SerializationError(e.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::SerializationError(s) => write!(f, "serialization error: {}", s),
            Error::UnexpectedMessage { expected, tag } => write!(
                f,
                "received message should be an instance of {} (got tag {:#04x})",
                expected, tag
            ),
            Error::MessageTooLarge(n) => write!(f, "message of {} bytes exceeds the limit", n),
            Error::InvalidEncoding(s) => write!(f, "invalid group element encoding: {}", s),
            Error::InvalidGroupParameters(s) => write!(f, "invalid group parameters: {}", s),
            Error::InvalidFieldParameters(s) => write!(f, "invalid field parameters: {}", s),
            Error::InvalidInput(s) => write!(f, "invalid input: {}", s),
            Error::ResourceNotFound(id) => write!(f, "no commitment with id {}", id),
        }
    }
}
