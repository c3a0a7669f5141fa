// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for registry and codec operations.
//!
//! All errors are structural: nothing is retried internally and no field is
//! ever silently replaced by a default. Callers decide whether to re-fetch the
//! source bytes and try again.

use crate::id::TypeId;
use std::fmt;
use std::io;

/// Errors returned by binobj operations.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// Identifier was never registered.
    UnknownType(TypeId),
    /// Identifier already bound to a different descriptor.
    DuplicateType {
        id: TypeId,
        existing: &'static str,
        attempted: &'static str,
    },
    /// Stream carried a registered type other than the one requested.
    TypeMismatch {
        id: TypeId,
        expected: &'static str,
        found: &'static str,
    },
    /// A polymorphic field was decoded without a registry attached.
    RegistryRequired,

    // ========================================================================
    // Stream Errors
    // ========================================================================
    /// Stream ended before a declared field or element was fully read.
    TruncatedStream { offset: u64, needed: usize },
    /// Declared length or element count is outside the configured bound.
    InvalidLength {
        what: &'static str,
        len: u64,
        max: u64,
    },
    /// String field bytes are not valid UTF-8.
    InvalidUtf8 { offset: u64 },
    /// Field value is not a legal encoding for its type.
    InvalidData { offset: u64, reason: String },
    /// Tree nesting exceeded the configured maximum depth.
    DepthExceeded { max: usize },
    /// Underlying stream failure other than end-of-stream.
    Io(io::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration could not be parsed or holds an invalid value.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownType(id) => write!(f, "unknown type id {}", id),
            Error::DuplicateType {
                id,
                existing,
                attempted,
            } => write!(
                f,
                "type id {} already registered to {} (attempted {})",
                id, existing, attempted
            ),
            Error::TypeMismatch {
                id,
                expected,
                found,
            } => write!(
                f,
                "type id {} decodes to {}, expected {}",
                id, found, expected
            ),
            Error::RegistryRequired => {
                write!(f, "polymorphic field requires a type registry")
            }
            Error::TruncatedStream { offset, needed } => write!(
                f,
                "stream truncated at offset {} ({} more bytes needed)",
                offset, needed
            ),
            Error::InvalidLength { what, len, max } => {
                write!(f, "invalid {} {} (max {})", what, len, max)
            }
            Error::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 in string at offset {}", offset)
            }
            Error::InvalidData { offset, reason } => {
                write!(f, "invalid data at offset {}: {}", offset, reason)
            }
            Error::DepthExceeded { max } => write!(f, "tree depth exceeds {}", max),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Convenient alias for results using the crate `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
