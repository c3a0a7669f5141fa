// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-size type identifiers.
//!
//! A [`TypeId`] is a 20-byte opaque key naming one schema. It is written in
//! front of every top-level object so the decoder can dispatch through the
//! registry without type names on the wire. Identifiers are fixed at type
//! definition time and are never recomputed from decoded content.

use crate::config::TYPE_ID_SIZE;
use crate::error::{Error, Result};
use std::fmt;

/// 20-byte identifier of a registered binary type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId([u8; TYPE_ID_SIZE]);

impl TypeId {
    /// Create from raw 20-byte array
    pub const fn from_bytes(bytes: [u8; TYPE_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw 20-byte array
    pub const fn as_bytes(&self) -> &[u8; TYPE_ID_SIZE] {
        &self.0
    }

    /// Derive an identifier from a schema signature.
    ///
    /// The signature is hashed with SHA-256 and truncated to 20 bytes. Use
    /// this once when defining a type and pin the result in source; two
    /// schemas with different signatures get different identifiers.
    pub fn derive(signature: &str) -> Self {
        use sha2::{Digest, Sha256};

        let digest = Sha256::digest(signature.as_bytes());
        let mut bytes = [0u8; TYPE_ID_SIZE];
        bytes.copy_from_slice(&digest[..TYPE_ID_SIZE]);
        Self(bytes)
    }

    /// Parse a 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != TYPE_ID_SIZE * 2 || !s.is_ascii() {
            return Err(Error::Config(format!(
                "type id must be {} hex digits, got {:?}",
                TYPE_ID_SIZE * 2,
                s
            )));
        }

        let mut bytes = [0u8; TYPE_ID_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| Error::Config(format!("invalid hex digits {:?} in type id", pair)))?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; TYPE_ID_SIZE]> for TypeId {
    fn from(bytes: [u8; TYPE_ID_SIZE]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl std::str::FromStr for TypeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}
