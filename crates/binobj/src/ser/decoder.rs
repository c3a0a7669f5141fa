// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read side of the wire format.
//!
//! Every read is exact: if the stream ends before a field is complete the
//! decoder fails with [`Error::TruncatedStream`] carrying the offset reached
//! and the number of bytes still missing. Declared lengths are checked
//! against [`CodecConfig`] before anything is allocated.

use crate::codec::{BinaryObject, Decode};
use crate::config::{CodecConfig, TYPE_ID_SIZE};
use crate::error::{Error, Result};
use crate::id::TypeId;
use crate::registry::TypeRegistry;
use std::io::{self, Read};

/// Generate read methods for primitive types
///
/// Each generated method reads exactly `size_of::<$type>()` bytes and
/// converts them via `from_le_bytes()`.
macro_rules! impl_read_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self) -> Result<$type> {
            let mut bytes = [0u8; std::mem::size_of::<$type>()];
            self.fill(&mut bytes)?;
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Sequential little-endian reader over any `std::io::Read`.
pub struct Decoder<'a> {
    src: &'a mut dyn Read,
    offset: u64,
    config: CodecConfig,
    registry: Option<&'a TypeRegistry>,
    nesting: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(src: &'a mut dyn Read) -> Self {
        Self {
            src,
            offset: 0,
            config: CodecConfig::default(),
            registry: None,
            nesting: 0,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach the registry used to dispatch polymorphic fields.
    #[must_use]
    pub fn with_registry(mut self, registry: &'a TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn registry(&self) -> Option<&'a TypeRegistry> {
        self.registry
    }

    impl_read_le!(read_u8, u8);
    impl_read_le!(read_u16, u16);
    impl_read_le!(read_u32, u32);
    impl_read_le!(read_u64, u64);
    impl_read_le!(read_i8, i8);
    impl_read_le!(read_i16, i16);
    impl_read_le!(read_i32, i32);
    impl_read_le!(read_i64, i64);

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidData {
                offset,
                reason: format!("bool byte {:#04x}", other),
            }),
        }
    }

    /// Read an array element count, bounded by `max_count`.
    pub fn read_count(&mut self) -> Result<usize> {
        let count = self.read_u32()?;
        self.check_len("element count", count, self.config.max_count)
    }

    /// Read a length-prefixed UTF-8 string, bounded by `max_string_len`.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()?;
        let len = self.check_len("string length", len, self.config.max_string_len)?;
        let start = self.offset;
        let bytes = self.read_vec(len)?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { offset: start })
    }

    pub fn read_type_id(&mut self) -> Result<TypeId> {
        Ok(TypeId::from_bytes(self.read_array::<TYPE_ID_SIZE>()?))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.fill(&mut bytes)?;
        Ok(bytes)
    }

    /// Read exactly `len` bytes.
    ///
    /// The buffer grows with the data actually received, so a stream that
    /// advertises more than it holds fails without allocating the full
    /// advertised size up front.
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let got = (&mut *self.src)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(Error::Io)?;
        self.offset += got as u64;
        if got < len {
            return Err(Error::TruncatedStream {
                offset: self.offset,
                needed: len - got,
            });
        }
        Ok(buf)
    }

    /// Read a schema-fixed nested value.
    pub fn value<T: Decode>(&mut self) -> Result<T> {
        T::decode(self)
    }

    /// Read a count-prefixed array of schema-fixed values.
    ///
    /// Nothing is reserved from the declared count; the vector grows only
    /// as elements are actually decoded.
    pub fn array<T: Decode>(&mut self) -> Result<Vec<T>> {
        let count = self.read_count()?;
        let mut items = Vec::new();
        for _ in 0..count {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    /// Read a polymorphic value: type id, registry dispatch, body.
    pub fn object(&mut self) -> Result<Box<dyn BinaryObject>> {
        let registry = self.registry.ok_or(Error::RegistryRequired)?;
        self.nesting += 1;
        let result = if self.nesting > self.config.max_depth {
            Err(Error::DepthExceeded {
                max: self.config.max_depth,
            })
        } else {
            registry.decode_object(self)
        };
        self.nesting -= 1;
        result
    }

    fn check_len(&self, what: &'static str, len: u32, max: u32) -> Result<usize> {
        if len > max {
            log::debug!(
                "[Decoder::check_len] rejecting {} {} at offset {} (max {})",
                what,
                len,
                self.offset,
                max
            );
            return Err(Error::InvalidLength {
                what,
                len: u64::from(len),
                max: u64::from(max),
            });
        }
        usize::try_from(len).map_err(|_| Error::InvalidLength {
            what,
            len: u64::from(len),
            max: usize::MAX as u64,
        })
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut got = 0;
        while got < buf.len() {
            match self.src.read(&mut buf[got..]) {
                Ok(0) => {
                    self.offset += got as u64;
                    return Err(Error::TruncatedStream {
                        offset: self.offset,
                        needed: buf.len() - got,
                    });
                }
                Ok(n) => got += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.offset += got as u64;
                    return Err(Error::Io(e));
                }
            }
        }
        self.offset += got as u64;
        Ok(())
    }
}
