// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Write side of the wire format.

use crate::codec::{BinaryObject, Encode};
use crate::error::{Error, Result};
use crate::id::TypeId;
use std::io::Write;

/// Generate write methods for primitive types
///
/// Each generated method converts the value to little-endian bytes via
/// `to_le_bytes()` and appends them to the stream.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> Result<()> {
            self.write_raw(&value.to_le_bytes())
        }
    };
}

/// Sequential little-endian writer over any `std::io::Write`.
pub struct Encoder<'a> {
    out: &'a mut dyn Write,
    offset: u64,
}

impl<'a> Encoder<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out, offset: 0 }
    }

    /// Bytes written so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    impl_write_le!(write_u8, u8);
    impl_write_le!(write_u16, u16);
    impl_write_le!(write_u32, u32);
    impl_write_le!(write_u64, u64);
    impl_write_le!(write_i8, i8);
    impl_write_le!(write_i16, i16);
    impl_write_le!(write_i32, i32);
    impl_write_le!(write_i64, i64);

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_u64(value.to_bits())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Write an array element count.
    pub fn write_count(&mut self, len: usize) -> Result<()> {
        let count = u32::try_from(len).map_err(|_| Error::InvalidLength {
            what: "element count",
            len: len as u64,
            max: u64::from(u32::MAX),
        })?;
        self.write_u32(count)
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let len = u32::try_from(value.len()).map_err(|_| Error::InvalidLength {
            what: "string length",
            len: value.len() as u64,
            max: u64::from(u32::MAX),
        })?;
        self.write_u32(len)?;
        self.write_raw(value.as_bytes())
    }

    pub fn write_type_id(&mut self, id: &TypeId) -> Result<()> {
        self.write_raw(id.as_bytes())
    }

    /// Write bytes with no prefix.
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.out.write_all(data)?;
        self.offset += data.len() as u64;
        Ok(())
    }

    /// Write a schema-fixed nested value (no type id).
    pub fn value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }

    /// Write a polymorphic value: its type id, then its body.
    pub fn object(&mut self, obj: &dyn BinaryObject) -> Result<()> {
        self.write_type_id(&obj.binary_id())?;
        obj.encode_body(self)
    }

    /// Write a count-prefixed array of schema-fixed values.
    pub fn array<T: Encode>(&mut self, items: &[T]) -> Result<()> {
        self.write_count(items.len())?;
        for item in items {
            item.encode(self)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
