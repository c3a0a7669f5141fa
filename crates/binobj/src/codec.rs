// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoding/decoding contract.
//!
//! - [`Encode`] / [`Decode`]: schema-fixed body of one type, composed
//!   field by field for nested and array-valued fields.
//! - [`BinaryClass`]: a type with a fixed 20-byte [`TypeId`] that can be
//!   registered and dispatched at the top level.
//! - [`BinaryObject`]: object-safe view of any `BinaryClass`, used for
//!   registry-created instances and polymorphic fields.

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::id::TypeId;
use crate::ser::{Decoder, Encoder};
use std::any::Any;
use std::fmt;

/// Serialize the body of a value (no type id).
pub trait Encode {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()>;
}

/// Deserialize the body of a value (no type id).
///
/// A failed decode yields no value at all; implementations must never fall
/// back to a default for a missing field.
pub trait Decode: Sized {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self>;
}

/// A registrable binary type.
///
/// Usually implemented by `#[derive(Codec)]` with `#[codec(id = "...")]`.
pub trait BinaryClass: Encode + Decode + Default + fmt::Debug + Send + Sync + 'static {
    /// Identifier written in front of top-level and polymorphic values.
    const ID: TypeId;
    /// Human-readable schema name for diagnostics.
    const NAME: &'static str;
}

/// Object-safe handle on a [`BinaryClass`] value.
pub trait BinaryObject: Any + fmt::Debug + Send + Sync {
    fn binary_id(&self) -> TypeId;

    fn type_name(&self) -> &'static str;

    fn encode_body(&self, enc: &mut Encoder<'_>) -> Result<()>;

    /// Replace `self` with a value decoded from `dec`.
    ///
    /// On error `self` is left untouched.
    fn decode_body(&mut self, dec: &mut Decoder<'_>) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: BinaryClass> BinaryObject for T {
    fn binary_id(&self) -> TypeId {
        T::ID
    }

    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn encode_body(&self, enc: &mut Encoder<'_>) -> Result<()> {
        self.encode(enc)
    }

    fn decode_body(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        *self = T::decode(dec)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn BinaryObject {
    pub fn is<T: BinaryObject>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: BinaryObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast<T: BinaryObject>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

// ============================================================================
// Primitive impls
// ============================================================================

macro_rules! impl_codec_primitive {
    ($type:ty, $write:ident, $read:ident) => {
        impl Encode for $type {
            fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
                enc.$write(*self)
            }
        }

        impl Decode for $type {
            fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
                dec.$read()
            }
        }
    };
}

impl_codec_primitive!(u8, write_u8, read_u8);
impl_codec_primitive!(u16, write_u16, read_u16);
impl_codec_primitive!(u32, write_u32, read_u32);
impl_codec_primitive!(u64, write_u64, read_u64);
impl_codec_primitive!(i8, write_i8, read_i8);
impl_codec_primitive!(i16, write_i16, read_i16);
impl_codec_primitive!(i32, write_i32, read_i32);
impl_codec_primitive!(i64, write_i64, read_i64);
impl_codec_primitive!(f32, write_f32, read_f32);
impl_codec_primitive!(f64, write_f64, read_f64);
impl_codec_primitive!(bool, write_bool, read_bool);

impl Encode for str {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_string(self)
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_string(self)
    }
}

impl Decode for String {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.read_string()
    }
}

impl Encode for TypeId {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_type_id(self)
    }
}

impl Decode for TypeId {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.read_type_id()
    }
}

/// Fixed-size byte arrays are written raw, with no count.
impl<const N: usize> Encode for [u8; N] {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_raw(self)
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.read_array::<N>()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.array(self)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.array()
    }
}

/// Polymorphic field: type id, then body.
impl Encode for Box<dyn BinaryObject> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.object(self.as_ref())
    }
}

impl Decode for Box<dyn BinaryObject> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.object()
    }
}

// ============================================================================
// In-memory helpers
// ============================================================================

/// Encode a body into a fresh buffer.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    value.encode(&mut enc)?;
    Ok(buf)
}

/// Decode a body from a buffer with default limits.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> Result<T> {
    from_bytes_with_config(bytes, CodecConfig::default())
}

/// Decode a body from a buffer, requiring every byte to be consumed.
pub fn from_bytes_with_config<T: Decode>(bytes: &[u8], config: CodecConfig) -> Result<T> {
    let mut src = bytes;
    let mut dec = Decoder::new(&mut src).with_config(config);
    let value = T::decode(&mut dec)?;
    let consumed = dec.offset();
    if consumed != bytes.len() as u64 {
        return Err(Error::InvalidData {
            offset: consumed,
            reason: format!("{} trailing bytes", bytes.len() as u64 - consumed),
        });
    }
    Ok(value)
}
