// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: 20-byte identifier -> type descriptor.
//!
//! The registry is an explicit value handed to codec calls rather than
//! process-global state, so tests and independent subsystems can each own
//! one. Registrations are expected during startup; lookups afterwards are
//! read-only and safe from many threads decoding separate streams.
//!
//! ```text
//! stream: [type id][body]
//!            |
//!            v
//!   TypeRegistry::lookup ----> TypeDescriptor::create() -> empty instance
//!                                        |
//!                                        v
//!                              BinaryObject::decode_body
//! ```

use crate::codec::{BinaryClass, BinaryObject};
use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::id::TypeId;
use crate::ser::{Decoder, Encoder};
use parking_lot::RwLock;
use std::any::TypeId as RustTypeId;
use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

/// Factory and codec entry points for one registered type.
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    rust_type: RustTypeId,
    create: fn() -> Box<dyn BinaryObject>,
}

fn create_default<T: BinaryClass>() -> Box<dyn BinaryObject> {
    Box::new(T::default())
}

impl TypeDescriptor {
    /// Descriptor for a [`BinaryClass`] type.
    pub fn of<T: BinaryClass>() -> Self {
        Self {
            id: T::ID,
            name: T::NAME,
            rust_type: RustTypeId::of::<T>(),
            create: create_default::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Construct a default (empty) instance.
    pub fn create(&self) -> Box<dyn BinaryObject> {
        (self.create)()
    }

    /// Encode the body of `obj`, which must be an instance of this type.
    pub fn encode(&self, enc: &mut Encoder<'_>, obj: &dyn BinaryObject) -> Result<()> {
        self.check_instance(obj)?;
        obj.encode_body(enc)
    }

    fn check_instance(&self, obj: &dyn BinaryObject) -> Result<()> {
        if obj.as_any().type_id() != self.rust_type {
            return Err(Error::TypeMismatch {
                id: self.id,
                expected: self.name,
                found: obj.type_name(),
            });
        }
        Ok(())
    }

    /// Create an empty instance and decode its body from `dec`.
    pub fn decode(&self, dec: &mut Decoder<'_>) -> Result<Box<dyn BinaryObject>> {
        let mut obj = self.create();
        obj.decode_body(dec)?;
        Ok(obj)
    }

    /// Same identifier bound to the same concrete type.
    pub fn same_as(&self, other: &TypeDescriptor) -> bool {
        self.id == other.id && self.rust_type == other.rust_type
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// Concurrent map from [`TypeId`] to [`TypeDescriptor`].
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its identifier.
    ///
    /// Registering the identical descriptor again is a no-op. Binding an
    /// identifier that is already taken by another type fails with
    /// [`Error::DuplicateType`].
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<()> {
        let mut types = self.types.write();
        if let Some(existing) = types.get(&descriptor.id) {
            if existing.same_as(&descriptor) {
                log::debug!(
                    "[TypeRegistry::register] {} already registered as {}",
                    descriptor.id,
                    descriptor.name
                );
                return Ok(());
            }
            log::warn!(
                "[TypeRegistry::register] id {} conflict: {} vs {}",
                descriptor.id,
                existing.name,
                descriptor.name
            );
            return Err(Error::DuplicateType {
                id: descriptor.id,
                existing: existing.name,
                attempted: descriptor.name,
            });
        }

        log::debug!(
            "[TypeRegistry::register] {} -> {}",
            descriptor.id,
            descriptor.name
        );
        types.insert(descriptor.id, Arc::new(descriptor));
        Ok(())
    }

    pub fn register_class<T: BinaryClass>(&self) -> Result<()> {
        self.register(TypeDescriptor::of::<T>())
    }

    pub fn lookup(&self, id: &TypeId) -> Result<Arc<TypeDescriptor>> {
        self.types
            .read()
            .get(id)
            .map(Arc::clone)
            .ok_or(Error::UnknownType(*id))
    }

    pub fn contains(&self, id: &TypeId) -> bool {
        self.types.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// All registered identifiers (sorted for determinism).
    pub fn ids(&self) -> Vec<TypeId> {
        let mut ids: Vec<TypeId> = self.types.read().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Write a top-level object: identifier, then body.
    ///
    /// The object's type must be registered here, so that anything this
    /// registry encodes it can also decode.
    pub fn encode_object(&self, enc: &mut Encoder<'_>, obj: &dyn BinaryObject) -> Result<()> {
        let descriptor = self.lookup(&obj.binary_id())?;
        // Reject a foreign instance before the id reaches the stream.
        descriptor.check_instance(obj)?;
        enc.write_type_id(&descriptor.id)?;
        descriptor.encode(enc, obj)
    }

    /// Read a top-level object: identifier, registry dispatch, body.
    ///
    /// Polymorphic fields inside the body need `dec` to carry a registry
    /// (see [`Decoder::with_registry`]).
    pub fn decode_object(&self, dec: &mut Decoder<'_>) -> Result<Box<dyn BinaryObject>> {
        let offset = dec.offset();
        let id = dec.read_type_id()?;
        let descriptor = self.lookup(&id).map_err(|e| {
            log::debug!(
                "[TypeRegistry::decode_object] unknown id {} at offset {}",
                id,
                offset
            );
            e
        })?;
        log::trace!(
            "[TypeRegistry::decode_object] {} at offset {}",
            descriptor.name,
            offset
        );
        descriptor.decode(dec)
    }

    /// Read a top-level object that must be of type `T`.
    pub fn decode_as<T: BinaryClass>(&self, dec: &mut Decoder<'_>) -> Result<T> {
        let obj = self.decode_object(dec)?;
        let id = obj.binary_id();
        let found = obj.type_name();
        obj.downcast::<T>()
            .map(|boxed| *boxed)
            .ok_or(Error::TypeMismatch {
                id,
                expected: T::NAME,
                found,
            })
    }

    /// Write a top-level object to a stream.
    pub fn write_object(&self, out: &mut dyn Write, obj: &dyn BinaryObject) -> Result<()> {
        let mut enc = Encoder::new(out);
        self.encode_object(&mut enc, obj)?;
        enc.flush()
    }

    /// Read a top-level object from a stream, with this registry attached
    /// for polymorphic fields.
    pub fn read_object(
        &self,
        src: &mut dyn Read,
        config: CodecConfig,
    ) -> Result<Box<dyn BinaryObject>> {
        let mut dec = Decoder::new(src).with_config(config).with_registry(self);
        self.decode_object(&mut dec)
    }

    /// Encode a top-level object into a fresh buffer.
    pub fn to_bytes(&self, obj: &dyn BinaryObject) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Decode a top-level `T` from a buffer, requiring every byte to be
    /// consumed.
    pub fn from_bytes_as<T: BinaryClass>(&self, bytes: &[u8], config: CodecConfig) -> Result<T> {
        let mut src = bytes;
        let mut dec = Decoder::new(&mut src)
            .with_config(config)
            .with_registry(self);
        let value = self.decode_as::<T>(&mut dec)?;
        let consumed = dec.offset();
        if consumed != bytes.len() as u64 {
            return Err(Error::InvalidData {
                offset: consumed,
                reason: format!("{} trailing bytes", bytes.len() as u64 - consumed),
            });
        }
        Ok(value)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}
