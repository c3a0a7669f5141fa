// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # binobj - identifier-tagged binary object codec
//!
//! Values are written as a compact little-endian byte stream. Top-level
//! objects carry a 20-byte [`TypeId`] so a reader can find the right type in
//! a [`TypeRegistry`] and rebuild the value without knowing it in advance.
//!
//! ## Quick Start
//!
//! ```rust
//! use binobj::{model, CodecConfig, Node, Range, TypeRegistry};
//!
//! # fn main() -> binobj::Result<()> {
//! let registry = TypeRegistry::new();
//! model::register_model(&registry)?;
//!
//! let tree = Node::new("root", Range::new(0, 100))
//!     .with_child(Node::new("child", Range::new(10, 5)));
//!
//! let bytes = registry.to_bytes(&tree)?;
//! let back: Node = registry.from_bytes_as(&bytes, CodecConfig::default())?;
//! assert_eq!(back, tree);
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! ```text
//! +--------------------------------------------------------------+
//! |  model      Range, Node (recursive tree)                     |
//! +--------------------------------------------------------------+
//! |  registry   TypeId -> TypeDescriptor, top-level dispatch     |
//! +--------------------------------------------------------------+
//! |  codec      Encode / Decode / BinaryClass / BinaryObject     |
//! +--------------------------------------------------------------+
//! |  ser        Encoder / Decoder over std::io streams           |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Features
//!
//! - `config-loaders` (default): [`CodecConfig`] loading from YAML

extern crate self as binobj;

pub mod codec;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod registry;
pub mod ser;

pub use binobj_codegen::Codec;
pub use codec::{from_bytes, from_bytes_with_config, to_bytes};
pub use codec::{BinaryClass, BinaryObject, Decode, Encode};
pub use config::CodecConfig;
pub use error::{Error, Result};
pub use id::TypeId;
pub use model::{Node, Range};
pub use registry::{TypeDescriptor, TypeRegistry};

/// Common imports for types implementing or using the codec.
pub mod prelude {
    pub use crate::{
        BinaryClass, BinaryObject, Codec, CodecConfig, Decode, Encode, Error, Node, Range,
        Result, TypeId, TypeRegistry,
    };
}
