// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stream encoder/decoder for the binobj wire format.
//!
//! Everything is little-endian and unaligned:
//!
//! ```text
//! top-level object : [type id: 20 bytes][body]
//! string           : [len: u32][len bytes of UTF-8]
//! array            : [count: u32][element 0]...[element count-1]
//! polymorphic field: [type id: 20 bytes][body]
//! ```
//!
//! Both sides work on a forward-only `std::io` stream. Nothing is buffered
//! or rewound; a failed decode leaves the stream wherever the failure hit.

pub mod decoder;
pub mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;
