// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in atom-group schema: [`Range`] and the recursive [`Node`] tree.

pub mod node;
pub mod range;

pub use node::{Node, Walk, NODE_SIGNATURE};
pub use range::{Range, RANGE_SIGNATURE};

use crate::error::Result;
use crate::registry::TypeRegistry;

/// Register every built-in model type. Safe to call more than once.
pub fn register_model(registry: &TypeRegistry) -> Result<()> {
    registry.register_class::<Range>()?;
    registry.register_class::<Node>()?;
    Ok(())
}
