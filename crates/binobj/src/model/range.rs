// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Contiguous index span.

use crate::Codec;

/// Span of `count` indices starting at `start`.
///
/// Wire layout is two `u32` LE values: `[start][count]`.
#[derive(Codec, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[codec(id = "cd8365c348cdccaa983000544d138f121b82c73d", name = "atom.Range")]
pub struct Range {
    pub start: u32,
    pub count: u32,
}

/// Schema signature the [`Range`] identifier was derived from.
pub const RANGE_SIGNATURE: &str = "atom.Range{start:u32,count:u32}";

impl Range {
    pub const fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    /// One past the last index, widened so it cannot overflow.
    pub const fn end(&self) -> u64 {
        self.start as u64 + self.count as u64
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, index: u64) -> bool {
        index >= u64::from(self.start) && index < self.end()
    }

    /// True when both spans share at least one index.
    pub fn overlaps(&self, other: &Range) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && u64::from(self.start) < other.end()
            && u64::from(other.start) < self.end()
    }
}
