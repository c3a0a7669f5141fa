// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Heap usage while decoding streams that declare far more than they hold.
//!
//! The counting allocator is process-wide, so every test in this binary
//! takes `SERIAL` before measuring.

use binobj::{model, BinaryClass, CodecConfig, Error, Node, TypeRegistry};
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

struct CountingAlloc;

static CURRENT: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);
static SERIAL: Mutex<()> = Mutex::new(());

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let now = CURRENT.fetch_add(layout.size(), Ordering::SeqCst) + layout.size();
            PEAK.fetch_max(now, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        CURRENT.fetch_sub(layout.size(), Ordering::SeqCst);
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

/// Peak heap growth (bytes) while `f` runs.
fn peak_during<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let base = CURRENT.load(Ordering::SeqCst);
    PEAK.store(base, Ordering::SeqCst);
    let out = f();
    (out, PEAK.load(Ordering::SeqCst).saturating_sub(base))
}

const BUDGET: usize = 1024 * 1024;

#[test]
fn test_nested_child_counts_do_not_reserve() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let registry = TypeRegistry::new();
    model::register_model(&registry).expect("register model");
    let config = CodecConfig::default();

    // Every header: empty name, zero range, max_count children, then the
    // stream ends one level short of max_depth.
    let mut bytes = Node::ID.as_bytes().to_vec();
    for _ in 0..config.max_depth - 1 {
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 8]);
        bytes.extend_from_slice(&config.max_count.to_le_bytes());
    }

    let (result, peak) =
        peak_during(|| registry.from_bytes_as::<Node>(&bytes, config).map(|_| ()));
    assert!(matches!(result, Err(Error::TruncatedStream { .. })));
    assert!(
        peak < BUDGET,
        "decoding {} input bytes peaked at {} heap bytes",
        bytes.len(),
        peak
    );
}

#[test]
fn test_nested_array_counts_do_not_reserve() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let config = CodecConfig::default();

    // Vec<Vec<Vec<u64>>>: outer and middle arrays each claim max_count
    // elements, the innermost claims max_count and holds one.
    let mut bytes = Vec::new();
    for _ in 0..3 {
        bytes.extend_from_slice(&config.max_count.to_le_bytes());
    }
    bytes.extend_from_slice(&7u64.to_le_bytes());

    let (result, peak) = peak_during(|| {
        binobj::from_bytes_with_config::<Vec<Vec<Vec<u64>>>>(&bytes, config).map(|_| ())
    });
    assert!(matches!(result, Err(Error::TruncatedStream { .. })));
    // Only the one element present is ever stored.
    assert!(peak < 64 * 1024, "peaked at {} heap bytes", peak);
}
