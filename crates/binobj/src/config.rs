// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: compile-time wire constants and default bounds
//! - **Level 2 (Dynamic)**: [`CodecConfig`] decode limits, set in code, from
//!   `BINOBJ_*` environment variables, or from YAML (`config-loaders` feature)
//!
//! Decode limits exist because streams may be untrusted: a corrupt count
//! must fail with `InvalidLength` instead of driving a huge allocation.
//!
//! # Example
//!
//! ```ignore
//! use binobj::config::CodecConfig;
//!
//! let config = CodecConfig::default().with_max_count(4096).with_max_depth(64);
//! ```

use crate::error::{Error, Result};

/// Size in bytes of a [`TypeId`](crate::TypeId) on the wire.
pub const TYPE_ID_SIZE: usize = 20;

/// Default maximum element count accepted for one array field.
///
/// Far beyond any legitimate atom hierarchy while still catching allocation
/// bombs from malformed input.
pub const DEFAULT_MAX_COUNT: u32 = 1_000_000;

/// Default maximum byte length accepted for one string field (16 MiB).
pub const DEFAULT_MAX_STRING_LEN: u32 = 16 * 1024 * 1024;

/// Default maximum nesting depth of a decoded tree.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Environment variable overriding [`CodecConfig::max_count`].
pub const ENV_MAX_COUNT: &str = "BINOBJ_MAX_COUNT";
/// Environment variable overriding [`CodecConfig::max_string_len`].
pub const ENV_MAX_STRING_LEN: &str = "BINOBJ_MAX_STRING_LEN";
/// Environment variable overriding [`CodecConfig::max_depth`].
pub const ENV_MAX_DEPTH: &str = "BINOBJ_MAX_DEPTH";

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(default, deny_unknown_fields))]
pub struct CodecConfig {
    /// Maximum element count of any array field.
    pub max_count: u32,
    /// Maximum byte length of any string field.
    pub max_string_len: u32,
    /// Maximum nesting depth of a recursive tree (root is depth 1).
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    #[must_use]
    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    #[must_use]
    pub fn with_max_string_len(mut self, max_string_len: u32) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Defaults overlaid with any `BINOBJ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment or test map).
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_MAX_COUNT) {
            self.max_count = parse_value(ENV_MAX_COUNT, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_STRING_LEN) {
            self.max_string_len = parse_value(ENV_MAX_STRING_LEN, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_DEPTH) {
            self.max_depth = parse_value(ENV_MAX_DEPTH, &v)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Parse a YAML document such as `max_count: 4096`.
    ///
    /// Missing keys keep their defaults; unknown keys are rejected.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml_content)
            .map_err(|e| Error::Config(format!("failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file (see [`CodecConfig::from_yaml_str`]).
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    /// A depth of zero would reject every tree, including a single leaf.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::Config("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has invalid value {:?}", key, value)))
}
