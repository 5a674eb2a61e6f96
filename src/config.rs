//! Configuration for membuff
//!
//! Centralized configuration with sensible defaults.

use crate::archive::{Compression, DEFAULT_LEVEL};

/// Settings used when loading or storing a buffer through the compression envelope
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Compression Configuration
    // -------------------------------------------------------------------------
    /// Transform applied by `Buff::load` / `Buff::store`
    pub compression: Compression,

    /// Encoder level (0-9), ignored for `Compression::None`
    pub compression_level: u32,

    // -------------------------------------------------------------------------
    // Allocation Configuration
    // -------------------------------------------------------------------------
    /// Capacity reserved up front for new buffers (in bytes)
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            compression_level: DEFAULT_LEVEL,
            initial_capacity: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the compression kind
    pub fn compression(mut self, kind: Compression) -> Self {
        self.config.compression = kind;
        self
    }

    /// Set the compression level (clamped to 9 by the encoder)
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level;
        self
    }

    /// Set the capacity reserved for new buffers (in bytes)
    pub fn initial_capacity(mut self, bytes: usize) -> Self {
        self.config.initial_capacity = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
