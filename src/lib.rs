//! # membuff
//!
//! An in-memory, random-access byte buffer that behaves like a small
//! addressable memory region:
//! - Sequential read/write through a cursor, plus absolute-offset access
//! - Optional growth on write, or clipping to the current extent
//! - Range views sharing the parent's storage under an offset and limit
//! - A compression envelope (none / gzip / zlib) for bulk stream I/O
//!
//! Meant for mapping semi-persistent binary data (region files and the like)
//! into memory and synchronizing it, possibly compressed, through a stream.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Constructors                           │
//! │      from_bytes / from_reader / with_size / make / load      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                          Buff                                │
//! │           (store + cursor + growth policy)                   │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ share()                          │ read/write
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   SharedBuff    │                │     Archive     │
//!   │  ─▶ RangedBuff  │───────────────▶│ (gzip / zlib)   │
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod archive;
pub mod buffer;
pub mod range;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BuffError, Result};
pub use config::{Config, ConfigBuilder};
pub use archive::{
    archive_reader, archive_writer, archive_writer_with_level, ArchiveReader, ArchiveWriter,
    Compression,
};
pub use buffer::{Buff, BuffInput};
pub use range::{RangedBuff, SharedBuff};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of membuff
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
