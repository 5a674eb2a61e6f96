//! Buffer Module
//!
//! The byte store, its cursor, and its growth policy.
//!
//! ## Responsibilities
//! - Sequential read/write through a cursor (`std::io::Read` / `Write`)
//! - Absolute read/write that never touches the cursor
//! - Growth on write when append mode is on, clipping when it is off
//! - Draining a stream into the store and emitting the store to a stream
//!
//! ## Addressing Model
//! ```text
//!            pointer (may sit past the end)
//!               │
//!               ▼
//! ┌───┬───┬───┬───┬───┬───┐
//! │ 0 │ 1 │ 2 │ 3 │ 4 │ 5 │   len = 6
//! └───┴───┴───┴───┴───┴───┘
//!   write_at(buf, 4) with len(buf) = 4:
//!     append on  → store grows to 8, new bytes zeroed, all 4 written
//!     append off → 2 bytes written, len stays 6
//! ```

use std::fmt;
use std::io::{self, Read, Write};

use bytes::Bytes;

use crate::archive::{archive_reader, archive_writer_with_level, Compression, DEFAULT_LEVEL};
use crate::config::Config;
use crate::error::{BuffError, Result};
use crate::range::SharedBuff;

/// A versatile in-memory byte buffer addressed like a small memory region
#[derive(Clone)]
pub struct Buff {
    /// Data store; its length is the addressable extent
    buffer: Vec<u8>,

    /// Cursor for sequential Read/Write
    pointer: u64,

    /// Grow the store when a write runs past the end
    append: bool,
}

/// An input accepted by [`Buff::make`]
pub enum BuffInput {
    /// Written into the buffer at the cursor
    Bytes(Vec<u8>),

    /// Drained fully into the buffer at the cursor
    Reader(Box<dyn Read>),

    /// First occurrence sets the length, second the capacity
    Size(usize),
}

impl From<Vec<u8>> for BuffInput {
    fn from(bytes: Vec<u8>) -> Self {
        BuffInput::Bytes(bytes)
    }
}

impl From<&[u8]> for BuffInput {
    fn from(bytes: &[u8]) -> Self {
        BuffInput::Bytes(bytes.to_vec())
    }
}

impl From<usize> for BuffInput {
    fn from(size: usize) -> Self {
        BuffInput::Size(size)
    }
}

impl Buff {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an empty buffer with append mode on
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            pointer: 0,
            append: true,
        }
    }

    /// Create an empty buffer reserving the configured initial capacity
    pub fn with_config(config: &Config) -> Self {
        Self {
            buffer: Vec::with_capacity(config.initial_capacity),
            pointer: 0,
            append: true,
        }
    }

    /// Copy `data` into a fresh buffer (append mode off, cursor at 0)
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Self {
        Self {
            buffer: data.as_ref().to_vec(),
            pointer: 0,
            append: false,
        }
    }

    /// Drain `reader` fully into a fresh buffer (append mode off, cursor at 0)
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buff = Self::new();
        let n = buff.read_from(&mut reader)?;
        tracing::debug!("Drained {} bytes into new buffer", n);
        buff.append_mode_off().rewind();
        Ok(buff)
    }

    /// Zero-filled buffer of exactly `length` bytes, append mode off
    pub fn with_size(length: usize) -> Self {
        Self {
            buffer: vec![0u8; length],
            pointer: 0,
            append: false,
        }
    }

    /// Zero-filled buffer of `length` bytes with room reserved for `capacity`
    ///
    /// A capacity below `length` is ignored.
    pub fn with_size_and_capacity(length: usize, capacity: usize) -> Self {
        let mut buffer = Vec::with_capacity(capacity.max(length));
        buffer.resize(length, 0);
        Self {
            buffer,
            pointer: 0,
            append: false,
        }
    }

    /// Build a buffer from a sequence of heterogeneous inputs
    ///
    /// Inputs are applied in order:
    /// - `Bytes` / `Reader` are written at the cursor
    /// - the first `Size` sets the length and turns append mode off
    /// - the second `Size` reserves capacity
    /// - a third `Size` is a configuration error
    ///
    /// If anything was written, append mode ends off and the cursor is rewound.
    pub fn make<I>(inputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = BuffInput>,
    {
        let mut buff = Self::new();
        let mut length_set = false;
        let mut capacity_set = false;
        let mut written = false;

        for input in inputs {
            match input {
                BuffInput::Reader(mut reader) => {
                    buff.read_from(&mut reader)?;
                    written = true;
                }
                BuffInput::Bytes(bytes) => {
                    buff.write_at_cursor(&bytes)?;
                    written = true;
                }
                BuffInput::Size(n) if !length_set => {
                    buff.buffer.resize(n, 0);
                    buff.append_mode_off();
                    length_set = true;
                }
                BuffInput::Size(n) if !capacity_set => {
                    if n > buff.buffer.len() {
                        let additional = n - buff.buffer.len();
                        buff.buffer.reserve_exact(additional);
                    }
                    buff.append_mode_off();
                    capacity_set = true;
                }
                BuffInput::Size(_) => {
                    return Err(BuffError::Config(format!(
                        "Buffer length ({}) and capacity ({}) are already set",
                        buff.buffer.len(),
                        buff.buffer.capacity()
                    )));
                }
            }
        }

        if written {
            buff.append_mode_off().rewind();
        }

        Ok(buff)
    }

    /// Decompress `reader` with `kind` and drain the result into a fresh buffer
    pub fn read_archive<R: Read>(kind: Compression, reader: R) -> Result<Self> {
        let buff = Self::from_reader(archive_reader(kind, reader))?;
        tracing::debug!("Loaded {} bytes from {} archive", buff.len(), kind);
        Ok(buff)
    }

    /// Load a buffer using the compression settings in `config`
    pub fn load<R: Read>(config: &Config, reader: R) -> Result<Self> {
        let mut buff = Self::with_config(config);
        buff.read_from(&mut archive_reader(config.compression, reader))?;
        buff.append_mode_off().rewind();
        tracing::debug!(
            "Loaded {} bytes from {} archive",
            buff.len(),
            config.compression
        );
        Ok(buff)
    }

    /// Hand the buffer over to a shared owner so range views can be taken
    pub fn share(self) -> SharedBuff {
        SharedBuff::new(self)
    }

    // =========================================================================
    // Growth Policy
    // =========================================================================

    /// Grow the store when a write runs past the end
    pub fn append_mode_on(&mut self) -> &mut Self {
        self.append = true;
        self
    }

    /// Clip writes that run past the end
    pub fn append_mode_off(&mut self) -> &mut Self {
        self.append = false;
        self
    }

    pub fn is_append_mode(&self) -> bool {
        self.append
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    /// Set the cursor used by Read/Write; no bounds check
    pub fn seek(&mut self, position: u64) -> &mut Self {
        self.pointer = position;
        self
    }

    /// Set the cursor to the beginning of the buffer
    pub fn rewind(&mut self) -> &mut Self {
        self.seek(0)
    }

    /// Current cursor position
    pub fn position(&self) -> u64 {
        self.pointer
    }

    // =========================================================================
    // Absolute Access
    // =========================================================================

    /// Copy bytes starting at `offset` into `buf`; the cursor is untouched
    ///
    /// Returns the number of bytes copied, 0 at or past the end of the store.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> usize {
        let start = match usize::try_from(offset) {
            Ok(start) if start < self.buffer.len() => start,
            _ => return 0,
        };

        let n = buf.len().min(self.buffer.len() - start);
        buf[..n].copy_from_slice(&self.buffer[start..start + n]);
        n
    }

    /// Copy `buf` into the store starting at `offset`; the cursor is untouched
    ///
    /// With append mode on, the store is extended (zero-filled) by exactly the
    /// deficit; a store that cannot grow that far is `BuffError::Capacity`.
    /// With append mode off, the write is clipped to what fits.
    pub fn write_at(&mut self, buf: &[u8], offset: u64) -> Result<usize> {
        if self.append {
            self.grow_to_fit(buf.len(), offset)?;
        }

        let start = match usize::try_from(offset) {
            Ok(start) if start < self.buffer.len() => start,
            _ => {
                if !buf.is_empty() {
                    tracing::warn!(
                        "Dropped {} byte write at offset {} past end of {} byte buffer",
                        buf.len(),
                        offset,
                        self.buffer.len()
                    );
                }
                return Ok(0);
            }
        };

        let n = buf.len().min(self.buffer.len() - start);
        if n < buf.len() {
            tracing::warn!(
                "Clipped write at offset {}: {} of {} bytes fit",
                offset,
                n,
                buf.len()
            );
        }

        self.buffer[start..start + n].copy_from_slice(&buf[..n]);
        Ok(n)
    }

    /// `write_at` the cursor, advancing it by the count written
    fn write_at_cursor(&mut self, buf: &[u8]) -> Result<usize> {
        let n = self.write_at(buf, self.pointer)?;
        self.pointer += n as u64;
        Ok(n)
    }

    /// Extend the store so `len` bytes fit at `offset`
    fn grow_to_fit(&mut self, len: usize, offset: u64) -> Result<()> {
        let end = usize::try_from(offset)
            .ok()
            .and_then(|start| start.checked_add(len))
            .ok_or(BuffError::Capacity { offset, len })?;

        if end > self.buffer.len() {
            self.buffer
                .try_reserve(end - self.buffer.len())
                .map_err(|_| BuffError::Capacity { offset, len })?;
            tracing::trace!("Growing buffer from {} to {} bytes", self.buffer.len(), end);
            self.buffer.resize(end, 0);
        }
        Ok(())
    }

    // =========================================================================
    // Stream Drain / Emit
    // =========================================================================

    /// Read `reader` to the end and write everything at the cursor
    ///
    /// Returns the number of bytes actually written into the store.
    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<u64> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let n = self.write_at_cursor(&data)?;
        Ok(n as u64)
    }

    /// Write the entire store to `writer`; the cursor is untouched
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<u64> {
        writer.write_all(&self.buffer)?;
        Ok(self.buffer.len() as u64)
    }

    /// Emit the store through the compression envelope
    ///
    /// Returns the number of uncompressed bytes emitted.
    pub fn write_archive<W: Write>(&self, kind: Compression, writer: W) -> Result<u64> {
        self.archive_into(kind, DEFAULT_LEVEL, writer)
    }

    /// Store the buffer using the compression settings in `config`
    pub fn store<W: Write>(&self, config: &Config, writer: W) -> Result<u64> {
        self.archive_into(config.compression, config.compression_level, writer)
    }

    fn archive_into<W: Write>(&self, kind: Compression, level: u32, writer: W) -> Result<u64> {
        let mut archive = archive_writer_with_level(kind, writer, level);
        let n = self.write_to(&mut archive)?;
        archive.finish()?;
        tracing::debug!("Stored {} bytes as {} archive", n, kind);
        Ok(n)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current addressable extent
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Immutable snapshot of the current contents
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buffer)
    }

    /// CRC32 of the current contents
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(&self.buffer)
    }
}

impl Default for Buff {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buff")
            .field("len", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .field("pointer", &self.pointer)
            .field("append", &self.append)
            .finish()
    }
}

impl From<Vec<u8>> for Buff {
    /// Takes ownership of `data` without copying (append mode off)
    fn from(data: Vec<u8>) -> Self {
        Self {
            buffer: data,
            pointer: 0,
            append: false,
        }
    }
}

impl From<Buff> for Bytes {
    fn from(buff: Buff) -> Self {
        Bytes::from(buff.buffer)
    }
}

// =============================================================================
// std::io integration
// =============================================================================

impl Read for Buff {
    /// Read at the cursor and advance it by the count read
    ///
    /// A short count means the end of the store was reached; `Ok(0)` once the
    /// cursor is at or past the end.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.read_at(buf, self.pointer);
        self.pointer += n as u64;
        Ok(n)
    }
}

impl Write for Buff {
    /// Write at the cursor (applying the growth policy) and advance it
    ///
    /// A store that cannot grow far enough reports `ErrorKind::OutOfMemory`.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_at_cursor(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
