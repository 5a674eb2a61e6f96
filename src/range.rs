//! Range View Module
//!
//! Lightweight accessors over a sub-region of a shared buffer.
//!
//! ## Responsibilities
//! - Own nothing: every access routes through the parent's absolute methods
//! - Translate a relative cursor/offset into `offset + relative`
//! - Never touch bytes at or beyond `offset + limit`
//!
//! ## Layout
//! ```text
//!   parent store
//! ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! │ a │ b │ c │ d │ e │ f │ g │ h │
//! └───┴───┴───┴───┴───┴───┴───┴───┘
//!           ▲           ▲
//!        offset=2    offset+limit=5
//!           └── view ───┘  (relative 0..3)
//! ```
//!
//! Views are not coordinated: overlapping views may overwrite each other, and
//! growth through a view is the parent's append policy alone.

use std::cell::{Ref, RefCell, RefMut};
use std::io::{self, Read, Write};
use std::rc::Rc;

use crate::buffer::Buff;
use crate::error::{BuffError, Result};

// =============================================================================
// Shared Owner
// =============================================================================

/// Shared handle to a [`Buff`] from which range views are taken
///
/// Cloning the handle is cheap; the store lives until the last handle or view
/// is dropped. Not thread-safe.
#[derive(Debug, Clone)]
pub struct SharedBuff {
    inner: Rc<RefCell<Buff>>,
}

impl SharedBuff {
    pub fn new(buff: Buff) -> Self {
        Self {
            inner: Rc::new(RefCell::new(buff)),
        }
    }

    /// Create a view over `limit` bytes starting at `offset`
    ///
    /// A limit of 0 covers the remainder of the store from `offset`.
    pub fn range(&self, offset: u64, limit: u64) -> Result<RangedBuff> {
        let limit = if limit == 0 {
            (self.len()? as u64).saturating_sub(offset)
        } else {
            limit
        };

        Ok(RangedBuff {
            buff: self.clone(),
            offset,
            pointer: 0,
            limit,
        })
    }

    pub fn borrow(&self) -> Result<Ref<'_, Buff>> {
        self.inner.try_borrow().map_err(|_| BuffError::Borrowed)
    }

    pub fn borrow_mut(&self) -> Result<RefMut<'_, Buff>> {
        self.inner.try_borrow_mut().map_err(|_| BuffError::Borrowed)
    }

    /// Current extent of the parent store
    pub fn len(&self) -> Result<usize> {
        Ok(self.borrow()?.len())
    }

    /// Absolute read on the parent
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        Ok(self.borrow()?.read_at(buf, offset))
    }

    /// Absolute write on the parent (applies the parent's growth policy)
    pub fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize> {
        self.borrow_mut()?.write_at(buf, offset)
    }

    /// Number of live handles, views included
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Take the buffer back if this is the only handle
    ///
    /// While other handles or views exist, the handle is returned unchanged.
    pub fn try_unwrap(self) -> std::result::Result<Buff, SharedBuff> {
        Rc::try_unwrap(self.inner)
            .map(RefCell::into_inner)
            .map_err(|inner| SharedBuff { inner })
    }
}

impl From<Buff> for SharedBuff {
    fn from(buff: Buff) -> Self {
        SharedBuff::new(buff)
    }
}

// =============================================================================
// Range View
// =============================================================================

/// Non-owning accessor over `[offset, offset + limit)` of a shared buffer
#[derive(Debug, Clone)]
pub struct RangedBuff {
    buff: SharedBuff,
    /// Absolute base position in the parent store
    offset: u64,
    /// Cursor relative to `offset`
    pointer: u64,
    /// Exclusive relative bound
    limit: u64,
}

impl RangedBuff {
    /// Set the relative cursor; no bounds check
    pub fn seek(&mut self, position: u64) -> &mut Self {
        self.pointer = position;
        self
    }

    pub fn rewind(&mut self) -> &mut Self {
        self.seek(0)
    }

    /// Read at the cursor and advance it by the count read
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check_pointer()?;

        let n = self.read_at(buf, self.pointer)?;
        self.pointer += n as u64;
        Ok(n)
    }

    /// Write at the cursor and advance it by the count written
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.check_pointer()?;

        let n = self.write_at(buf, self.pointer)?;
        self.pointer += n as u64;
        Ok(n)
    }

    /// Read from the parent at `offset + relative`, clipped to the limit
    pub fn read_at(&self, buf: &mut [u8], relative: u64) -> Result<usize> {
        let n = self.clip(buf.len(), relative);
        if n == 0 {
            return Ok(0);
        }
        self.buff.read_at(&mut buf[..n], self.offset + relative)
    }

    /// Write to the parent at `offset + relative`, clipped to the limit
    pub fn write_at(&self, buf: &[u8], relative: u64) -> Result<usize> {
        let n = self.clip(buf.len(), relative);
        if n == 0 {
            return Ok(0);
        }
        self.buff.write_at(&buf[..n], self.offset + relative)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn position(&self) -> u64 {
        self.pointer
    }

    /// Bytes left between the cursor and the limit
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.pointer)
    }

    /// The parent this view routes through
    pub fn parent(&self) -> &SharedBuff {
        &self.buff
    }

    /// CRC32 of the bytes the view currently covers in the parent
    pub fn checksum(&self) -> Result<u32> {
        let parent = self.buff.borrow()?;
        let data = parent.as_slice();
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(data.len());
        let end = usize::try_from(self.offset.saturating_add(self.limit))
            .unwrap_or(usize::MAX)
            .min(data.len());
        Ok(crc32fast::hash(&data[start..end]))
    }

    fn check_pointer(&self) -> Result<()> {
        if self.pointer > self.limit {
            return Err(BuffError::EndOfRange {
                pointer: self.pointer,
                limit: self.limit,
            });
        }
        Ok(())
    }

    /// Number of bytes of a `len`-byte access at `relative` inside the limit
    fn clip(&self, len: usize, relative: u64) -> usize {
        if relative >= self.limit || self.offset.checked_add(relative).is_none() {
            return 0;
        }
        let room = self.limit - relative;
        usize::try_from(room).map_or(len, |room| len.min(room))
    }
}

// =============================================================================
// std::io integration
// =============================================================================

impl Read for RangedBuff {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        RangedBuff::read(self, buf).map_err(io::Error::from)
    }
}

impl Write for RangedBuff {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RangedBuff::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
