//! Compression Envelope
//!
//! Wraps a generic byte stream so that bytes flowing through it are
//! transparently compressed or decompressed.
//!
//! ## Stream Layout
//! ```text
//! caller ──▶ ArchiveWriter (compress)   ──▶ sink W
//! caller ◀── ArchiveReader (decompress) ◀── source R
//! ```
//!
//! The envelope holds no state besides the selected transform. The algorithms
//! themselves come from `flate2`.

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression as Level;

use crate::error::{BuffError, Result};

/// Default compression level handed to the encoders
pub const DEFAULT_LEVEL: u32 = 6;

// =============================================================================
// Compression Kind
// =============================================================================

/// Compression kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Compression {
    /// Bytes pass through untouched
    #[default]
    None = 0,

    /// gzip container (RFC 1952)
    Gzip = 1,

    /// zlib container (RFC 1950)
    Zlib = 2,
}

impl Compression {
    /// Resolve a raw kind tag, rejecting anything unrecognized
    pub fn from_tag(tag: i8) -> Result<Self> {
        match tag {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Gzip),
            2 => Ok(Compression::Zlib),
            _ => Err(BuffError::UnknownCompression(tag)),
        }
    }

    /// Raw kind tag
    pub fn tag(self) -> i8 {
        self as i8
    }
}

impl TryFrom<i8> for Compression {
    type Error = BuffError;

    fn try_from(tag: i8) -> Result<Self> {
        Compression::from_tag(tag)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Zlib => "zlib",
        };
        f.write_str(name)
    }
}

impl FromStr for Compression {
    type Err = BuffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Compression::None),
            "gzip" | "gz" => Ok(Compression::Gzip),
            "zlib" => Ok(Compression::Zlib),
            other => Err(BuffError::Config(format!("Unknown compression name: {other}"))),
        }
    }
}

// =============================================================================
// Read Side
// =============================================================================

/// Stream yielding decompressed bytes sourced from an inner reader
pub enum ArchiveReader<R: Read> {
    Plain(R),
    Gzip(GzDecoder<R>),
    Zlib(ZlibDecoder<R>),
}

/// Wrap `reader` so that reading from the result yields decompressed bytes
pub fn archive_reader<R: Read>(kind: Compression, reader: R) -> ArchiveReader<R> {
    match kind {
        Compression::None => ArchiveReader::Plain(reader),
        Compression::Gzip => ArchiveReader::Gzip(GzDecoder::new(reader)),
        Compression::Zlib => ArchiveReader::Zlib(ZlibDecoder::new(reader)),
    }
}

impl<R: Read> ArchiveReader<R> {
    /// The transform this reader applies
    pub fn kind(&self) -> Compression {
        match self {
            ArchiveReader::Plain(_) => Compression::None,
            ArchiveReader::Gzip(_) => Compression::Gzip,
            ArchiveReader::Zlib(_) => Compression::Zlib,
        }
    }

    /// Unwrap the inner reader, discarding any decoder state
    pub fn into_inner(self) -> R {
        match self {
            ArchiveReader::Plain(r) => r,
            ArchiveReader::Gzip(r) => r.into_inner(),
            ArchiveReader::Zlib(r) => r.into_inner(),
        }
    }
}

impl<R: Read> Read for ArchiveReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ArchiveReader::Plain(r) => r.read(buf),
            ArchiveReader::Gzip(r) => r.read(buf),
            ArchiveReader::Zlib(r) => r.read(buf),
        }
    }
}

// =============================================================================
// Write Side
// =============================================================================

/// Stream compressing written bytes and forwarding them to an inner writer
///
/// Call [`ArchiveWriter::finish`] once done; dropping the writer attempts to
/// finish the stream but swallows any error.
pub enum ArchiveWriter<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
    Zlib(ZlibEncoder<W>),
}

/// Wrap `writer` so that bytes written to the result are compressed
pub fn archive_writer<W: Write>(kind: Compression, writer: W) -> ArchiveWriter<W> {
    archive_writer_with_level(kind, writer, DEFAULT_LEVEL)
}

/// Same as [`archive_writer`] with an explicit level (0-9, clamped)
pub fn archive_writer_with_level<W: Write>(
    kind: Compression,
    writer: W,
    level: u32,
) -> ArchiveWriter<W> {
    let level = Level::new(level.min(9));
    match kind {
        Compression::None => ArchiveWriter::Plain(writer),
        Compression::Gzip => ArchiveWriter::Gzip(GzEncoder::new(writer, level)),
        Compression::Zlib => ArchiveWriter::Zlib(ZlibEncoder::new(writer, level)),
    }
}

impl<W: Write> ArchiveWriter<W> {
    /// The transform this writer applies
    pub fn kind(&self) -> Compression {
        match self {
            ArchiveWriter::Plain(_) => Compression::None,
            ArchiveWriter::Gzip(_) => Compression::Gzip,
            ArchiveWriter::Zlib(_) => Compression::Zlib,
        }
    }

    /// Reference to the underlying sink
    pub fn get_ref(&self) -> &W {
        match self {
            ArchiveWriter::Plain(w) => w,
            ArchiveWriter::Gzip(w) => w.get_ref(),
            ArchiveWriter::Zlib(w) => w.get_ref(),
        }
    }

    /// Write any trailer, flush, and hand back the sink
    pub fn finish(self) -> io::Result<W> {
        match self {
            ArchiveWriter::Plain(mut w) => {
                w.flush()?;
                Ok(w)
            }
            ArchiveWriter::Gzip(w) => w.finish(),
            ArchiveWriter::Zlib(w) => w.finish(),
        }
    }
}

impl<W: Write> Write for ArchiveWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ArchiveWriter::Plain(w) => w.write(buf),
            ArchiveWriter::Gzip(w) => w.write(buf),
            ArchiveWriter::Zlib(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ArchiveWriter::Plain(w) => w.flush(),
            ArchiveWriter::Gzip(w) => w.flush(),
            ArchiveWriter::Zlib(w) => w.flush(),
        }
    }
}
