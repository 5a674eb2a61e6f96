//! Tests for the compression envelope
//!
//! These tests verify:
//! - Kind tag parsing and rejection of unknown tags
//! - Compress/decompress round trips for gzip and zlib
//! - Passthrough for Compression::None
//! - Error propagation from corrupt input and failing sinks

use std::io::{self, Read, Write};

use membuff::{
    archive_reader, archive_writer, archive_writer_with_level, BuffError, Compression,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn compress(kind: Compression, data: &[u8]) -> Vec<u8> {
    let mut writer = archive_writer(kind, Vec::new());
    writer.write_all(data).unwrap();
    writer.finish().unwrap()
}

fn decompress(kind: Compression, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    archive_reader(kind, data).read_to_end(&mut out).unwrap();
    out
}

/// Mildly compressible test payload
fn sample_payload() -> Vec<u8> {
    (0..10_000u32).flat_map(|i| (i % 97).to_le_bytes()).collect()
}

// =============================================================================
// Kind Tag Tests
// =============================================================================

#[test]
fn test_from_tag_known_kinds() {
    assert_eq!(Compression::from_tag(0).unwrap(), Compression::None);
    assert_eq!(Compression::from_tag(1).unwrap(), Compression::Gzip);
    assert_eq!(Compression::from_tag(2).unwrap(), Compression::Zlib);
    assert_eq!(Compression::Zlib.tag(), 2);
}

#[test]
fn test_from_tag_unknown_kind() {
    for tag in [3i8, -1, 42, i8::MAX] {
        match Compression::try_from(tag) {
            Err(BuffError::UnknownCompression(t)) => assert_eq!(t, tag),
            other => panic!("Expected UnknownCompression, got {:?}", other),
        }
    }
}

#[test]
fn test_parse_names() {
    assert_eq!("gzip".parse::<Compression>().unwrap(), Compression::Gzip);
    assert_eq!("ZLIB".parse::<Compression>().unwrap(), Compression::Zlib);
    assert_eq!("none".parse::<Compression>().unwrap(), Compression::None);
    assert!(matches!(
        "brotli".parse::<Compression>(),
        Err(BuffError::Config(_))
    ));
    assert_eq!(Compression::Gzip.to_string(), "gzip");
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_gzip_round_trip_payload() {
    let packed = compress(Compression::Gzip, b"payload");

    assert_ne!(packed.as_slice(), b"payload");
    assert_eq!(&packed[..2], &[0x1f, 0x8b]);
    assert_eq!(decompress(Compression::Gzip, &packed), b"payload");
}

#[test]
fn test_compressed_round_trips() {
    let data = sample_payload();

    for kind in [Compression::Gzip, Compression::Zlib] {
        let packed = compress(kind, &data);
        assert!(packed.len() < data.len(), "{} did not shrink the payload", kind);
        assert_eq!(decompress(kind, &packed), data, "{} round trip", kind);
    }
}

#[test]
fn test_empty_round_trips() {
    for kind in [Compression::None, Compression::Gzip, Compression::Zlib] {
        let packed = compress(kind, &[]);
        assert!(decompress(kind, &packed).is_empty(), "{} empty round trip", kind);
    }
}

#[test]
fn test_none_is_passthrough() {
    let packed = compress(Compression::None, b"as is");
    assert_eq!(packed, b"as is");
    assert_eq!(decompress(Compression::None, b"as is"), b"as is");
}

#[test]
fn test_levels_round_trip() {
    let data = sample_payload();

    for level in [0u32, 1, 9, 42] {
        let mut writer = archive_writer_with_level(Compression::Zlib, Vec::new(), level);
        writer.write_all(&data).unwrap();
        let packed = writer.finish().unwrap();

        assert_eq!(decompress(Compression::Zlib, &packed), data, "level {}", level);
    }
}

#[test]
fn test_chunked_writes() {
    let data = sample_payload();
    let mut writer = archive_writer(Compression::Gzip, Vec::new());

    for chunk in data.chunks(333) {
        writer.write_all(chunk).unwrap();
    }
    writer.flush().unwrap();
    let packed = writer.finish().unwrap();

    assert_eq!(decompress(Compression::Gzip, &packed), data);
}

#[test]
fn test_kinds_are_not_interchangeable() {
    let packed = compress(Compression::Zlib, b"zlib bytes");

    let mut out = Vec::new();
    assert!(archive_reader(Compression::Gzip, packed.as_slice())
        .read_to_end(&mut out)
        .is_err());
}

#[test]
fn test_wrapper_reports_kind() {
    let writer = archive_writer(Compression::Zlib, Vec::new());
    assert_eq!(writer.kind(), Compression::Zlib);
    assert!(writer.get_ref().is_empty());

    let reader = archive_reader(Compression::Gzip, io::empty());
    assert_eq!(reader.kind(), Compression::Gzip);
}

// =============================================================================
// Error Propagation Tests
// =============================================================================

#[test]
fn test_corrupt_input_is_io_error() {
    let mut out = Vec::new();
    let result = archive_reader(Compression::Gzip, &b"definitely not gzip"[..])
        .read_to_end(&mut out);

    assert!(result.is_err());
}

#[test]
fn test_failing_sink_propagates() {
    #[derive(Debug)]
    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let mut writer = archive_writer(Compression::Gzip, FailingWriter);
    let _ = writer.write_all(&sample_payload());
    let err = writer.finish().unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}
