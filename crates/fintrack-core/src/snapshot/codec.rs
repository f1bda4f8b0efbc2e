//! Snapshot serializer/compressor
//!
//! JSON inside gzip at the best compression level. Encoding streams straight
//! into the compressor and decoding reads straight out of the decompressor,
//! so neither side holds the uncompressed document in memory.

use crate::errors::SnapshotError;
use crate::snapshot::Snapshot;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{BufReader, Read, Write};

/// Stream a snapshot into `writer` and return the writer once the gzip
/// trailer is written
pub fn write_snapshot<W: Write>(snapshot: &Snapshot, writer: W) -> Result<W, SnapshotError> {
    let mut encoder = GzEncoder::new(writer, Compression::best());
    serde_json::to_writer(&mut encoder, snapshot)?;
    Ok(encoder.finish()?)
}

/// Encode a snapshot to compressed bytes
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    write_snapshot(snapshot, Vec::new())
}

/// Decode a snapshot from a compressed stream.
///
/// Needs no random access. A truncated or corrupt stream, trailing garbage
/// or a `null` document is an error, never an empty snapshot.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Snapshot, SnapshotError> {
    let decoder = GzDecoder::new(reader);
    let parsed: Option<Snapshot> = serde_json::from_reader(BufReader::new(decoder))?;
    parsed.ok_or(SnapshotError::MissingRoot)
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    read_snapshot(bytes)
}
