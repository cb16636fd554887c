//! Log record framing.
//!
//! Every mutation is written to disk as one framed record:
//!
//! ```text
//! +-----+------+---------+-----------+-----+-------+
//! | crc | type | key_len | value_len | key | value |
//! +-----+------+---------+-----------+-----+-------+
//!   4B    1B    varint      varint     KB     VB
//! ```
//!
//! The CRC is little-endian CRC32 (IEEE) over everything after the CRC field
//! itself. Lengths are zig-zag varints, at most 5 bytes each for a 32-bit
//! length, which bounds the header at [`MAX_LOG_RECORD_HEADER_SIZE`] bytes.
//! Readers probe exactly that many bytes before they know a record's real
//! extent.

use bytes::{Buf, BufMut, BytesMut};
use prost::encoding::{decode_varint, encode_varint};

/// Width of the CRC prefix.
pub(crate) const CRC_SIZE: usize = 4;

/// Widest zig-zag varint a 32-bit length can need.
const MAX_VARINT32_SIZE: usize = 5;

/// Upper bound on an encoded header: crc + type + two maximal varints.
pub(crate) const MAX_LOG_RECORD_HEADER_SIZE: usize = CRC_SIZE + 1 + 2 * MAX_VARINT32_SIZE;

/// Kind of mutation a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogRecordType {
    /// An insert or update of a key.
    Normal = 0,
    /// A tombstone marking its key as deleted.
    Deleted = 1,
}

impl LogRecordType {
    /// Only the tombstone value is significant on disk; any other byte reads
    /// as a normal record and stands or falls with its CRC.
    pub(crate) fn from_u8(byte: u8) -> Self {
        match byte {
            1 => Self::Deleted,
            _ => Self::Normal,
        }
    }
}

/// A logical record before encoding / after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogRecord {
    pub(crate) key: Vec<u8>,
    pub(crate) value: Vec<u8>,
    pub(crate) rec_type: LogRecordType,
}

/// Location of a record on disk: which data file, and the byte offset of the
/// record's CRC field within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LogRecordPos {
    pub(crate) file_id: u32,
    pub(crate) offset: u64,
}

/// Parsed header fields of a framed record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LogRecordHeader {
    pub(crate) crc: u32,
    pub(crate) rec_type: LogRecordType,
    pub(crate) key_size: u32,
    pub(crate) value_size: u32,
}

/// A record read back from a data file together with its framed length, so
/// replay can advance to the next record.
#[derive(Debug)]
pub(crate) struct ReadLogRecord {
    pub(crate) record: LogRecord,
    pub(crate) size: u64,
}

impl LogRecord {
    /// Encodes the record into its on-disk frame.
    #[allow(clippy::cast_possible_wrap)] // key/value lengths fit an i64
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(
            MAX_LOG_RECORD_HEADER_SIZE + self.key.len() + self.value.len(),
        );
        buf.put_u32_le(0); // crc, patched once the frame is complete
        buf.put_u8(self.rec_type as u8);
        put_zigzag_varint(self.key.len() as i64, &mut buf);
        put_zigzag_varint(self.value.len() as i64, &mut buf);
        buf.extend_from_slice(&self.key);
        buf.extend_from_slice(&self.value);

        let crc = crc32fast::hash(&buf[CRC_SIZE..]);
        buf[..CRC_SIZE].copy_from_slice(&crc.to_le_bytes());
        buf.to_vec()
    }
}

/// Decodes the header prefix of a framed record.
///
/// Returns the parsed fields and the header's encoded size. `None` means the
/// buffer is too short to hold any header; during replay that is the clean
/// end-of-log signal, never a corruption error.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // sizes wrap like the wire format; garbage fails the CRC check
pub(crate) fn decode_log_record_header(buf: &[u8]) -> Option<(LogRecordHeader, usize)> {
    if buf.len() <= CRC_SIZE {
        return None;
    }
    let mut cursor = buf;
    let crc = cursor.get_u32_le();
    let rec_type = LogRecordType::from_u8(cursor.get_u8());
    let key_size = get_zigzag_varint(&mut cursor)? as u32;
    let value_size = get_zigzag_varint(&mut cursor)? as u32;
    let header_size = buf.len() - cursor.remaining();

    Some((
        LogRecordHeader {
            crc,
            rec_type,
            key_size,
            value_size,
        },
        header_size,
    ))
}

#[allow(clippy::cast_sign_loss)] // zig-zag mapping is defined on the bit pattern
fn put_zigzag_varint(n: i64, buf: &mut impl BufMut) {
    encode_varint(((n << 1) ^ (n >> 63)) as u64, buf);
}

#[allow(clippy::cast_possible_wrap)] // zig-zag mapping is defined on the bit pattern
fn get_zigzag_varint(buf: &mut impl Buf) -> Option<i64> {
    let raw = decode_varint(buf).ok()?;
    Some(((raw >> 1) as i64) ^ -((raw & 1) as i64))
}
