//! Tests for append-only data files.

use tempfile::TempDir;

use super::data_file::{data_file_name, DataFile};
use super::log_record::{LogRecord, LogRecordType};
use crate::error::Error;

fn record(key: &[u8], value: &[u8], rec_type: LogRecordType) -> LogRecord {
    LogRecord {
        key: key.to_vec(),
        value: value.to_vec(),
        rec_type,
    }
}

#[test]
fn open_names_files_by_zero_padded_id() {
    let dir = TempDir::new().expect("temp dir");

    let file = DataFile::open(dir.path(), 0).expect("open");
    assert_eq!(file.file_id(), 0);
    assert!(dir.path().join("000000000.data").exists());

    // opening the same id again resumes the same file
    let again = DataFile::open(dir.path(), 0).expect("open");
    assert_eq!(again.file_id(), 0);

    let other = DataFile::open(dir.path(), 160).expect("open");
    assert_eq!(other.file_id(), 160);
    assert!(dir.path().join("000000160.data").exists());
}

#[test]
fn write_advances_the_offset() {
    let dir = TempDir::new().expect("temp dir");
    let mut file = DataFile::open(dir.path(), 2).expect("open");

    assert_eq!(file.write_off(), 0);
    assert_eq!(file.write(b"aaa").expect("write"), 3);
    assert_eq!(file.write_off(), 3);
    assert_eq!(file.write(b"bbb").expect("write"), 3);
    assert_eq!(file.write_off(), 6);
}

#[test]
fn sync_succeeds() {
    let dir = TempDir::new().expect("temp dir");
    let mut file = DataFile::open(dir.path(), 3).expect("open");

    file.write(b"caskdb").expect("write");
    file.sync().expect("sync");
}

#[test]
fn records_read_back_in_sequence() {
    let dir = TempDir::new().expect("temp dir");
    let mut file = DataFile::open(dir.path(), 600).expect("open");

    let first = record(b"key-a", b"value-a", LogRecordType::Normal);
    let second = record(b"key-b", b"value-b", LogRecordType::Normal);
    let tombstone = record(b"key-a", b"", LogRecordType::Deleted);

    file.write(&first.encode()).expect("write");
    file.write(&second.encode()).expect("write");
    file.write(&tombstone.encode()).expect("write");

    let read1 = file.read_log_record(0).expect("read").expect("record");
    assert_eq!(read1.record, first);

    let read2 = file
        .read_log_record(read1.size)
        .expect("read")
        .expect("record");
    assert_eq!(read2.record, second);

    let read3 = file
        .read_log_record(read1.size + read2.size)
        .expect("read")
        .expect("record");
    assert_eq!(read3.record.rec_type, LogRecordType::Deleted);
    assert_eq!(read3.record.key, b"key-a");

    // past the last record: clean end of log
    let end = file
        .read_log_record(read1.size + read2.size + read3.size)
        .expect("read");
    assert!(end.is_none());
}

#[test]
fn empty_file_reads_as_end_of_log() {
    let dir = TempDir::new().expect("temp dir");
    let file = DataFile::open(dir.path(), 7).expect("open");

    assert!(file.read_log_record(0).expect("read").is_none());
}

#[test]
fn zero_padded_tail_reads_as_end_of_log() {
    let dir = TempDir::new().expect("temp dir");
    let mut file = DataFile::open(dir.path(), 8).expect("open");

    let rec = record(b"key", b"value", LogRecordType::Normal);
    file.write(&rec.encode()).expect("write");
    file.write(&[0u8; 32]).expect("write");

    let read = file.read_log_record(0).expect("read").expect("record");
    assert_eq!(read.record, rec);
    assert!(file.read_log_record(read.size).expect("read").is_none());
}

#[test]
fn flipped_byte_fails_the_crc_check() {
    let dir = TempDir::new().expect("temp dir");
    let mut file = DataFile::open(dir.path(), 9).expect("open");

    let mut encoded = record(b"key", b"value", LogRecordType::Normal).encode();
    let last = encoded.len() - 1;
    encoded[last] ^= 0xFF;
    file.write(&encoded).expect("write");

    let err = file.read_log_record(0).expect_err("corrupt record");
    assert!(matches!(err, Error::InvalidRecordCrc));
}

#[test]
fn truncated_frame_is_an_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let mut file = DataFile::open(dir.path(), 10).expect("open");

    // header promises more key+value bytes than the file holds
    let encoded = record(b"key-x", b"value-x", LogRecordType::Normal).encode();
    file.write(&encoded[..12]).expect("write");

    let err = file.read_log_record(0).expect_err("truncated record");
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn data_file_name_is_nine_digits() {
    let dir = TempDir::new().expect("temp dir");
    assert_eq!(
        data_file_name(dir.path(), 42),
        dir.path().join("000000042.data")
    );
}
