//! Append-only data file.
//!
//! A data file is one log segment: a concatenation of framed records with no
//! separators or trailers, named `<9-digit id>.data`. Only the highest-id
//! file accepts appends; older files are read-only for the rest of their
//! lives.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fio::{new_io_manager, IoManager};

use super::log_record::{
    decode_log_record_header, LogRecord, ReadLogRecord, CRC_SIZE, MAX_LOG_RECORD_HEADER_SIZE,
};

/// Suffix shared by every data file.
pub(crate) const DATA_FILE_NAME_SUFFIX: &str = ".data";

/// One append-only log segment.
pub(crate) struct DataFile {
    file_id: u32,
    write_off: u64,
    io: Box<dyn IoManager>,
}

impl DataFile {
    /// Opens (creating if absent) the data file with `file_id` inside
    /// `dir_path`. The write offset starts at zero; callers resuming an
    /// existing file set it after replay.
    pub(crate) fn open(dir_path: &Path, file_id: u32) -> Result<Self> {
        let io = new_io_manager(&data_file_name(dir_path, file_id))?;
        Ok(Self {
            file_id,
            write_off: 0,
            io,
        })
    }

    pub(crate) fn file_id(&self) -> u32 {
        self.file_id
    }

    pub(crate) fn write_off(&self) -> u64 {
        self.write_off
    }

    pub(crate) fn set_write_off(&mut self, offset: u64) {
        self.write_off = offset;
    }

    /// Appends `buf` and advances the write offset by the bytes actually
    /// written.
    pub(crate) fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let nbytes = self.io.write(buf)?;
        self.write_off += nbytes as u64;
        Ok(nbytes)
    }

    pub(crate) fn sync(&self) -> Result<()> {
        self.io.sync()
    }

    pub(crate) fn close(&self) -> Result<()> {
        self.io.close()
    }

    /// Reads and verifies the record starting at `offset`.
    ///
    /// `Ok(None)` is the clean end-of-log signal: either there are no header
    /// bytes left to read, or the header slot is all zeros (a preallocated
    /// or zero-padded tail). A record whose CRC does not verify is
    /// [`Error::InvalidRecordCrc`]; a record whose frame runs past the end
    /// of the file is an `UnexpectedEof` IO error. Both are corruption, not
    /// end-of-log.
    pub(crate) fn read_log_record(&self, offset: u64) -> Result<Option<ReadLogRecord>> {
        let mut header_buf = [0u8; MAX_LOG_RECORD_HEADER_SIZE];
        let nread = self.io.read(&mut header_buf, offset)?;

        let Some((header, header_size)) = decode_log_record_header(&header_buf[..nread]) else {
            return Ok(None);
        };
        if header.crc == 0 && header.key_size == 0 && header.value_size == 0 {
            return Ok(None);
        }

        let key_size = header.key_size as usize;
        let value_size = header.value_size as usize;

        let mut kv_buf = vec![0u8; key_size + value_size];
        let nread = self.io.read(&mut kv_buf, offset + header_size as u64)?;
        if nread < kv_buf.len() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "record frame is truncated",
            )));
        }

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&header_buf[CRC_SIZE..header_size]);
        hasher.update(&kv_buf);
        if hasher.finalize() != header.crc {
            return Err(Error::InvalidRecordCrc);
        }

        let value = kv_buf.split_off(key_size);
        Ok(Some(ReadLogRecord {
            record: LogRecord {
                key: kv_buf,
                value,
                rec_type: header.rec_type,
            },
            size: (header_size + key_size + value_size) as u64,
        }))
    }
}

/// Full path of the data file with `file_id` inside `dir_path`.
pub(crate) fn data_file_name(dir_path: &Path, file_id: u32) -> PathBuf {
    dir_path.join(format!("{file_id:09}{DATA_FILE_NAME_SUFFIX}"))
}
