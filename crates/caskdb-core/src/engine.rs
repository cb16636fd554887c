//! The storage engine: writes, reads, rotation, startup replay.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use parking_lot::RwLock;
use tracing::debug;

use crate::data::data_file::{DataFile, DATA_FILE_NAME_SUFFIX};
use crate::data::log_record::{LogRecord, LogRecordPos, LogRecordType};
use crate::error::{Error, Result};
use crate::index::{self, Indexer};
use crate::options::Options;

/// File id of the first data file in an empty directory.
const INITIAL_FILE_ID: u32 = 0;

/// All open data files keyed by file id, plus the id currently accepting
/// appends. `active_id` is `None` only while the directory is empty; once
/// anything has been written it always names the highest id in the map.
struct FileSet {
    files: BTreeMap<u32, DataFile>,
    active_id: Option<u32>,
}

impl FileSet {
    fn active_mut(&mut self) -> Option<&mut DataFile> {
        let id = self.active_id?;
        self.files.get_mut(&id)
    }
}

/// An embeddable Bitcask-style key-value store.
///
/// All mutations append to the single active data file; an in-memory index
/// maps each live key to the location of its newest record, so a read costs
/// one index lookup plus one positioned read. On open, the index is rebuilt
/// by replaying every data file in file-id order.
///
/// The handle is safe to share across threads: appends are serialized by an
/// exclusive lock over the file set, reads take the shared side, and the
/// index synchronizes itself.
pub struct Database {
    options: Options,
    index: Box<dyn Indexer>,
    files: RwLock<FileSet>,
}

impl Database {
    /// Opens a database over `options.dir_path`, creating the directory if
    /// needed and replaying any existing data files to rebuild the index.
    pub fn open(options: Options) -> Result<Self> {
        check_options(&options)?;
        fs::create_dir_all(&options.dir_path)?;

        let mut files = load_data_files(&options.dir_path)?;
        let index = index::new_indexer(options.index_type);
        load_index_from_files(index.as_ref(), &mut files)?;

        debug!(
            path = %options.dir_path.display(),
            data_files = files.files.len(),
            "database opened"
        );
        Ok(Self {
            options,
            index,
            files: RwLock::new(files),
        })
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(Error::KeyIsEmpty);
        }
        let record = LogRecord {
            key: key.to_vec(),
            value: value.to_vec(),
            rec_type: LogRecordType::Normal,
        };

        // The exclusive lock spans the append and the index update, so a
        // location is visible to readers only once its bytes are written.
        let mut files = self.files.write();
        let pos = self.append_log_record(&mut files, &record)?;
        if !self.index.put(record.key, pos) {
            return Err(Error::IndexUpdateFailed);
        }
        Ok(())
    }

    /// Returns the current value stored under `key`.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        if key.is_empty() {
            return Err(Error::KeyIsEmpty);
        }
        let pos = self.index.get(key).ok_or(Error::KeyNotFound)?;

        let files = self.files.read();
        let file = files.files.get(&pos.file_id).ok_or(Error::DataFileNotFound)?;
        let read = file.read_log_record(pos.offset)?.ok_or(Error::KeyNotFound)?;

        // An index entry should never point at a tombstone; treat one as a
        // stale entry rather than handing back tombstone bytes.
        if read.record.rec_type == LogRecordType::Deleted {
            return Err(Error::KeyNotFound);
        }
        Ok(read.record.value)
    }

    /// Removes `key` by appending a tombstone record.
    ///
    /// Deleting a key that does not exist is a silent no-op.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(Error::KeyIsEmpty);
        }
        if self.index.get(key).is_none() {
            return Ok(());
        }
        let record = LogRecord {
            key: key.to_vec(),
            value: Vec::new(),
            rec_type: LogRecordType::Deleted,
        };

        let mut files = self.files.write();
        self.append_log_record(&mut files, &record)?;
        if !self.index.delete(key) {
            return Err(Error::IndexUpdateFailed);
        }
        Ok(())
    }

    /// Forces everything appended so far onto the storage device.
    pub fn sync(&self) -> Result<()> {
        let mut files = self.files.write();
        if let Some(active) = files.active_mut() {
            active.sync()?;
        }
        Ok(())
    }

    /// Flushes the active data file and releases every file handle. The
    /// database can be reopened from the same directory afterwards.
    pub fn close(&self) -> Result<()> {
        let mut files = self.files.write();
        if let Some(active) = files.active_mut() {
            active.sync()?;
        }
        for file in files.files.values() {
            file.close()?;
        }
        Ok(())
    }

    /// Appends `record` to the active data file, rotating first when the
    /// record would push the file past `data_file_size`. Returns the
    /// location of the appended record. Callers hold the exclusive file-set
    /// lock for the whole body.
    fn append_log_record(&self, files: &mut FileSet, record: &LogRecord) -> Result<LogRecordPos> {
        let encoded = record.encode();
        let size = encoded.len() as u64;

        // The first write ever creates data file 0.
        let mut active_id = match files.active_id {
            Some(id) => id,
            None => {
                let file = DataFile::open(&self.options.dir_path, INITIAL_FILE_ID)?;
                files.files.insert(INITIAL_FILE_ID, file);
                files.active_id = Some(INITIAL_FILE_ID);
                INITIAL_FILE_ID
            }
        };

        // Seal the active file and start its successor if the record does
        // not fit. The sealed file is synced first so rotation never leaves
        // unflushed bytes behind the frontier.
        if let Some(active) = files.files.get_mut(&active_id) {
            if active.write_off() + size > self.options.data_file_size {
                active.sync()?;
                let next_id = active_id + 1;
                let file = DataFile::open(&self.options.dir_path, next_id)?;
                debug!(file_id = file.file_id(), "rotated active data file");
                files.files.insert(next_id, file);
                files.active_id = Some(next_id);
                active_id = next_id;
            }
        }

        let active = files
            .files
            .get_mut(&active_id)
            .ok_or(Error::DataFileNotFound)?;
        let write_off = active.write_off();
        active.write(&encoded)?;
        if self.options.sync_writes {
            active.sync()?;
        }

        Ok(LogRecordPos {
            file_id: active_id,
            offset: write_off,
        })
    }

    #[cfg(test)]
    pub(crate) fn active_file_id(&self) -> Option<u32> {
        self.files.read().active_id
    }
}

fn check_options(options: &Options) -> Result<()> {
    if options.dir_path.as_os_str().is_empty() {
        return Err(Error::InvalidOptions("dir_path must not be empty"));
    }
    if options.data_file_size == 0 {
        return Err(Error::InvalidOptions(
            "data_file_size must be greater than zero",
        ));
    }
    Ok(())
}

/// Scans `dir_path` for data files and opens them all. The highest id
/// becomes the active file. Entries that are not data files are ignored; a
/// data file whose stem does not parse as an id is corruption.
fn load_data_files(dir_path: &Path) -> Result<FileSet> {
    let mut file_ids = Vec::new();
    for entry in fs::read_dir(dir_path)? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        let Some(stem) = name.strip_suffix(DATA_FILE_NAME_SUFFIX) else {
            continue;
        };
        let id: u32 = stem
            .parse()
            .map_err(|_| Error::DataDirectoryCorrupted(name.to_string()))?;
        file_ids.push(id);
    }
    file_ids.sort_unstable();

    let mut files = BTreeMap::new();
    for &id in &file_ids {
        files.insert(id, DataFile::open(dir_path, id)?);
    }
    Ok(FileSet {
        files,
        active_id: file_ids.last().copied(),
    })
}

/// Replays every data file in id order, rebuilding the index and leaving the
/// active file's write offset at the end of its last valid record.
///
/// Later records win over earlier ones for the same key because file ids are
/// monotone and records within a file are replayed in physical order; a
/// tombstone drops the key outright.
fn load_index_from_files(index: &dyn Indexer, files: &mut FileSet) -> Result<()> {
    let active_id = files.active_id;
    for (&file_id, file) in files.files.iter_mut() {
        let mut offset = 0u64;
        while let Some(read) = file.read_log_record(offset)? {
            if read.record.rec_type == LogRecordType::Deleted {
                index.delete(&read.record.key);
            } else {
                index.put(read.record.key, LogRecordPos { file_id, offset });
            }
            offset += read.size;
        }
        if Some(file_id) == active_id {
            file.set_write_off(offset);
        }
    }
    Ok(())
}
