//! Caller-facing configuration for opening a database.

use std::path::PathBuf;

/// Which in-memory index structure the engine builds at open.
///
/// Both variants satisfy the same put/get/delete contract; the choice never
/// leaks into the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexType {
    /// Ordered B-tree map.
    #[default]
    BTree = 1,
    /// Radix tree keyed on raw key bytes.
    Radix = 2,
}

/// Options accepted by [`crate::Database::open`].
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory holding the data files. Created if absent.
    pub dir_path: PathBuf,

    /// Size threshold in bytes at which the active data file is sealed and a
    /// new one is started. Must be greater than zero.
    pub data_file_size: u64,

    /// When true, every append is followed by an fsync. When false,
    /// durability is up to the OS page cache (or an explicit
    /// [`crate::Database::sync`]).
    pub sync_writes: bool,

    /// Index structure to build during startup replay.
    pub index_type: IndexType,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dir_path: std::env::temp_dir().join("caskdb"),
            data_file_size: 256 * 1024 * 1024,
            sync_writes: false,
            index_type: IndexType::BTree,
        }
    }
}
