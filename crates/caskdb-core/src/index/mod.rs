//! In-memory index from key bytes to record locations.
//!
//! The engine depends only on the [`Indexer`] contract; the concrete
//! structure is picked once, at open, from [`IndexType`]. Implementations
//! carry their own lock and are safe for concurrent readers and writers.

use crate::data::log_record::LogRecordPos;
use crate::options::IndexType;

mod btree;
mod radix;


use btree::BTreeIndex;
use radix::RadixIndex;

/// Contract every index structure satisfies.
pub(crate) trait Indexer: Send + Sync {
    /// Inserts or replaces the location for `key`. Returns true on success.
    fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> bool;

    /// Looks up the location of the newest record for `key`.
    fn get(&self, key: &[u8]) -> Option<LogRecordPos>;

    /// Removes `key`. Returns true iff a mapping existed.
    fn delete(&self, key: &[u8]) -> bool;
}

/// Builds the index structure selected by `index_type`.
pub(crate) fn new_indexer(index_type: IndexType) -> Box<dyn Indexer> {
    match index_type {
        IndexType::BTree => Box::new(BTreeIndex::new()),
        IndexType::Radix => Box::new(RadixIndex::new()),
    }
}
