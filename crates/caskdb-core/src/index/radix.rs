//! Radix tree index.

use parking_lot::RwLock;
use radix_trie::Trie;

use super::Indexer;
use crate::data::log_record::LogRecordPos;

/// Radix tree index keyed on raw key bytes. Same contract as the B-tree
/// variant; prefix-compressed nodes trade pointer chasing for memory on key
/// sets with long shared prefixes.
pub(crate) struct RadixIndex {
    tree: RwLock<Trie<Vec<u8>, LogRecordPos>>,
}

impl RadixIndex {
    pub(crate) fn new() -> Self {
        Self {
            tree: RwLock::new(Trie::new()),
        }
    }
}

impl Indexer for RadixIndex {
    fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> bool {
        self.tree.write().insert(key, pos);
        true
    }

    fn get(&self, key: &[u8]) -> Option<LogRecordPos> {
        self.tree.read().get(&key.to_vec()).copied()
    }

    fn delete(&self, key: &[u8]) -> bool {
        self.tree.write().remove(&key.to_vec()).is_some()
    }
}
