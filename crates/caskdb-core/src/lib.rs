//! # CaskDB Core
//!
//! An embeddable Bitcask-style key-value storage engine.
//!
//! All mutations are appended to immutable-once-rotated log files on disk; a
//! purely in-memory index maps each live key to the location of its newest
//! record. Writes cost one append, reads cost one index lookup plus one
//! positioned read, and crash recovery replays the log files in order to
//! rebuild the index.
//!
//! ## Features
//!
//! - **Append-only data files** with CRC-framed records and automatic
//!   rotation at a configurable size
//! - **Last-write-wins** semantics, deletes as tombstone records
//! - **Crash recovery** by replay, tolerant of a zero-padded tail
//! - **Swappable index**: B-tree or radix tree, chosen at open
//! - **Thread-safe**: concurrent readers and writers on one handle
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use caskdb_core::{Database, Options};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = Options {
//!         dir_path: "./data".into(),
//!         ..Options::default()
//!     };
//!     let db = Database::open(options)?;
//!
//!     db.put(b"name", b"cask")?;
//!     let value = db.get(b"name")?;
//!     assert_eq!(value, b"cask");
//!
//!     db.delete(b"name")?;
//!     db.close()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]

mod data;
mod engine;
mod error;
mod fio;
mod index;
mod options;


pub use engine::Database;
pub use error::{Error, Result};
pub use options::{IndexType, Options};
