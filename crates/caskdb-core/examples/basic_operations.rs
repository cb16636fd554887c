//! Minimal put / get / delete walkthrough.
//!
//! Run with `cargo run --example basic_operations`.

use caskdb_core::{Database, Error, Options};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::TempDir::new()?;
    let options = Options {
        dir_path: dir.path().to_path_buf(),
        ..Options::default()
    };
    let db = Database::open(options)?;

    db.put(b"language", b"rust")?;
    db.put(b"model", b"bitcask")?;

    let value = db.get(b"language")?;
    println!("language = {}", String::from_utf8_lossy(&value));

    db.put(b"language", b"still rust")?;
    let value = db.get(b"language")?;
    println!("language = {}", String::from_utf8_lossy(&value));

    db.delete(b"language")?;
    match db.get(b"language") {
        Err(Error::KeyNotFound) => println!("language deleted"),
        other => println!("unexpected: {other:?}"),
    }

    db.close()?;
    Ok(())
}
