//! Standard file-backed IO.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::IoManager;
use crate::error::Result;

/// Permissions for newly created data files (Unix only).
#[cfg(unix)]
const DATA_FILE_PERM: u32 = 0o644;

/// [`IoManager`] backed by a regular file opened for read + append.
///
/// Appends go through the kernel's append mode, so they are atomic with
/// respect to concurrent appends on the same handle. The descriptor is
/// released when the value is dropped.
pub(crate) struct FileIo {
    fd: File,
}

impl FileIo {
    pub(crate) fn new(path: &Path) -> Result<Self> {
        let mut opts = OpenOptions::new();
        opts.create(true).read(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(DATA_FILE_PERM);
        }
        Ok(Self { fd: opts.open(path)? })
    }

    #[cfg(unix)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;
        self.fd.read_at(buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        use std::os::windows::fs::FileExt;
        self.fd.seek_read(buf, offset)
    }
}

impl IoManager for FileIo {
    fn read(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        // A single positioned read may return short even in the middle of a
        // file, so keep reading until the buffer is full or the file ends.
        let mut nread = 0;
        while nread < buf.len() {
            match self.read_at(&mut buf[nread..], offset + nread as u64) {
                Ok(0) => break,
                Ok(n) => nread += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(nread)
    }

    fn write(&self, buf: &[u8]) -> Result<usize> {
        let mut fd = &self.fd;
        fd.write_all(buf)?;
        Ok(buf.len())
    }

    fn sync(&self) -> Result<()> {
        self.fd.sync_all()?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        // The descriptor itself is closed on drop; make sure nothing is
        // still sitting in the kernel before that happens.
        self.fd.sync_all()?;
        Ok(())
    }

    fn size(&self) -> Result<u64> {
        Ok(self.fd.metadata()?.len())
    }
}
