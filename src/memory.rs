//! Positioned reads from the target's address space via `/proc/<pid>/mem`.

use std::fs::File;
use std::os::unix::fs::FileExt;
use std::path::PathBuf;

use nix::unistd::Pid;

use crate::Error;

/// Read-only handle on the target's memory. Reads only succeed while the
/// target is attached and stopped (except for our own process).
pub struct ProcessMemory {
    file: File,
}

impl ProcessMemory {
    pub fn open(pid: Pid) -> Result<Self, Error> {
        let path = PathBuf::from(format!("/proc/{pid}/mem"));
        let file = File::open(&path).map_err(|source| Error::OpenMem { path, source })?;
        Ok(Self { file })
    }

    /// One pread of `len` bytes at the absolute address `offset`. Fails if
    /// the offset is unmapped or the target went away; the caller owns the
    /// returned buffer.
    pub fn read_block(&self, offset: u64, len: usize) -> Result<Vec<u8>, Error> {
        let mut buffer = vec![0u8; len];
        self.file
            .read_exact_at(&mut buffer, offset)
            .map_err(|source| Error::ReadBlock {
                offset,
                len,
                source,
            })?;
        Ok(buffer)
    }
}
