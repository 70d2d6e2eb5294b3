use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use nix::unistd::Pid;
use thiserror::Error;

/// Failures of the sampling pipeline. Every variant carries the underlying
/// OS diagnostic; none are retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not attach to process {pid}: {source}")]
    Attach { pid: Pid, source: Errno },

    #[error("could not confirm that process {pid} stopped: {source}")]
    Wait { pid: Pid, source: Errno },

    #[error("could not detach from process {pid}: {source}")]
    Detach { pid: Pid, source: Errno },

    #[error("could not open {}: {source}", path.display())]
    OpenMaps { path: PathBuf, source: io::Error },

    #[error("could not read {}: {source}", path.display())]
    ReadMaps { path: PathBuf, source: io::Error },

    #[error("could not open {}: {source}", path.display())]
    OpenMem { path: PathBuf, source: io::Error },

    #[error("could not read {len} bytes at {offset:#x}: {source}")]
    ReadBlock {
        offset: u64,
        len: usize,
        source: io::Error,
    },
}
