//! Suspends and resumes the target process around the memory read.
//!
//! Reading `/proc/<pid>/mem` of another process requires it to be ptrace'd
//! and stopped. [`TraceGuard`] guarantees that every successful attach is
//! paired with exactly one detach, on success and error paths alike, so a
//! failure partway through the pipeline never leaves the target suspended.

use nix::sys::ptrace;
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::warn;

use crate::Error;

pub trait Tracer {
    fn attach(&self, pid: Pid) -> Result<(), Error>;
    fn detach(&self, pid: Pid) -> Result<(), Error>;
}

/// Stops the target with PTRACE_ATTACH and resumes it with SIGCONT.
pub struct PtraceTracer;

impl Tracer for PtraceTracer {
    fn attach(&self, pid: Pid) -> Result<(), Error> {
        ptrace::attach(pid).map_err(|source| Error::Attach { pid, source })?;
        match waitpid(pid, None) {
            Ok(WaitStatus::Stopped(_, _)) => Ok(()),
            Ok(status) => {
                warn!(?status, "process signalled but not as intended, reading anyway");
                Ok(())
            }
            Err(source) => {
                // the attach already succeeded, so resume before bailing out
                if let Err(err) = ptrace::detach(pid, Signal::SIGCONT) {
                    warn!(%err, "detach failed, target may remain stopped");
                }
                Err(Error::Wait { pid, source })
            }
        }
    }

    fn detach(&self, pid: Pid) -> Result<(), Error> {
        ptrace::detach(pid, Signal::SIGCONT).map_err(|source| Error::Detach { pid, source })
    }
}

/// Scoped attach: holds the target stopped, detaches on drop.
pub struct TraceGuard<'t, T: Tracer> {
    tracer: &'t T,
    pid: Pid,
}

impl<'t, T: Tracer> TraceGuard<'t, T> {
    pub fn attach(tracer: &'t T, pid: Pid) -> Result<Self, Error> {
        tracer.attach(pid)?;
        Ok(Self { tracer, pid })
    }
}

impl<T: Tracer> Drop for TraceGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.tracer.detach(self.pid) {
            warn!(%err, "detach failed, target may remain stopped");
        }
    }
}
