//! Sample heap pages from a running process to diagnose leaks informally.
//!
//! The pipeline is strictly sequential: attach (suspending the target), read
//! `/proc/<pid>/maps` into a catalog of heap-like regions, pick one page at
//! random weighted by region size, pread it from `/proc/<pid>/mem`, print a
//! hex/ASCII dump, detach (resuming the target).

pub mod hexdump;
pub mod maps;
pub mod memory;
pub mod sample;
pub mod tracer;

mod error;
pub use error::Error;

/// Assumed memory granularity. It's OK if the real page size is larger.
pub const PAGE_SIZE: u64 = 4096;

/// Bytes dumped per region in walk-all mode.
pub const BLOCK_SIZE: usize = 1024;

/// Rounds an address down to the start of its page.
pub fn page_align(addr: u64) -> u64 {
    addr & !(PAGE_SIZE - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_align_rounds_down_to_page_start() {
        assert_eq!(page_align(0x1000abc0), 0x1000a000);
        assert_eq!(page_align(0x1000afff), 0x1000a000);
    }

    #[test]
    fn page_align_keeps_aligned_addresses() {
        assert_eq!(page_align(0x1000a000), 0x1000a000);
        assert_eq!(page_align(0), 0);
    }
}
