//! Builds the catalog of heap-like regions from `/proc/<pid>/maps`.
//!
//! A region qualifies as a heap candidate iff it is anonymous (inode 0),
//! mapped exactly read+write+private, and larger than one page. Everything
//! else (file-backed segments, executable mappings, guard pages) is skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use nix::unistd::Pid;
use tracing::{debug, trace};

use crate::{Error, PAGE_SIZE};

/// Truncation policy: once this many regions qualify, enumeration stops and
/// sampling is biased toward regions discovered first.
pub const MAX_REGIONS: usize = 2000;

/// One candidate heap mapping inside the target process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub base_address: u64,
    pub page_count: u64,
}

impl MemoryRegion {
    pub fn byte_size(&self) -> u64 {
        self.page_count * PAGE_SIZE
    }

    pub fn contains(&self, offset: u64) -> bool {
        offset >= self.base_address && offset < self.base_address + self.byte_size()
    }
}

/// Ordered heap-candidate regions plus their total page count. Built once
/// per run, read-only afterward.
#[derive(Debug)]
pub struct RegionCatalog {
    regions: Vec<MemoryRegion>,
    total_pages: u64,
}

impl RegionCatalog {
    pub fn for_pid(pid: Pid) -> Result<Self, Error> {
        let path = PathBuf::from(format!("/proc/{pid}/maps"));
        let file = File::open(&path).map_err(|source| Error::OpenMaps {
            path: path.clone(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
            .map_err(|source| Error::ReadMaps { path, source })
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut regions = Vec::new();
        let mut total_pages = 0;
        for line in reader.lines() {
            let line = line?;
            let Some(record) = MapRecord::parse(&line) else {
                debug!(line = %line, "skipping unparsable maps record");
                continue;
            };
            if !record.is_heap_candidate() {
                continue;
            }
            trace!(
                dev_major = record.dev_major,
                dev_minor = record.dev_minor,
                offset = record.offset,
                path = record.path.as_deref().unwrap_or(""),
                "heap candidate {:x}-{:x}",
                record.start,
                record.end,
            );
            let region = MemoryRegion {
                base_address: record.start,
                page_count: (record.end - record.start) / PAGE_SIZE,
            };
            total_pages += region.page_count;
            regions.push(region);
            if regions.len() >= MAX_REGIONS {
                break;
            }
        }
        Ok(Self {
            regions,
            total_pages,
        })
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }
}

/// One parsed `/proc/<pid>/maps` record:
/// `<start>-<end> <perms> <offset> <major>:<minor> <inode> [path]`.
#[derive(Debug, PartialEq, Eq)]
struct MapRecord {
    start: u64,
    end: u64,
    perms: String,
    offset: u64,
    dev_major: u32,
    dev_minor: u32,
    inode: u64,
    path: Option<String>,
}

impl MapRecord {
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let (start, end) = fields.next()?.split_once('-')?;
        let start = u64::from_str_radix(start, 16).ok()?;
        let end = u64::from_str_radix(end, 16).ok()?;
        if end <= start {
            return None;
        }
        let perms = fields.next()?;
        if perms.len() != 4 {
            return None;
        }
        let offset = u64::from_str_radix(fields.next()?, 16).ok()?;
        let (major, minor) = fields.next()?.split_once(':')?;
        let dev_major = u32::from_str_radix(major, 16).ok()?;
        let dev_minor = u32::from_str_radix(minor, 16).ok()?;
        let inode = fields.next()?.parse().ok()?;
        // the path may itself contain spaces
        let rest: Vec<&str> = fields.collect();
        let path = if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        };
        Some(Self {
            start,
            end,
            perms: perms.to_owned(),
            offset,
            dev_major,
            dev_minor,
            inode,
            path,
        })
    }

    fn is_heap_candidate(&self) -> bool {
        self.inode == 0 && self.perms == "rw-p" && self.end - self.start > PAGE_SIZE
    }
}
