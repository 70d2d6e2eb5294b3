use std::io::{self, Write};
use std::process;

use anyhow::Context;
use clap::Parser;
use nix::unistd::Pid;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use heapdice::maps::RegionCatalog;
use heapdice::memory::ProcessMemory;
use heapdice::tracer::{PtraceTracer, TraceGuard};
use heapdice::{BLOCK_SIZE, PAGE_SIZE, hexdump, page_align, sample};

/// Dump sampled heap pages from a running process to diagnose leaks.
///
/// The target is suspended for the duration of the read and resumed
/// afterwards; only use this on processes you control.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Process id of the target
    pid: i32,

    /// Dump the page containing this hex address instead of sampling
    #[arg(value_parser = parse_hex_addr)]
    address: Option<u64>,

    /// Dump the first block of every heap-like region instead of sampling
    #[arg(long, conflicts_with = "address")]
    all: bool,

    /// Sampler seed; defaults to this process's pid
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_hex_addr(arg: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(arg.trim_start_matches("0x"), 16)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprint!("{err}");
            process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("heapdice: {err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let pid = Pid::from_raw(cli.pid);
    let tracer = PtraceTracer;
    let _guard = TraceGuard::attach(&tracer, pid)?;
    let mem = ProcessMemory::open(pid)?;
    let mut out = io::stdout().lock();

    if let Some(address) = cli.address {
        let offset = page_align(address);
        let block = mem.read_block(offset, PAGE_SIZE as usize)?;
        hexdump::write_dump(&mut out, offset, &block)?;
        return Ok(());
    }

    let catalog = RegionCatalog::for_pid(pid)?;
    if catalog.total_pages() == 0 {
        eprintln!("This process appears to have no heap?");
        return Ok(());
    }

    if cli.all {
        for region in catalog.regions() {
            writeln!(
                out,
                "{:08x} {} bytes ({} pages)",
                region.base_address,
                region.byte_size(),
                region.page_count
            )?;
            let block = mem.read_block(region.base_address, BLOCK_SIZE)?;
            hexdump::write_dump(&mut out, region.base_address, &block)?;
        }
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(|| u64::from(process::id()));
    let mut rng = StdRng::seed_from_u64(seed);
    let offset =
        sample::pick_offset(&catalog, &mut rng).context("no sampleable pages in catalog")?;
    let block = mem.read_block(offset, PAGE_SIZE as usize)?;
    hexdump::write_dump(&mut out, offset, &block)?;
    Ok(())
}
