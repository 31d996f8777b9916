//! Bonnie-style I/O stress on one shared file.
//!
//! Setup runs the classic sequential phases (byte writes, chunk rewrites,
//! chunk writes, byte reads with verification, chunk reads). The race then
//! has every thread seek to random blocks of the same file, reading each
//! one and periodically writing it back with its last byte flipped.

use crate::classify::{Pattern, Verdict};
use crate::scratch::Scratch;
use crate::slots::ResultSlots;
use crate::suite::{Suite, SuiteEnv};
use mtfs_core::{Bonnie64Params, Errno, Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

const TARGET: &str = "mtfs::bonnie64";

/// Every thread hammers one file with random block reads and rewrites.
///
/// Passes when every thread finishes all iterations without an I/O error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bonnie64Suite;

/// Per-run state for [`Bonnie64Suite`].
#[derive(Debug)]
pub struct Bonnie64Context {
    /// Per-run directory holding the file
    pub scratch: Scratch,
    /// The shared file
    pub file: PathBuf,
    /// Sizes and iteration counts
    pub params: Bonnie64Params,
    /// First failure per thread, or success
    pub results: ResultSlots<Errno>,
}

fn open_rw(path: &Path) -> io::Result<File> {
    OpenOptions::new().read(true).write(true).open(path)
}

fn write_bytes(path: &Path, size: u64) -> io::Result<()> {
    let file = open_rw(path)?;
    let mut out = BufWriter::new(&file);
    for _ in 0..size {
        out.write_all(b"A")?;
    }
    out.flush()?;
    drop(out);
    file.sync_all()
}

fn rewrite_chunks(path: &Path, buffer_size: usize) -> io::Result<()> {
    let mut file = open_rw(path)?;
    let mut buffer = vec![0u8; buffer_size];
    loop {
        let got = file.read(&mut buffer)?;
        if got == 0 {
            break;
        }
        buffer[got - 1] ^= b'J';
        file.seek(SeekFrom::Current(-(got as i64)))?;
        file.write_all(&buffer[..got])?;
    }
    file.sync_all()
}

fn write_chunks(path: &Path, size: u64, buffer_size: usize) -> io::Result<()> {
    let mut file = open_rw(path)?;
    let buffer = vec![b'X'; buffer_size];
    let mut remaining = size;
    while remaining > 0 {
        let len = remaining.min(buffer_size as u64) as usize;
        file.write_all(&buffer[..len])?;
        remaining -= len as u64;
    }
    file.sync_all()
}

fn verify_bytes(path: &Path, size: u64) -> io::Result<()> {
    let mut input = BufReader::new(File::open(path)?);
    let mut byte = [0u8; 1];
    for offset in 0..size {
        input.read_exact(&mut byte)?;
        if byte[0] != b'X' {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected 'X' at offset {}, got {:#04x}", offset, byte[0]),
            ));
        }
    }
    Ok(())
}

fn read_chunks(path: &Path, buffer_size: usize) -> io::Result<u64> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0u8; buffer_size];
    let mut total = 0u64;
    loop {
        match file.read(&mut buffer)? {
            0 => return Ok(total),
            n => total += n as u64,
        }
    }
}

fn prepare(path: &Path, params: &Bonnie64Params) -> Result<()> {
    let phase = |what: &str, e: io::Error| Error::io(format!("{} {}", what, path.display()), e);

    debug!(target: TARGET, size = params.file_size, "writing one byte at a time");
    write_bytes(path, params.file_size).map_err(|e| phase("writing bytes to", e))?;

    debug!(target: TARGET, "reading and rewriting chunks");
    rewrite_chunks(path, params.buffer_size).map_err(|e| phase("rewriting chunks of", e))?;

    debug!(target: TARGET, "writing over chunks");
    write_chunks(path, params.file_size, params.buffer_size)
        .map_err(|e| phase("writing chunks to", e))?;

    debug!(target: TARGET, "reading one byte at a time");
    verify_bytes(path, params.file_size).map_err(|e| phase("verifying", e))?;

    debug!(target: TARGET, "reading chunks");
    let read = read_chunks(path, params.buffer_size).map_err(|e| phase("reading chunks of", e))?;

    debug!(target: TARGET, bytes = read, "setup done");
    Ok(())
}

/// Random block reads, rewriting every `update_every`-th block read.
fn stress(path: &Path, params: &Bonnie64Params, id: usize) -> io::Result<()> {
    let mut file = open_rw(path)?;
    let mut rng = StdRng::seed_from_u64(id as u64);
    let mut buffer = vec![0u8; params.buffer_size];
    let blocks = params.block_count();

    for iteration in 0..params.iterations {
        let offset = rng.gen_range(0..blocks) * params.buffer_size as u64;
        file.seek(SeekFrom::Start(offset))?;
        let got = file.read(&mut buffer)?;
        if got == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("nothing to read at offset {}", offset),
            ));
        }
        if iteration % params.update_every == 0 {
            buffer[got - 1] ^= b'Z';
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(&buffer[..got])?;
        }
    }
    Ok(())
}

impl Suite for Bonnie64Suite {
    type Context = Bonnie64Context;

    fn name(&self) -> &'static str {
        "bonnie64_mt"
    }

    fn setup(&self, env: &SuiteEnv<'_>) -> Result<Bonnie64Context> {
        let params = env.params.bonnie64.clone();
        params.validate()?;

        let scratch = Scratch::create(&env.params.work_dir, self.name())?;
        let file = scratch.join("data");
        File::create(&file).map_err(|e| Error::io(format!("creating {}", file.display()), e))?;
        prepare(&file, &params)?;

        let results = ResultSlots::new(env.thread_count)?;
        Ok(Bonnie64Context {
            scratch,
            file,
            params,
            results,
        })
    }

    fn action(&self, ctx: &Bonnie64Context, id: usize) -> Result<()> {
        let outcome = stress(&ctx.file, &ctx.params, id);
        if let Err(e) = &outcome {
            error!(suite = self.name(), thread = id, error = %e, "stress loop failed");
        }
        ctx.results.record(id, Errno::of(&outcome))?;
        Ok(())
    }

    fn aggregate(&self, ctx: &Bonnie64Context) -> Result<Option<Verdict>> {
        Ok(Some(Pattern::BulkConsistency.classify(ctx.results.codes())))
    }

    fn teardown(&self, ctx: Bonnie64Context) -> Result<()> {
        ctx.scratch.close()
    }
}
