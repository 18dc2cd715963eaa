//! Streaming signature generation with adaptive block-size calibration.
//!
//! Every input byte feeds both the rolling checksum and two FNV-style
//! accumulators. When the rolling checksum hits a reset point at the current
//! block size, one character of the first signature part is emitted; a
//! second part is emitted the same way at twice the block size, which
//! dampens the effect of edits that land near a block-size boundary. An
//! outer calibration loop guesses the block size from the input length and
//! halves it (re-reading the input from the start) whenever the result comes
//! out too short to compare well.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::error::Result;
use crate::rolling::RollingState;
use crate::signature::SpamSumSignature;

/// Maximum length of the first signature part; the second is half this.
pub const SPAMSUM_LENGTH: usize = 64;

/// Smallest chunking granularity; calibration never goes below this.
pub const MIN_BLOCKSIZE: u32 = 3;

const HASH_PRIME: u32 = 0x0100_0193;
const HASH_INIT: u32 = 0x2802_1967;

const B64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// One step of the non-rolling FNV-style piece hash.
#[inline]
fn sum_hash(c: u8, h: u32) -> u32 {
    h.wrapping_mul(HASH_PRIME) ^ u32::from(c)
}

/// State for one signature computation attempt at a fixed block size.
///
/// Rebuilt from scratch on every calibration retry, never reused.
struct GenerationContext {
    block_size: u32,
    roll: RollingState,
    acc1: u32,
    acc2: u32,
    part1: [u8; SPAMSUM_LENGTH],
    part2: [u8; SPAMSUM_LENGTH / 2],
    j: usize,
    k: usize,
}

impl GenerationContext {
    fn new(block_size: u32) -> Self {
        Self {
            block_size,
            roll: RollingState::new(),
            acc1: HASH_INIT,
            acc2: HASH_INIT,
            part1: [0; SPAMSUM_LENGTH],
            part2: [0; SPAMSUM_LENGTH / 2],
            j: 0,
            k: 0,
        }
    }

    /// Feeds a buffer of input bytes through the rolling and piece hashes.
    fn update(&mut self, buffer: &[u8]) {
        for &c in buffer {
            let h = self.roll.roll(c);
            self.acc1 = sum_hash(c, self.acc1);
            self.acc2 = sum_hash(c, self.acc2);

            if h % self.block_size == self.block_size - 1 {
                // Reset point at granularity B: the piece hash becomes one
                // character of the first part. Once the part is one short
                // of full, the accumulator is deliberately not reset, which
                // merges the rest of the input into the final character and
                // bounds the part at 64 characters.
                self.part1[self.j] = B64[(self.acc1 % 64) as usize];
                if self.j < SPAMSUM_LENGTH - 1 {
                    self.acc1 = HASH_INIT;
                    self.j += 1;
                }
            }

            let double = u64::from(self.block_size) * 2;
            if u64::from(h) % double == double - 1 {
                // Same emission at granularity 2B into the half-length part.
                self.part2[self.k] = B64[(self.acc2 % 64) as usize];
                if self.k < SPAMSUM_LENGTH / 2 - 1 {
                    self.acc2 = HASH_INIT;
                    self.k += 1;
                }
            }
        }
    }

    /// Number of part-1 characters emitted at reset points so far. The
    /// calibration loop halves the block size while this stays under half
    /// the target length.
    fn emitted(&self) -> usize {
        self.j
    }

    /// Closes out the pass and packages the signature.
    fn finish(mut self) -> SpamSumSignature {
        if self.roll.bytes_seen() > 0 {
            // The last piece hit no reset point; flush the live accumulator
            // values as one trailing character on each part.
            self.part1[self.j] = B64[(self.acc1 % 64) as usize];
            self.part2[self.k] = B64[(self.acc2 % 64) as usize];
            SpamSumSignature::new(
                self.block_size,
                self.part1[..=self.j].to_vec(),
                self.part2[..=self.k].to_vec(),
            )
        } else {
            SpamSumSignature::new(self.block_size, Vec::new(), Vec::new())
        }
    }
}

/// Smallest power-of-two multiple of 3 that covers the input at full
/// 64-character resolution.
fn initial_block_size(total_len: u64) -> u32 {
    let mut block_size = MIN_BLOCKSIZE;
    while u64::from(block_size) * (SPAMSUM_LENGTH as u64) < total_len {
        block_size *= 2;
    }
    block_size
}

/// Whether a finished attempt needs a retry at half the block size.
fn needs_retry(block_size: u32, emitted: usize) -> bool {
    block_size > MIN_BLOCKSIZE && emitted < SPAMSUM_LENGTH / 2
}

/// Fuzzy-hashes an in-memory byte slice.
///
/// Deterministic: identical bytes always yield an identical signature. An
/// empty slice hashes to the floor block size with empty parts (`"3::"`).
pub fn hash_bytes(data: &[u8]) -> SpamSumSignature {
    let mut block_size = initial_block_size(data.len() as u64);
    loop {
        let mut ctx = GenerationContext::new(block_size);
        ctx.update(data);
        let emitted = ctx.emitted();
        if needs_retry(block_size, emitted) {
            // The guess was too coarse to fill the signature; re-run the
            // whole input at half the granularity.
            debug!(block_size, emitted, "signature too short, halving block size");
            block_size /= 2;
            continue;
        }
        return ctx.finish();
    }
}

/// Fuzzy-hashes a seekable stream.
///
/// Calibration may need several full passes, so the stream must support
/// re-reading from the start. The position held on entry is restored before
/// returning.
pub fn hash_stream<R: Read + Seek>(stream: &mut R) -> Result<SpamSumSignature> {
    let entry_pos = stream.stream_position()?;
    let total_len = stream.seek(SeekFrom::End(0))?;

    let mut block_size = initial_block_size(total_len);
    let mut buffer = [0u8; 8192];
    let signature = loop {
        stream.seek(SeekFrom::Start(0))?;
        let mut ctx = GenerationContext::new(block_size);
        loop {
            let n = stream.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            ctx.update(&buffer[..n]);
        }
        let emitted = ctx.emitted();
        if needs_retry(block_size, emitted) {
            debug!(block_size, emitted, "signature too short, halving block size");
            block_size /= 2;
            continue;
        }
        break ctx.finish();
    };

    stream.seek(SeekFrom::Start(entry_pos))?;
    Ok(signature)
}

/// Fuzzy-hashes a file through a read-only memory map.
pub fn hash_file<P: AsRef<Path>>(path: P) -> Result<SpamSumSignature> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    debug!(path = %path.display(), size = len, "hashing file");

    // mmap cannot map a zero-length file; an empty input hashes to the
    // floor block size with empty parts either way.
    if len == 0 {
        return Ok(hash_bytes(&[]));
    }

    // Safety: read-only map of a regular file we just opened.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(hash_bytes(&mmap))
}
