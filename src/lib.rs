//! Fuzzy hashing for near-duplicate detection and similarity triage.
//!
//! This crate implements spamsum/ssdeep-style context-triggered piecewise
//! hashing (CTPH): a compact signature of a byte stream that still matches
//! after small insertions, deletions, or edits, unlike a cryptographic digest
//! which changes completely on any single-bit difference. Signatures use the
//! classic ssdeep text form `"<blocksize>:<part1>:<part2>"` and are
//! bit-compatible with existing ssdeep signature databases.
//!
//! The pipeline:
//!
//! - [`rolling`] — the 7-byte-window rolling checksum that triggers chunk
//!   boundaries ("reset points").
//! - [`generate`] — the streaming signature generator and its block-size
//!   calibration loop ([`hash_bytes`], [`hash_stream`], [`hash_file`]).
//! - [`distance`] — the space-optimized edit distance used as the
//!   similarity metric.
//! - [`compare`] — signature normalization, the common-substring prefilter,
//!   and rescaling into a 0-100 score.
//!
//! # Example
//!
//! ```
//! use spamsum::{compare, hash_bytes, SpamSumSignature};
//!
//! let data: Vec<u8> = (0u32..4096).map(|i| (i * 31 % 251) as u8).collect();
//! let sig = hash_bytes(&data);
//! assert_eq!(compare(&sig, &sig), 100);
//!
//! // Signatures round-trip through the canonical text form.
//! let parsed: SpamSumSignature = sig.to_string().parse().unwrap();
//! assert_eq!(parsed, sig);
//! ```

pub mod compare;
pub mod distance;
pub mod error;
pub mod generate;
pub mod logging;
pub mod rolling;
pub mod signature;

pub use compare::compare;
pub use distance::edit_distance;
pub use error::{Result, SpamSumError};
pub use generate::{hash_bytes, hash_file, hash_stream};
pub use rolling::{RollingState, ROLLING_WINDOW};
pub use signature::SpamSumSignature;
