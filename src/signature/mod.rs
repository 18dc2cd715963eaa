//! The spamsum signature value type and its canonical text form.
//!
//! A signature is a chunking block size plus two piecewise hash strings over
//! the 64-character base64 alphabet, the second computed at twice the block
//! size of the first. The text form `"<blocksize>:<part1>:<part2>"` is the
//! classic ssdeep format and is what serde serializes, so signatures interop
//! with existing ssdeep signature databases.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SpamSumError;

/// A fuzzy-hash signature.
///
/// Immutable once constructed, either by the generator or by parsing the
/// text form. Two signatures are equal iff the block size and both hash
/// parts match byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpamSumSignature {
    block_size: u32,
    hash1: Vec<u8>,
    hash2: Vec<u8>,
}

impl SpamSumSignature {
    /// Assembles a signature from its three fields.
    pub fn new(block_size: u32, hash1: Vec<u8>, hash2: Vec<u8>) -> Self {
        Self {
            block_size,
            hash1,
            hash2,
        }
    }

    /// Chunking granularity the signature was generated at.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// First hash part: up to 64 characters emitted at the block size.
    pub fn hash1(&self) -> &[u8] {
        &self.hash1
    }

    /// Second hash part: up to 32 characters emitted at twice the block size.
    pub fn hash2(&self) -> &[u8] {
        &self.hash2
    }
}

impl FromStr for SpamSumSignature {
    type Err = SpamSumError;

    /// Parses the canonical `"<blocksize>:<part1>:<part2>"` form.
    ///
    /// Fails on empty input, a missing `:` separator, or a block size field
    /// that is not a base-10 integer. Part contents are taken as-is:
    /// over-long parts are not a parse error, they surface as a similarity
    /// score of 0 when compared.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SpamSumError::EmptySignature);
        }
        let (block, rest) = s.split_once(':').ok_or(SpamSumError::MissingSeparator)?;
        let (hash1, hash2) = rest.split_once(':').ok_or(SpamSumError::MissingSeparator)?;
        let block_size = block
            .parse::<u32>()
            .map_err(|_| SpamSumError::InvalidBlockSize(block.to_string()))?;
        Ok(Self {
            block_size,
            hash1: hash1.as_bytes().to_vec(),
            hash2: hash2.as_bytes().to_vec(),
        })
    }
}

impl fmt::Display for SpamSumSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.block_size,
            String::from_utf8_lossy(&self.hash1),
            String::from_utf8_lossy(&self.hash2)
        )
    }
}

impl Serialize for SpamSumSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpamSumSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
