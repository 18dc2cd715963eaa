//! Rolling checksum that drives piecewise chunking.
//!
//! An Adler-style rolling hash over a fixed 7-byte window: `h1` is the plain
//! sum of the window bytes, `h2` the position-weighted sum, and `h3` a
//! shift/xor accumulator over the entire stream so far, which keeps the
//! checksum responsive at large block sizes. Because the hash rolls, the
//! chunker resynchronizes on its own after inserts and deletes.

/// Width of the rolling window in bytes.
pub const ROLLING_WINDOW: usize = 7;

/// State for the fixed-window rolling checksum.
///
/// Transient and owned by a single streaming pass: create one, feed every
/// input byte through [`RollingState::roll`], and discard it with the pass.
#[derive(Debug, Clone, Default)]
pub struct RollingState {
    window: [u8; ROLLING_WINDOW],
    h1: u32,
    h2: u32,
    h3: u32,
    n: u64,
}

impl RollingState {
    /// Creates a fresh all-zero state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one byte and returns the updated checksum.
    ///
    /// All arithmetic is wrapping u32; the left shift of `h3` sheds high
    /// bits on purpose. Never allocates — this runs once per input byte.
    #[inline]
    pub fn roll(&mut self, c: u8) -> u32 {
        let byte = u32::from(c);
        let slot = (self.n % ROLLING_WINDOW as u64) as usize;

        // h2 folds in the old window sum before h1 is updated.
        self.h2 = self.h2.wrapping_sub(self.h1);
        self.h2 = self.h2.wrapping_add(ROLLING_WINDOW as u32 * byte);

        self.h1 = self.h1.wrapping_add(byte);
        self.h1 = self.h1.wrapping_sub(u32::from(self.window[slot]));

        self.window[slot] = c;
        self.n += 1;

        self.h3 <<= 5;
        self.h3 ^= byte;

        self.h1.wrapping_add(self.h2).wrapping_add(self.h3)
    }

    /// Number of bytes processed since construction or the last reset.
    #[inline]
    pub fn bytes_seen(&self) -> u64 {
        self.n
    }

    /// Resets to the all-zero initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
