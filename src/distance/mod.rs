//! Space-optimized edit distance used as the signature similarity metric.
//!
//! Classic two-row dynamic programming packed into a single circular buffer
//! of `2 * min(n, m) + 3` cells: O(n*m) time, O(min(n, m)) space. Costs are
//! fixed for this alphabet and tuned for signature strings — insert 1,
//! delete 1, substitute 3, transpose adjacent pair 5. Note that with these
//! costs a substitution is never cheaper than a delete plus an insert; the
//! cost table is kept anyway for fidelity with the scoring it calibrates.
//!
//! A per-row minimum is tracked and the computation abandoned once a full
//! row stays above [`MIN_DIST`]; past that point the exact distance no
//! longer matters to any caller.

const INSERT_COST: u32 = 1;
const DELETE_COST: u32 = 1;
const CHANGE_COST: u32 = 3;
const SWAP_COST: u32 = 5;

/// Early-exit cutoff. Any value returned above this means "very dissimilar"
/// and must not be read as an exact distance.
const MIN_DIST: u32 = 100;

#[inline]
fn min2(a: u32, b: u32) -> u32 {
    a.min(b)
}

#[inline]
fn min3(a: u32, b: u32, c: u32) -> u32 {
    a.min(b).min(c)
}

/// Matrix cell lookup through the circular buffer.
///
/// Row 0 and column 0 are never materialized; their values are computed on
/// demand from the edge costs. `x` and `y` are matrix coordinates (string
/// index + 1), `index` an unreduced buffer position.
#[inline]
fn cell(buffer: &[u32], radix: usize, x: usize, y: usize, index: usize) -> u32 {
    if x == 0 {
        y as u32 * DELETE_COST
    } else if y == 0 {
        x as u32 * INSERT_COST
    } else {
        buffer[index % radix]
    }
}

/// Minimum-cost edit distance between two byte strings.
///
/// Symmetric in its arguments (insert and delete cost the same). An empty
/// side costs the other side's length. Values above 100 are approximate;
/// see the module docs.
pub fn edit_distance(from: &[u8], to: &[u8]) -> u32 {
    if from.is_empty() {
        return to.len() as u32 * INSERT_COST;
    }
    if to.is_empty() {
        return from.len() as u32 * DELETE_COST;
    }

    // Keep the shorter string on the `from` side so the buffer is sized by
    // min(n, m). Symmetric insert/delete costs make the swap free.
    let (from, to) = if from.len() > to.len() {
        (to, from)
    } else {
        (from, to)
    };
    let from_len = from.len();
    let to_len = to.len();

    // One extra cell beyond the two conceptual rows: the transposition
    // check reads a cell that a plain two-row layout would already have
    // overwritten.
    let radix = 2 * from_len + 3;
    let mut buffer = vec![0u32; radix];
    let mut index = 0usize;

    // Row 1, with row 0 implicit (its value at column x is x * DELETE_COST).
    // No transpositions are possible yet.
    buffer[index] = min2(
        INSERT_COST + DELETE_COST,
        if from[0] == to[0] { 0 } else { CHANGE_COST },
    );
    let mut low = buffer[index];
    index += 1;
    for col in 1..from_len {
        buffer[index] = min3(
            col as u32 * DELETE_COST + if from[col] == to[0] { 0 } else { CHANGE_COST },
            (col as u32 + 1) * DELETE_COST + INSERT_COST,
            buffer[index - 1] + DELETE_COST,
        );
        if buffer[index] < low {
            low = buffer[index];
        }
        index += 1;
    }

    // Remaining rows. `index` always points at the next cell to write; the
    // north-west, north, west, and transposition neighbors sit at fixed
    // circular offsets from it.
    for row in 1..to_len {
        for col in 0..from_len {
            let nw = cell(&buffer, radix, row, col, index + from_len + 2);
            let n = cell(&buffer, radix, row, col + 1, index + from_len + 3);
            let w = cell(&buffer, radix, row + 1, col, index + radix - 1);

            let mut value = min3(
                nw + if from[col] == to[row] { 0 } else { CHANGE_COST },
                n + INSERT_COST,
                w + DELETE_COST,
            );
            if col > 0 && from[col] == to[row - 1] && from[col - 1] == to[row] {
                let nnww = cell(&buffer, radix, row - 1, col - 1, index + 1);
                value = min2(value, nnww + SWAP_COST);
            }

            buffer[index] = value;
            if value < low || col == 0 {
                low = value;
            }
            index = (index + 1) % radix;
        }

        // Row minima never decrease across rows by more than the edge costs
        // recover; once a whole row exceeds the cutoff the final distance
        // cannot come back under it.
        if low > MIN_DIST {
            break;
        }
    }

    buffer[(index + radix - 1) % radix]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_zero() {
        assert_eq!(edit_distance(b"", b""), 0);
        assert_eq!(edit_distance(b"a", b"a"), 0);
        assert_eq!(edit_distance(b"abc", b"abc"), 0);
        assert_eq!(edit_distance(b"0123456789abcdef", b"0123456789abcdef"), 0);
    }

    #[test]
    fn test_empty_side_costs_length() {
        assert_eq!(edit_distance(b"", b"abc"), 3);
        assert_eq!(edit_distance(b"abcd", b""), 4);
    }

    #[test]
    fn test_single_insert_and_delete() {
        assert_eq!(edit_distance(b"hello", b"hhello"), 1);
        assert_eq!(edit_distance(b"hhello", b"hello"), 1);
    }

    #[test]
    fn test_substitution_priced_as_delete_plus_insert() {
        // change_cost is 3, but delete + insert is 2, so a one-character
        // difference costs 2.
        assert_eq!(edit_distance(b"abc", b"abd"), 2);
        assert_eq!(edit_distance(b"ab", b"ba"), 2);
    }

    #[test]
    fn test_symmetry() {
        let pairs: &[(&[u8], &[u8])] = &[
            (b"kitten", b"sitting"),
            (b"flaw", b"lawn"),
            (b"", b"xyz"),
            (b"aabbcc", b"abcabc"),
        ];
        for (a, b) in pairs {
            assert_eq!(edit_distance(a, b), edit_distance(b, a));
        }
    }

    #[test]
    fn test_disjoint_strings_cost_sum_of_lengths() {
        // No common characters, substitution priced out: the cheapest edit
        // deletes one string and inserts the other.
        assert_eq!(edit_distance(b"aaaa", b"bbbb"), 8);
        assert_eq!(edit_distance(b"abcde", b"vwxyz"), 10);
    }

    #[test]
    fn test_early_exit_reports_dissimilar() {
        // Disjoint alphabets, lengths 64 and 200: the exact distance is 264,
        // and whether or not the cutoff fires first, the result must stay
        // above the threshold.
        let from = vec![b'a'; 64];
        let to = vec![b'b'; 200];
        assert!(edit_distance(&from, &to) > 100);
        assert!(edit_distance(&to, &from) > 100);
    }
}
