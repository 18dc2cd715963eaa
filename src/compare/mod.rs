//! Signature comparison and similarity scoring.
//!
//! Two signatures are compared by normalizing their hash parts (collapsing
//! low-information runs), requiring a shared window-length substring as a
//! cheap false-positive filter, then rescaling the edit distance between the
//! parts into a 0-100 score. Signatures whose block sizes are not equal or
//! related by doubling simply cannot be compared; that scores 0 and is not
//! an error.

use crate::distance::edit_distance;
use crate::generate::{MIN_BLOCKSIZE, SPAMSUM_LENGTH};
use crate::rolling::{RollingState, ROLLING_WINDOW};
use crate::signature::SpamSumSignature;

/// Collapses runs of more than three identical characters down to three.
///
/// Long runs carry very little information and would bias the edit distance
/// unfairly, especially in combination with the common-substring filter.
fn eliminate_sequences(s: &[u8]) -> Vec<u8> {
    if s.len() <= 3 {
        return s.to_vec();
    }
    let mut out = Vec::with_capacity(s.len());
    out.extend_from_slice(&s[..3]);
    for i in 3..s.len() {
        if s[i] != s[i - 1] || s[i] != s[i - 2] || s[i] != s[i - 3] {
            out.push(s[i]);
        }
    }
    out
}

/// Tests for a common substring of at least [`ROLLING_WINDOW`] bytes.
///
/// Re-uses the rolling hash as a filter: windowed hashes of `s1` at every
/// offset, then a rolling scan of `s2` looking for collisions, each
/// confirmed by a direct comparison. Both inputs are at most
/// [`SPAMSUM_LENGTH`] bytes (guarded by the caller).
fn has_common_substring(s1: &[u8], s2: &[u8]) -> bool {
    let mut hashes = [0u32; SPAMSUM_LENGTH];
    let mut state = RollingState::new();
    for (i, &c) in s1.iter().enumerate() {
        hashes[i] = state.roll(c);
    }
    let num_hashes = s1.len();

    state.reset();
    for (i, &c) in s2.iter().enumerate() {
        let h = state.roll(c);
        if i + 1 < ROLLING_WINDOW {
            continue;
        }
        let start2 = i + 1 - ROLLING_WINDOW;
        for j in (ROLLING_WINDOW - 1)..num_hashes {
            if hashes[j] != 0 && hashes[j] == h {
                // Candidate collision; confirm it directly.
                let start1 = j + 1 - ROLLING_WINDOW;
                if s1[start1..start1 + ROLLING_WINDOW] == s2[start2..start2 + ROLLING_WINDOW] {
                    return true;
                }
            }
        }
    }
    false
}

/// Scores two normalized hash parts on a 0-100 scale.
///
/// The block size dampens the score for very small inputs, where a tiny
/// signature could otherwise look like a strong match.
fn score_strings(s1: &[u8], s2: &[u8], block_size: u32) -> u32 {
    let len1 = s1.len();
    let len2 = s2.len();

    if len1 > SPAMSUM_LENGTH || len2 > SPAMSUM_LENGTH {
        // Not a real spamsum part; refuse to score rather than error.
        return 0;
    }

    // The parts must share a window-length substring to be candidates at
    // all. This drops the false-positive rate dramatically while barely
    // affecting true matches.
    if !has_common_substring(s1, s2) {
        return 0;
    }

    // Scale the edit distance by the combined length, turning it into a
    // measure of the changed proportion rather than an absolute count.
    let mut score = edit_distance(s1, s2) * SPAMSUM_LENGTH as u32 / (len1 + len2) as u32;

    // Roughly 0-64 at this point; rescale to 0-100.
    score = 100 * score / 64;

    // Above 100 is possible here, but only for a terrible match.
    if score >= 100 {
        return 0;
    }

    // Flip so 100 is a perfect match.
    score = 100 - score;

    // Small block sizes must not exaggerate tiny matches.
    let cap = u64::from(block_size / MIN_BLOCKSIZE) * len1.min(len2) as u64;
    if u64::from(score) > cap {
        score = cap as u32;
    }
    score
}

/// Compares two signatures, returning a similarity score in `[0, 100]`.
///
/// Each signature carries hashes at two granularities (B and 2B), so two
/// signatures are comparable when their block sizes are equal or differ by
/// exactly a factor of two; the matching pair of parts is scored. Anything
/// else returns 0 — a legitimate "cannot compare", not an error.
pub fn compare(signature1: &SpamSumSignature, signature2: &SpamSumSignature) -> u32 {
    let block_size1 = signature1.block_size();
    let block_size2 = signature2.block_size();

    if block_size1 != block_size2
        && block_size1 != block_size2.wrapping_mul(2)
        && block_size2 != block_size1.wrapping_mul(2)
    {
        return 0;
    }

    let s1_1 = eliminate_sequences(signature1.hash1());
    let s1_2 = eliminate_sequences(signature1.hash2());
    let s2_1 = eliminate_sequences(signature2.hash1());
    let s2_2 = eliminate_sequences(signature2.hash2());

    if block_size1 == block_size2 {
        // Same granularity on both sides: score both pairs and keep the
        // better one.
        let score1 = score_strings(&s1_1, &s2_1, block_size1);
        let score2 = score_strings(&s1_2, &s2_2, block_size2);
        score1.max(score2)
    } else if block_size1 == block_size2.wrapping_mul(2) {
        score_strings(&s1_1, &s2_2, block_size1)
    } else {
        score_strings(&s1_2, &s2_1, block_size2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(text: &str) -> SpamSumSignature {
        text.parse().unwrap()
    }

    #[test]
    fn test_eliminate_sequences_collapses_long_runs() {
        assert_eq!(eliminate_sequences(b"aaaaaaab"), b"aaab");
        assert_eq!(eliminate_sequences(b"xaaaaay"), b"xaaay");
        assert_eq!(eliminate_sequences(b"aaaabbbb"), b"aaabbb");
    }

    #[test]
    fn test_eliminate_sequences_keeps_short_runs() {
        assert_eq!(eliminate_sequences(b"aaab"), b"aaab");
        assert_eq!(eliminate_sequences(b"abcabc"), b"abcabc");
        assert_eq!(eliminate_sequences(b"aa"), b"aa");
        assert_eq!(eliminate_sequences(b""), b"");
    }

    #[test]
    fn test_common_substring_found() {
        assert!(has_common_substring(b"ABCDEFG", b"ABCDEFG"));
        assert!(has_common_substring(b"xxABCDEFGxx", b"yyyABCDEFGy"));
    }

    #[test]
    fn test_common_substring_requires_full_window() {
        // Six shared characters are one short of the window.
        assert!(!has_common_substring(b"ABCDEF", b"ABCDEF"));
        assert!(!has_common_substring(b"xxABCDEFxx", b"yyABCDEFyy"));
        assert!(!has_common_substring(b"abcdefghijk", b"ABCDEFGHIJK"));
        assert!(!has_common_substring(b"", b"ABCDEFG"));
    }

    #[test]
    fn test_score_identical_strings() {
        assert_eq!(score_strings(b"mNoPqRsTuV", b"mNoPqRsTuV", 96), 100);
    }

    #[test]
    fn test_score_caps_at_small_block_size() {
        // Identical 10-character parts, but at the floor block size the cap
        // is (3/3) * 10 = 10.
        assert_eq!(score_strings(b"mNoPqRsTuV", b"mNoPqRsTuV", 3), 10);
    }

    #[test]
    fn test_score_rejects_overlong_parts() {
        let long = vec![b'A'; SPAMSUM_LENGTH + 1];
        assert_eq!(score_strings(&long, b"ABCDEFG", 96), 0);
        assert_eq!(score_strings(b"ABCDEFG", &long, 96), 0);
    }

    #[test]
    fn test_score_rejects_no_common_substring() {
        assert_eq!(score_strings(b"abcdefghij", b"KLMNOPQRST", 96), 0);
    }

    #[test]
    fn test_compare_incompatible_block_sizes() {
        assert_eq!(compare(&sig("3:ABCDEFGH:ABCD"), &sig("12:ABCDEFGH:ABCD")), 0);
        assert_eq!(compare(&sig("96:ABCDEFGH:ABCD"), &sig("3:ABCDEFGH:ABCD")), 0);
    }

    #[test]
    fn test_compare_equal_block_sizes_takes_best_pair() {
        // part1 scores 100 (identical, long enough, cap 32*10 at B=96);
        // part2 is too short for the substring filter and scores 0.
        let a = sig("96:mNoPqRsTuV:ABC");
        let b = sig("96:mNoPqRsTuV:XYZ");
        assert_eq!(compare(&a, &b), 100);
    }

    #[test]
    fn test_compare_doubling_relation_crosses_parts() {
        // bs2 == 2 * bs1, so part2 of the first signature is compared
        // against part1 of the second at block size 12: identical
        // 10-character parts score 100, then cap (12/3) * 10 = 40.
        let a = sig("6:ABCDEFGHIJ:KLMNOPQRST");
        let b = sig("12:KLMNOPQRST:ABCDEFGHIJ");
        assert_eq!(compare(&a, &b), 40);
    }

    #[test]
    fn test_compare_small_self_match_is_damped_but_positive() {
        let a = sig("3:ABCDEFGHIJ:ABCDE");
        let score = compare(&a, &a);
        assert!(score > 0);
        assert_eq!(score, 10);
    }

    #[test]
    fn test_compare_run_collapse_aligns_padded_parts() {
        // The runs collapse to the same normalized string, so these score
        // as identical despite different run lengths.
        let a = sig("96:QRSTUVWXaaaaaaaa:ABC");
        let b = sig("96:QRSTUVWXaaaa:ABC");
        assert_eq!(compare(&a, &b), 100);
    }
}
