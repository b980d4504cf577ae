//! Pixel-pair capacity table.
//!
//! Maps the absolute difference of a pixel pair to the number of bits that
//! pair may carry. Smooth regions (small differences) carry fewer bits than
//! edges, where changes are less visible.

/// Capacity ranges as `(lower_bound, bits)`, ascending by lower bound.
/// Each range extends up to the next lower bound (the last one to 255).
const RANGES: [(u8, u8); 5] = [(0, 1), (16, 2), (32, 3), (64, 4), (128, 5)];

/// Largest number of bits any pair can carry.
pub const MAX_PAIR_BITS: u8 = 5;

fn range_of(diff: u8) -> (u8, u8) {
    RANGES
        .iter()
        .rev()
        .copied()
        .find(|&(lower, _)| diff >= lower)
        .unwrap_or(RANGES[0])
}

/// Number of bits a pair with difference `diff` can carry.
pub fn capacity(diff: u8) -> u8 {
    range_of(diff).1
}

/// Lower bound of the capacity range containing `diff`.
///
/// Every range is at least `2^capacity` wide, so `lower + value` stays in the
/// same range for any `capacity`-bit `value`.
pub fn range_lower_bound(diff: u8) -> u8 {
    range_of(diff).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        let diffs = [15u8, 16, 31, 32, 63, 64, 127, 128];
        let expected = [1u8, 2, 2, 3, 3, 4, 4, 5];
        for (diff, bits) in diffs.iter().zip(expected) {
            assert_eq!(capacity(*diff), bits, "diff {diff}");
        }
        assert_eq!(capacity(0), 1);
        assert_eq!(capacity(255), MAX_PAIR_BITS);
    }

    #[test]
    fn test_monotonic() {
        for diff in 0..255u8 {
            assert!(capacity(diff) <= capacity(diff + 1));
        }
    }

    #[test]
    fn test_ranges_hold_their_values() {
        for diff in 0..=255u8 {
            let lower = range_lower_bound(diff);
            let bits = capacity(diff);
            let top = u16::from(lower) + (1u16 << bits) - 1;
            assert!(top <= 255);
            assert_eq!(capacity(top as u8), bits);
            assert_eq!(range_lower_bound(top as u8), lower);
        }
    }
}
