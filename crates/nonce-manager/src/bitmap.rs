//! Word/bit arithmetic for the unordered nonce bitmap.
//!
//! A nonce identifies bit `nonce & 0xff` of its owner's 256-bit word
//! `nonce >> 8` in the registry. [`split_nonce`] and [`build_nonce`] are
//! exact inverses over the whole nonce domain.

use alloy_primitives::U256;

/// Splits a nonce into its word index and bit position.
pub fn split_nonce(nonce: U256) -> (U256, u8) {
    (nonce >> 8, (nonce & U256::from(0xffu64)).to::<u8>())
}

/// Inverse of [`split_nonce`].
pub fn build_nonce(word: U256, bit: u8) -> U256 {
    (word << 8) | U256::from(bit)
}

/// The position of the lowest unset bit, or `None` for a saturated word.
pub fn first_unset_bit(bitmap: U256) -> Option<u8> {
    // For a saturated word the complement has 256 trailing zeros, which no
    // longer fits the bit-position byte.
    u8::try_from((!bitmap).trailing_zeros()).ok()
}

pub fn set_bit(bitmap: U256, bit: u8) -> U256 {
    bitmap | (U256::ONE << usize::from(bit))
}

pub fn is_bit_set(bitmap: U256, bit: u8) -> bool {
    bitmap & (U256::ONE << usize::from(bit)) != U256::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_build_are_inverses() {
        for nonce in [
            U256::ZERO,
            U256::from(1u64),
            U256::from(255u64),
            U256::from(256u64),
            U256::from(12_345_678u64),
            U256::MAX - U256::from(1u64),
            U256::MAX,
        ] {
            let (word, bit) = split_nonce(nonce);
            assert_eq!(build_nonce(word, bit), nonce);
        }
    }

    #[test]
    fn split_examples() {
        assert_eq!(split_nonce(U256::from(0u64)), (U256::ZERO, 0));
        assert_eq!(split_nonce(U256::from(513u64)), (U256::from(2u64), 1));
        assert_eq!(split_nonce(U256::MAX), ((U256::MAX >> 8), 255));
    }

    #[test]
    fn finds_the_lowest_unset_bit() {
        assert_eq!(first_unset_bit(U256::ZERO), Some(0));
        assert_eq!(first_unset_bit(U256::from(0b11001u64)), Some(1));
        assert_eq!(first_unset_bit(U256::from(0b111u64)), Some(3));
        assert_eq!(first_unset_bit(U256::MAX >> 1), Some(255));
        assert_eq!(first_unset_bit(U256::MAX), None);
    }

    #[test]
    fn sets_and_tests_bits() {
        let bitmap = set_bit(set_bit(U256::ZERO, 0), 255);
        assert!(is_bit_set(bitmap, 0));
        assert!(is_bit_set(bitmap, 255));
        assert!(!is_bit_set(bitmap, 1));
    }
}
