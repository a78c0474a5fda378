//! Extension trait for U256 arithmetic operations.

use {
    alloy_primitives::U256,
    anyhow::Result,
    num::{BigInt, BigUint},
};

/// Extension trait for U256 to add utility methods.
pub trait U256Ext: Sized {
    /// Multiply-then-divide with flooring division and a big integer
    /// intermediate, so the product may exceed 256 bits as long as the
    /// quotient fits. Returns `None` when the divisor is zero or the
    /// quotient overflows.
    fn checked_mul_div_floor(&self, mul: &Self, div: &Self) -> Option<Self>;

    /// Multiply-then-divide that panics on a zero divisor or overflow.
    fn mul_div_floor(&self, mul: &Self, div: &Self) -> Self {
        self.checked_mul_div_floor(mul, div)
            .expect("mul-div arithmetic error")
    }

    /// Convert to BigInt.
    fn to_big_int(&self) -> BigInt;

    /// Convert to BigUint.
    fn to_big_uint(&self) -> BigUint;

    /// Create from BigUint.
    fn from_big_uint(input: &BigUint) -> Result<Self>;
}

impl U256Ext for U256 {
    fn checked_mul_div_floor(&self, mul: &Self, div: &Self) -> Option<Self> {
        if div.is_zero() {
            return None;
        }
        let quotient = self.to_big_uint() * mul.to_big_uint() / div.to_big_uint();
        Self::from_big_uint(&quotient).ok()
    }

    fn to_big_int(&self) -> BigInt {
        BigInt::from_biguint(num::bigint::Sign::Plus, self.to_big_uint())
    }

    fn to_big_uint(&self) -> BigUint {
        BigUint::from_bytes_be(self.to_be_bytes::<32>().as_slice())
    }

    fn from_big_uint(input: &BigUint) -> Result<Self> {
        let bytes = input.to_bytes_be();
        anyhow::ensure!(bytes.len() <= 32, "too large");
        Ok(U256::from_be_slice(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_floors() {
        let value = U256::from(10u64);
        assert_eq!(
            value.checked_mul_div_floor(&U256::from(7u64), &U256::from(4u64)),
            Some(U256::from(17u64)),
        );
    }

    #[test]
    fn mul_div_intermediate_exceeds_word() {
        // MAX * MAX / MAX must not overflow the intermediate product.
        assert_eq!(
            U256::MAX.checked_mul_div_floor(&U256::MAX, &U256::MAX),
            Some(U256::MAX),
        );
    }

    #[test]
    fn mul_div_rejects_zero_divisor_and_overflow() {
        assert_eq!(
            U256::MAX.checked_mul_div_floor(&U256::from(1u64), &U256::ZERO),
            None,
        );
        assert_eq!(
            U256::MAX.checked_mul_div_floor(&U256::from(2u64), &U256::from(1u64)),
            None,
        );
    }

    #[test]
    fn big_uint_round_trip() {
        for value in [U256::ZERO, U256::from(42u64), U256::MAX] {
            assert_eq!(U256::from_big_uint(&value.to_big_uint()).unwrap(), value);
        }
    }
}
