//! Extension trait for signed 256-bit arithmetic.

use {
    super::u256_ext::U256Ext,
    alloy_primitives::I256,
    anyhow::Result,
    num::{BigInt, bigint::Sign},
};

/// Extension trait for I256 to add utility methods.
pub trait I256Ext: Sized {
    /// Convert to BigInt.
    fn to_big_int(&self) -> BigInt;

    /// Create from BigInt. Fails when the value does not fit in 256 bits.
    fn from_big_int(input: &BigInt) -> Result<Self>;
}

impl I256Ext for I256 {
    fn to_big_int(&self) -> BigInt {
        let magnitude = self.unsigned_abs().to_big_uint();
        match self.is_negative() {
            true => BigInt::from_biguint(Sign::Minus, magnitude),
            false => BigInt::from_biguint(Sign::Plus, magnitude),
        }
    }

    fn from_big_int(input: &BigInt) -> Result<Self> {
        anyhow::ensure!(
            *input >= Self::MIN.to_big_int() && *input <= Self::MAX.to_big_int(),
            "too large"
        );
        let magnitude = alloy_primitives::U256::from_big_uint(input.magnitude())?;
        Ok(match input.sign() {
            Sign::Minus => Self::from_raw(magnitude.wrapping_neg()),
            _ => Self::from_raw(magnitude),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_int_round_trip() {
        for value in [
            I256::ZERO,
            I256::try_from(42i64).unwrap(),
            I256::try_from(-42i64).unwrap(),
            I256::MAX,
            I256::MIN + I256::ONE,
        ] {
            assert_eq!(I256::from_big_int(&value.to_big_int()).unwrap(), value);
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        let too_large = I256::MAX.to_big_int() + 1;
        assert!(I256::from_big_int(&too_large).is_err());
    }
}
