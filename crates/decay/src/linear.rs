//! Linear interpolation between two amounts.

use {
    alloy_primitives::{I256, U256},
    num::BigInt,
    number::{I256Ext, U256Ext},
};

/// Computes the effective amount of a field decaying linearly from
/// `start_amount` at `decay_start_time` to `end_amount` at `decay_end_time`.
///
/// Outside the decay window the amount clamps to the respective bound. The
/// interpolated delta uses flooring division, matching the on-chain
/// fixed-point reference.
pub fn decay(
    start_amount: U256,
    end_amount: U256,
    decay_start_time: u64,
    decay_end_time: u64,
    at_time: u64,
) -> U256 {
    if decay_end_time <= at_time {
        return end_amount;
    }
    if decay_start_time >= at_time {
        return start_amount;
    }
    if start_amount == end_amount {
        return start_amount;
    }

    let elapsed = U256::from(at_time - decay_start_time);
    let duration = U256::from(decay_end_time - decay_start_time);
    // The delta never exceeds the amount difference, so the quotient always
    // fits and the division is by a non-zero duration.
    if end_amount > start_amount {
        start_amount + (end_amount - start_amount).mul_div_floor(&elapsed, &duration)
    } else {
        start_amount - (start_amount - end_amount).mul_div_floor(&elapsed, &duration)
    }
}

/// Interpolates between two signed curve points, used for individual segments
/// of a piecewise decay curve.
///
/// Returns `end_amount` directly once `current_point` reaches `end_point`,
/// which also covers zero-width segments without dividing by zero.
pub fn linear_decay(
    start_point: u64,
    end_point: u64,
    current_point: u64,
    start_amount: I256,
    end_amount: I256,
) -> I256 {
    let decayed = linear_decay_big(
        start_point,
        end_point,
        current_point,
        &start_amount.to_big_int(),
        &end_amount.to_big_int(),
    );
    I256::from_big_int(&decayed).expect("interpolation is bounded by its endpoints")
}

/// Big-integer core of [`linear_decay`]; total for arbitrarily large curve
/// point amounts. Division truncates toward zero.
pub(crate) fn linear_decay_big(
    start_point: u64,
    end_point: u64,
    current_point: u64,
    start_amount: &BigInt,
    end_amount: &BigInt,
) -> BigInt {
    if current_point >= end_point {
        return end_amount.clone();
    }
    if current_point <= start_point {
        return start_amount.clone();
    }

    let elapsed = BigInt::from(current_point - start_point);
    let duration = BigInt::from(end_point - start_point);
    let delta = (end_amount - start_amount) * elapsed / duration;
    start_amount + delta
}
