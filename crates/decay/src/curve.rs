//! Piecewise block-indexed decay curves.

use {
    crate::linear::linear_decay_big,
    alloy_primitives::{I256, U256},
    num::BigInt,
    number::{I256Ext, U256Ext},
    thiserror::Error,
};

/// The packed `relativeBlocks` word holds 16-bit offsets, which caps a curve
/// at 16 points.
pub const MAX_CURVE_POINTS: usize = 16;

/// A decay schedule of up to [`MAX_CURVE_POINTS`] breakpoints. Each point
/// pairs a cumulative block offset from the decay start with a cumulative
/// (signed) decrement from the start amount.
///
/// Offsets are expected to be non-decreasing and amounts monotonic; the
/// engine only decodes and evaluates the curve, the reactor enforces shape.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayCurve {
    pub relative_blocks: Vec<u16>,
    pub relative_amounts: Vec<I256>,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DecayError {
    #[error("decay curve has {0} points, the limit is {MAX_CURVE_POINTS}")]
    TooManyPoints(usize),
    #[error("decay curve has {blocks} block offsets for {amounts} amounts")]
    LengthMismatch { blocks: usize, amounts: usize },
}

impl DecayCurve {
    pub fn new(relative_blocks: Vec<u16>, relative_amounts: Vec<I256>) -> Result<Self, DecayError> {
        let curve = Self {
            relative_blocks,
            relative_amounts,
        };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> Result<(), DecayError> {
        if self.relative_amounts.len() > MAX_CURVE_POINTS {
            return Err(DecayError::TooManyPoints(self.relative_amounts.len()));
        }
        if self.relative_blocks.len() != self.relative_amounts.len() {
            return Err(DecayError::LengthMismatch {
                blocks: self.relative_blocks.len(),
                amounts: self.relative_amounts.len(),
            });
        }
        Ok(())
    }

    /// Packs the block offsets into the on-chain word, lowest offset in the
    /// lowest bits.
    pub fn pack_relative_blocks(&self) -> Result<U256, DecayError> {
        self.validate()?;
        let mut packed = U256::ZERO;
        for (index, offset) in self.relative_blocks.iter().enumerate() {
            packed |= U256::from(*offset) << (index * 16);
        }
        Ok(packed)
    }

    /// Inverse of [`Self::pack_relative_blocks`]: recovers one 16-bit offset
    /// per relative amount from the packed word.
    pub fn unpack(packed_blocks: U256, relative_amounts: Vec<I256>) -> Result<Self, DecayError> {
        if relative_amounts.len() > MAX_CURVE_POINTS {
            return Err(DecayError::TooManyPoints(relative_amounts.len()));
        }
        let relative_blocks = (0..relative_amounts.len())
            .map(|index| {
                let offset = (packed_blocks >> (index * 16)) & U256::from(u16::MAX);
                offset.to::<u16>()
            })
            .collect();
        Ok(Self {
            relative_blocks,
            relative_amounts,
        })
    }
}

/// Computes the effective amount of a field decaying along `curve` starting
/// at `decay_start_block`, evaluated at `current_block`.
///
/// Returns `start_amount` unchanged before decay starts and for empty
/// curves; past the last breakpoint the amount stays flat at the last
/// point's value. Fails fast on malformed curves before any arithmetic.
pub fn decay_by_blocks(
    curve: &DecayCurve,
    start_amount: U256,
    decay_start_block: u64,
    current_block: u64,
) -> Result<U256, DecayError> {
    curve.validate()?;
    if decay_start_block >= current_block || curve.relative_amounts.is_empty() {
        return Ok(start_amount);
    }

    let block_delta = current_block - decay_start_block;
    let start = start_amount.to_big_int();

    // Walk the breakpoints for the first one at or past the current block;
    // the segment before it brackets the interpolation. Before the first
    // breakpoint the lower bound is the decay start itself.
    let mut previous = (0u64, start.clone());
    for (offset, relative_amount) in curve.relative_blocks.iter().zip(&curve.relative_amounts) {
        let point = u64::from(*offset);
        let amount = &start - relative_amount.to_big_int();
        if point >= block_delta {
            let decayed =
                linear_decay_big(previous.0, point, block_delta, &previous.1, &amount);
            return Ok(into_amount(decayed));
        }
        previous = (point, amount);
    }

    // Past the end of the schedule the decay is flat.
    Ok(into_amount(previous.1))
}

/// Curve amounts are signed and unchecked, so an evaluated point can fall
/// outside the representable token amount range; the preview saturates where
/// the reactor would revert.
fn into_amount(value: BigInt) -> U256 {
    if value.sign() == num::bigint::Sign::Minus {
        return U256::ZERO;
    }
    U256::from_big_uint(value.magnitude()).unwrap_or(U256::MAX)
}
