//! Deterministic Dutch-auction decay math.
//!
//! Computes the currently effective amount of a decaying order field, either
//! linearly between two amounts over a time window ([`decay`]) or along a
//! piecewise block-indexed curve ([`decay_by_blocks`]). The math previews
//! on-chain resolution, so it mirrors the reactor's integer arithmetic
//! exactly: flooring division, clamping outside the decay window, and a
//! big-integer intermediate where the product exceeds 256 bits.

mod curve;
mod linear;

pub use {
    curve::{DecayCurve, DecayError, MAX_CURVE_POINTS, decay_by_blocks},
    linear::{decay, linear_decay},
};
