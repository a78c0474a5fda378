//! Signed order validation.
//!
//! Produces a single [`OrderValidation`] verdict per signed order by
//! combining cheap local field checks with one remote fill simulation per
//! order, batched through a multicall for whole batches. The verdict enum is
//! the only failure channel: quoting and validating never return an error
//! for order-evaluation purposes, transport problems included.

mod quoter;
mod verdict;

pub use {
    quoter::{OrderQuote, OrderQuoter, OrderValidator, Quote},
    verdict::{OrderValidation, classify_revert},
};
