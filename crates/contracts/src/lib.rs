//! ABI definitions and deployment addresses for the auction protocol
//! contracts this SDK talks to: the Dutch order reactor, its off-chain
//! quoter, and the permit2-style nonce registry.

pub mod bindings;
pub mod deployments;

pub use bindings::*;
