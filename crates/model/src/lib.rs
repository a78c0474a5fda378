//! The signed order model shared by the quoting and validation layers.
//!
//! Orders are immutable value objects: they are assembled through a builder
//! or decoded from their ABI encoding, and only read afterwards. The ABI
//! codec itself is the `sol!`-generated one from the `contracts` crate; this
//! crate only converts between the wire structs and the richer native types
//! (narrow timestamps, decoded decay curves).

pub mod order;
pub mod time;

pub use order::{
    BlockDutchInput, BlockDutchOrder, BlockDutchOrderBuilder, BlockDutchOutput, DutchInput,
    DutchOrder, DutchOrderBuilder, DutchOutput, Order, OrderCodecError, OrderInfo,
    ResolvedAmounts, ResolvedOutput, SignedOrder, TokenAmount,
};
