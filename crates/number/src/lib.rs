pub mod i256_ext;
pub mod u256_ext;

pub use {i256_ext::I256Ext, u256_ext::U256Ext};
