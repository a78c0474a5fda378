//! Per-chain deployment addresses, initialized once and never mutated.

use {
    alloy_primitives::{Address, address},
    anyhow::{Context, Result},
    std::{collections::HashMap, sync::LazyLock},
};

pub mod networks {
    pub const MAINNET: u64 = 1;
    pub const OPTIMISM: u64 = 10;
    pub const POLYGON: u64 = 137;
    pub const BASE: u64 = 8453;
    pub const ARBITRUM_ONE: u64 = 42161;
}

use networks::*;

/// The canonical permit2-style nonce registry, deployed at the same address
/// on every supported chain.
pub const NONCE_REGISTRY: Address = address!("0x000000000022D473030F116dDEE9F6B43aC78BA3");

pub static REACTOR: LazyLock<HashMap<u64, Address>> = LazyLock::new(|| {
    maplit::hashmap! {
        MAINNET => address!("0x00000011F84B9aa48e5f8aA8B9897600006289Be"),
        POLYGON => address!("0x00000011F84B9aa48e5f8aA8B9897600006289Be"),
        BASE => address!("0x000000001Ec5656dcdB24D90DFa42742738De729"),
        ARBITRUM_ONE => address!("0x1bd1aAdc9E230626C44a139d7E70d842749351eb"),
    }
});

pub static ORDER_QUOTER: LazyLock<HashMap<u64, Address>> = LazyLock::new(|| {
    maplit::hashmap! {
        MAINNET => address!("0x54539967a06Fc0E3C3ED0ee320Eb67362D13C5fF"),
        POLYGON => address!("0x54539967a06Fc0E3C3ED0ee320Eb67362D13C5fF"),
        BASE => address!("0x88440407634f89873c5d9439987AC4BE9725fea8"),
        ARBITRUM_ONE => address!("0x88440407634f89873c5d9439987AC4BE9725fea8"),
    }
});

/// Looks up the reactor deployed on the given chain.
pub fn reactor(chain_id: u64) -> Result<Address> {
    deployment(&REACTOR, chain_id).context("no reactor deployment")
}

/// Looks up the order quoter deployed on the given chain.
pub fn order_quoter(chain_id: u64) -> Result<Address> {
    deployment(&ORDER_QUOTER, chain_id).context("no order quoter deployment")
}

fn deployment(deployments: &HashMap<u64, Address>, chain_id: u64) -> Option<Address> {
    deployments.get(&chain_id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_deployments_exist() {
        assert!(reactor(networks::MAINNET).is_ok());
        assert!(order_quoter(networks::MAINNET).is_ok());
    }

    #[test]
    fn unknown_chain_is_an_error() {
        assert!(reactor(31337).is_err());
    }
}
