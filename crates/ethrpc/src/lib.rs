//! Read-only access to chain state.
//!
//! The [`ChainReading`] trait is the SDK's single collaborator for remote
//! state: a plain `eth_call` and a batched multicall. Higher layers encode
//! their own calldata and interpret revert payloads, so the reader stays
//! free of any domain knowledge.

mod rpc;

pub use rpc::{MULTICALL3, RpcChainReader};

use {
    alloy_primitives::{Address, Bytes},
    thiserror::Error,
};

/// A single `eth_call`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Call {
    pub to: Address,
    pub data: Bytes,
}

#[derive(Debug, Error)]
pub enum CallError {
    /// The call executed and reverted; the payload is the raw revert data
    /// (possibly empty).
    #[error("execution reverted: {0}")]
    Revert(Bytes),
    /// The call never produced an execution result (transport failure,
    /// malformed response).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CallError {
    /// A copy suitable for fanning one batch-wide failure out to every
    /// element's result slot.
    pub(crate) fn replicate(&self) -> Self {
        match self {
            Self::Revert(data) => Self::Revert(data.clone()),
            Self::Other(err) => Self::Other(anyhow::anyhow!("{err:#}")),
        }
    }
}

#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait ChainReading: Send + Sync {
    /// Executes a single read-only call against the latest state.
    async fn call(&self, call: Call) -> Result<Bytes, CallError>;

    /// Executes a batch of independent read-only calls in one round-trip.
    ///
    /// Always returns one result per input call, in input order. One call
    /// reverting does not affect its neighbours; only a failure of the
    /// aggregate request itself is replicated into every slot.
    async fn multicall(&self, calls: Vec<Call>) -> Vec<Result<Bytes, CallError>>;
}
