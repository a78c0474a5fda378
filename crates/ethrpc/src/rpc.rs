//! Multicall encoding and decoding over an alloy provider.

use {
    crate::{Call, CallError, ChainReading},
    alloy_primitives::{Address, Bytes, TxKind, address},
    alloy_provider::{DynProvider, Provider},
    alloy_rpc_types::{TransactionInput, TransactionRequest},
    alloy_sol_types::{SolCall, sol},
    alloy_transport::TransportError,
    tracing::instrument,
};

sol! {
    /// The shared aggregator contract used to batch independent calls.
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls)
            external
            payable
            returns (Result[] memory returnData);
    }
}

/// The aggregator is deployed at the same address on every supported chain.
pub const MULTICALL3: Address = address!("0xcA11bde05977b3631167028862bE2a173976CA11");

/// [`ChainReading`] implementation backed by an RPC node.
pub struct RpcChainReader {
    provider: DynProvider,
    multicall: Address,
}

impl RpcChainReader {
    pub fn new(provider: DynProvider) -> Self {
        Self {
            provider,
            multicall: MULTICALL3,
        }
    }

    /// Overrides the aggregator address, for chains with a non-standard
    /// deployment.
    pub fn with_multicall(mut self, multicall: Address) -> Self {
        self.multicall = multicall;
        self
    }

    async fn execute(&self, to: Address, data: Bytes) -> Result<Bytes, CallError> {
        let request = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(data),
            ..Default::default()
        };
        self.provider.call(request).await.map_err(into_call_error)
    }
}

#[async_trait::async_trait]
impl ChainReading for RpcChainReader {
    #[instrument(skip_all, fields(to = %call.to))]
    async fn call(&self, call: Call) -> Result<Bytes, CallError> {
        self.execute(call.to, call.data).await
    }

    #[instrument(skip_all, fields(calls = calls.len()))]
    async fn multicall(&self, calls: Vec<Call>) -> Vec<Result<Bytes, CallError>> {
        let len = calls.len();
        let aggregate = IMulticall3::aggregate3Call {
            calls: calls
                .into_iter()
                .map(|call| IMulticall3::Call3 {
                    target: call.to,
                    allowFailure: true,
                    callData: call.data,
                })
                .collect(),
        };

        let return_data = match self
            .execute(self.multicall, aggregate.abi_encode().into())
            .await
        {
            Ok(data) => data,
            Err(err) => return repeat_err(err, len),
        };

        decode(len, &return_data)
    }
}

/// Contract reverts surface as RPC error responses carrying revert data;
/// everything else is a node or transport problem. Note that empty revert
/// data still counts as a revert, which alloy's decoding helpers would
/// otherwise erase.
fn into_call_error(err: TransportError) -> CallError {
    match err.as_error_resp().and_then(|payload| payload.as_revert_data()) {
        Some(data) => CallError::Revert(data),
        None => CallError::Other(anyhow::Error::new(err)),
    }
}

fn decode(len: usize, return_data: &[u8]) -> Vec<Result<Bytes, CallError>> {
    let results = match IMulticall3::aggregate3Call::abi_decode_returns(return_data) {
        Ok(results) if results.len() == len => results,
        Ok(results) => {
            return repeat_err(
                anyhow::anyhow!("expected {len} multicall results, got {}", results.len()).into(),
                len,
            );
        }
        Err(err) => {
            return repeat_err(
                anyhow::Error::new(err)
                    .context("could not decode multicall return data")
                    .into(),
                len,
            );
        }
    };

    results
        .into_iter()
        .map(|result| match result.success {
            true => Ok(result.returnData),
            false => Err(CallError::Revert(result.returnData)),
        })
        .collect()
}

fn repeat_err(err: CallError, len: usize) -> Vec<Result<Bytes, CallError>> {
    (0..len).map(|_| Err(err.replicate())).collect()
}

#[cfg(test)]
mod tests {
    use {super::*, alloy_sol_types::SolValue, hex_literal::hex};

    fn result(success: bool, data: &[u8]) -> IMulticall3::Result {
        IMulticall3::Result {
            success,
            returnData: data.to_vec().into(),
        }
    }

    #[test]
    fn decode_multicall() {
        let encoded = vec![
            result(true, &hex!("0102")),
            result(false, &[]),
            result(
                false,
                // Error("poop")
                &hex!(
                    "08c379a0
                     0000000000000000000000000000000000000000000000000000000000000020
                     0000000000000000000000000000000000000000000000000000000000000004
                     706f6f7000000000000000000000000000000000000000000000000000000000"
                ),
            ),
        ]
        .abi_encode();

        let decoded = decode(3, &encoded);
        assert!(matches!(&decoded[0], Ok(data) if data.as_ref() == hex!("0102")));
        assert!(matches!(&decoded[1], Err(CallError::Revert(data)) if data.is_empty()));
        assert!(
            matches!(&decoded[2], Err(CallError::Revert(data)) if data.starts_with(&hex!("08c379a0")))
        );
    }

    #[test]
    fn decode_length_mismatch_fails_every_slot() {
        let encoded = vec![result(true, &[])].abi_encode();
        let decoded = decode(2, &encoded);
        assert_eq!(decoded.len(), 2);
        assert!(
            decoded
                .iter()
                .all(|slot| matches!(slot, Err(CallError::Other(_))))
        );
    }

    #[test]
    fn garbage_return_data_fails_every_slot() {
        let decoded = decode(2, &hex!("c0ffee"));
        assert_eq!(decoded.len(), 2);
        assert!(
            decoded
                .iter()
                .all(|slot| matches!(slot, Err(CallError::Other(_))))
        );
    }
}
