//! Quote simulation and the verdict state machine around it.

use {
    crate::verdict::{OrderValidation, classify_revert},
    alloy_primitives::{Address, B256, Bytes},
    alloy_sol_types::SolCall,
    contracts::IOrderQuoter,
    ethrpc::{Call, CallError, ChainReading},
    model::{Order, ResolvedAmounts, SignedOrder, time},
    std::sync::Arc,
    tracing::instrument,
};

/// The resolved amounts of a fillable order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Quote {
    pub amounts: ResolvedAmounts,
    pub order_hash: B256,
}

/// The outcome of quoting one signed order: a verdict, and the quote itself
/// when the verdict is [`OrderValidation::Ok`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderQuote {
    pub validation: OrderValidation,
    pub quote: Option<Quote>,
}

impl OrderQuote {
    fn invalid(validation: OrderValidation) -> Self {
        Self {
            validation,
            quote: None,
        }
    }
}

/// Simulates order fills through the on-chain quoter contract and
/// classifies the outcome.
pub struct OrderQuoter {
    reader: Arc<dyn ChainReading>,
    quoter: Address,
}

impl OrderQuoter {
    pub fn new(reader: Arc<dyn ChainReading>, quoter: Address) -> Self {
        Self { reader, quoter }
    }

    /// A quoter talking to the deployment on the given chain.
    pub fn for_chain(reader: Arc<dyn ChainReading>, chain_id: u64) -> anyhow::Result<Self> {
        Ok(Self::new(reader, contracts::deployments::order_quoter(chain_id)?))
    }

    /// Quotes a single order with at most one remote round-trip.
    ///
    /// Local checks run first; an order they reject never issues a remote
    /// call. Remote failures of any kind map into the verdict, they are
    /// never returned as errors.
    #[instrument(skip_all)]
    pub async fn quote(&self, order: &SignedOrder) -> OrderQuote {
        match self.prepare(order) {
            Ok(call) => evaluate(self.reader.call(call).await),
            Err(validation) => OrderQuote::invalid(validation),
        }
    }

    /// Quotes a batch of orders in one multicall round-trip.
    ///
    /// Returns one outcome per input order, in input order. Locally
    /// rejected orders keep their verdicts and take no slot in the
    /// multicall; each remaining slot is classified independently, so one
    /// failing simulation never poisons its neighbours.
    #[instrument(skip_all, fields(orders = orders.len()))]
    pub async fn quote_batch(&self, orders: &[SignedOrder]) -> Vec<OrderQuote> {
        let prepared = orders
            .iter()
            .map(|order| self.prepare(order))
            .collect::<Vec<_>>();

        let calls = prepared
            .iter()
            .filter_map(|prepared| prepared.as_ref().ok().cloned())
            .collect::<Vec<_>>();
        let results = match calls.is_empty() {
            true => Vec::new(),
            false => self.reader.multicall(calls).await,
        };

        let mut results = results.into_iter();
        prepared
            .into_iter()
            .map(|prepared| match prepared {
                Ok(_) => evaluate(
                    results
                        .next()
                        .expect("one multicall result per issued call"),
                ),
                Err(validation) => OrderQuote::invalid(validation),
            })
            .collect()
    }

    /// Runs the local checks and encodes the simulation calldata.
    fn prepare(&self, order: &SignedOrder) -> Result<Call, OrderValidation> {
        if let Some(validation) = local_verdict(&order.order, time::now_in_epoch_seconds()) {
            return Err(validation);
        }
        let encoded = order
            .order
            .abi_encode()
            .map_err(|_| OrderValidation::InvalidOrderFields)?;
        let data = IOrderQuoter::quoteCall {
            order: encoded,
            sig: order.signature.clone(),
        }
        .abi_encode();
        Ok(Call {
            to: self.quoter,
            data: data.into(),
        })
    }
}

/// Field checks that run before any remote work.
///
/// Beyond expiry this deliberately covers only the inverted decay window
/// (and its block-curve equivalent, an undecodable curve): those are the
/// malformed-field cases the chain is not guaranteed to reject cleanly.
/// Everything else is left to the authoritative remote simulation.
fn local_verdict(order: &Order, now: u64) -> Option<OrderValidation> {
    if order.deadline() < now {
        return Some(OrderValidation::Expired);
    }
    let malformed = match order {
        Order::Dutch(order) => order.decay_end_time < order.decay_start_time,
        Order::BlockDutch(order) => {
            order.input.curve.validate().is_err()
                || order
                    .outputs
                    .iter()
                    .any(|output| output.curve.validate().is_err())
        }
    };
    malformed.then_some(OrderValidation::InvalidOrderFields)
}

/// Classifies the remote simulation result of one order.
fn evaluate(result: Result<Bytes, CallError>) -> OrderQuote {
    match result {
        Ok(output) => match IOrderQuoter::quoteCall::abi_decode_returns(&output) {
            Ok(resolved) => OrderQuote {
                validation: OrderValidation::Ok,
                quote: Some(Quote {
                    amounts: (&resolved).into(),
                    order_hash: resolved.orderHash,
                }),
            },
            Err(err) => {
                tracing::warn!(?err, "could not decode quote simulation result");
                OrderQuote::invalid(OrderValidation::UnknownError)
            }
        },
        Err(CallError::Revert(data)) => OrderQuote::invalid(classify_revert(&data)),
        Err(CallError::Other(err)) => {
            tracing::warn!(?err, "quote simulation failed");
            OrderQuote::invalid(OrderValidation::UnknownError)
        }
    }
}

/// Thin wrapper over [`OrderQuoter`] for callers that only need the go/no-go
/// verdict.
pub struct OrderValidator(OrderQuoter);

impl OrderValidator {
    pub fn new(quoter: OrderQuoter) -> Self {
        Self(quoter)
    }

    pub async fn validate(&self, order: &SignedOrder) -> OrderValidation {
        self.0.quote(order).await.validation
    }

    pub async fn validate_batch(&self, orders: &[SignedOrder]) -> Vec<OrderValidation> {
        self.0
            .quote_batch(orders)
            .await
            .into_iter()
            .map(|outcome| outcome.validation)
            .collect()
    }
}
