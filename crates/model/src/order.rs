//! Contains the order types and their conversions to and from the ABI wire
//! representation.

use {
    alloy_primitives::{Address, Bytes, U256},
    alloy_sol_types::SolValue,
    decay::{DecayCurve, DecayError},
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

/// Metadata common to every order variant.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    pub reactor: Address,
    pub swapper: Address,
    pub nonce: U256,
    /// Unix timestamp after which the order can no longer be filled.
    pub deadline: u64,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutchInput {
    pub token: Address,
    pub start_amount: U256,
    pub end_amount: U256,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutchOutput {
    pub token: Address,
    pub start_amount: U256,
    pub end_amount: U256,
    pub recipient: Address,
}

/// An order whose input and output amounts decay linearly in time.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutchOrder {
    pub info: OrderInfo,
    pub decay_start_time: u64,
    pub decay_end_time: u64,
    pub input: DutchInput,
    pub outputs: Vec<DutchOutput>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDutchInput {
    pub token: Address,
    pub start_amount: U256,
    pub curve: DecayCurve,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDutchOutput {
    pub token: Address,
    pub start_amount: U256,
    pub curve: DecayCurve,
    pub recipient: Address,
}

/// An order whose amounts decay along block-indexed piecewise curves.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDutchOrder {
    pub info: OrderInfo,
    pub decay_start_block: u64,
    pub input: BlockDutchInput,
    pub outputs: Vec<BlockDutchOutput>,
}

/// Any of the supported order variants.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "orderType", rename_all = "camelCase")]
pub enum Order {
    Dutch(DutchOrder),
    BlockDutch(BlockDutchOrder),
}

/// An order paired with its signature. The signature is opaque to the SDK
/// and only ever forwarded to the on-chain fill simulation.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrder {
    pub order: Order,
    pub signature: Bytes,
}

#[derive(Debug, Error)]
pub enum OrderCodecError {
    #[error("malformed order encoding: {0}")]
    Abi(#[from] alloy_sol_types::Error),
    #[error("numeric field does not fit in 64 bits")]
    FieldOverflow,
    #[error(transparent)]
    Decay(#[from] DecayError),
}

impl Order {
    pub fn info(&self) -> &OrderInfo {
        match self {
            Self::Dutch(order) => &order.info,
            Self::BlockDutch(order) => &order.info,
        }
    }

    pub fn deadline(&self) -> u64 {
        self.info().deadline
    }

    /// ABI-encodes the order for submission to the reactor or quoter.
    pub fn abi_encode(&self) -> Result<Bytes, OrderCodecError> {
        match self {
            Self::Dutch(order) => Ok(order.abi_encode()),
            Self::BlockDutch(order) => order.abi_encode(),
        }
    }
}

impl DutchOrder {
    pub fn abi_encode(&self) -> Bytes {
        contracts::DutchOrder::from(self).abi_encode().into()
    }

    pub fn abi_decode(data: &[u8]) -> Result<Self, OrderCodecError> {
        <contracts::DutchOrder as SolValue>::abi_decode(data)?.try_into()
    }

    /// Previews on-chain resolution: the effective amounts this order would
    /// trade at if filled at `at_time`. Identical to the math the quote
    /// simulation runs on-chain.
    pub fn resolve(&self, at_time: u64) -> ResolvedAmounts {
        let decayed = |start_amount, end_amount| {
            decay::decay(
                start_amount,
                end_amount,
                self.decay_start_time,
                self.decay_end_time,
                at_time,
            )
        };
        ResolvedAmounts {
            input: TokenAmount {
                token: self.input.token,
                amount: decayed(self.input.start_amount, self.input.end_amount),
            },
            outputs: self
                .outputs
                .iter()
                .map(|output| ResolvedOutput {
                    token: output.token,
                    amount: decayed(output.start_amount, output.end_amount),
                    recipient: output.recipient,
                })
                .collect(),
        }
    }
}

impl BlockDutchOrder {
    pub fn abi_encode(&self) -> Result<Bytes, OrderCodecError> {
        Ok(contracts::BlockDutchOrder::try_from(self)?.abi_encode().into())
    }

    pub fn abi_decode(data: &[u8]) -> Result<Self, OrderCodecError> {
        <contracts::BlockDutchOrder as SolValue>::abi_decode(data)?.try_into()
    }

    /// Previews on-chain resolution at `at_block`; see
    /// [`DutchOrder::resolve`].
    pub fn resolve(&self, at_block: u64) -> Result<ResolvedAmounts, DecayError> {
        Ok(ResolvedAmounts {
            input: TokenAmount {
                token: self.input.token,
                amount: decay::decay_by_blocks(
                    &self.input.curve,
                    self.input.start_amount,
                    self.decay_start_block,
                    at_block,
                )?,
            },
            outputs: self
                .outputs
                .iter()
                .map(|output| {
                    Ok(ResolvedOutput {
                        token: output.token,
                        amount: decay::decay_by_blocks(
                            &output.curve,
                            output.start_amount,
                            self.decay_start_block,
                            at_block,
                        )?,
                        recipient: output.recipient,
                    })
                })
                .collect::<Result<_, DecayError>>()?,
        })
    }
}

/// An input amount at a concrete point in time.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub token: Address,
    pub amount: U256,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOutput {
    pub token: Address,
    pub amount: U256,
    pub recipient: Address,
}

/// The amounts an order trades at once its decay is applied.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAmounts {
    pub input: TokenAmount,
    pub outputs: Vec<ResolvedOutput>,
}

impl From<&contracts::ResolvedOrder> for ResolvedAmounts {
    fn from(resolved: &contracts::ResolvedOrder) -> Self {
        Self {
            input: TokenAmount {
                token: resolved.input.token,
                amount: resolved.input.amount,
            },
            outputs: resolved
                .outputs
                .iter()
                .map(|output| ResolvedOutput {
                    token: output.token,
                    amount: output.amount,
                    recipient: output.recipient,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct DutchOrderBuilder(DutchOrder);

impl DutchOrderBuilder {
    pub fn with_reactor(mut self, reactor: Address) -> Self {
        self.0.info.reactor = reactor;
        self
    }

    pub fn with_swapper(mut self, swapper: Address) -> Self {
        self.0.info.swapper = swapper;
        self
    }

    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.0.info.nonce = nonce;
        self
    }

    pub fn with_deadline(mut self, deadline: u64) -> Self {
        self.0.info.deadline = deadline;
        self
    }

    pub fn with_decay_start_time(mut self, decay_start_time: u64) -> Self {
        self.0.decay_start_time = decay_start_time;
        self
    }

    pub fn with_decay_end_time(mut self, decay_end_time: u64) -> Self {
        self.0.decay_end_time = decay_end_time;
        self
    }

    pub fn with_input(mut self, input: DutchInput) -> Self {
        self.0.input = input;
        self
    }

    pub fn with_output(mut self, output: DutchOutput) -> Self {
        self.0.outputs.push(output);
        self
    }

    pub fn build(self) -> DutchOrder {
        self.0
    }
}

#[derive(Clone, Default, Debug)]
pub struct BlockDutchOrderBuilder(BlockDutchOrder);

impl BlockDutchOrderBuilder {
    pub fn with_reactor(mut self, reactor: Address) -> Self {
        self.0.info.reactor = reactor;
        self
    }

    pub fn with_swapper(mut self, swapper: Address) -> Self {
        self.0.info.swapper = swapper;
        self
    }

    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.0.info.nonce = nonce;
        self
    }

    pub fn with_deadline(mut self, deadline: u64) -> Self {
        self.0.info.deadline = deadline;
        self
    }

    pub fn with_decay_start_block(mut self, decay_start_block: u64) -> Self {
        self.0.decay_start_block = decay_start_block;
        self
    }

    pub fn with_input(mut self, input: BlockDutchInput) -> Self {
        self.0.input = input;
        self
    }

    pub fn with_output(mut self, output: BlockDutchOutput) -> Self {
        self.0.outputs.push(output);
        self
    }

    pub fn build(self) -> BlockDutchOrder {
        self.0
    }
}

impl From<&OrderInfo> for contracts::OrderInfo {
    fn from(info: &OrderInfo) -> Self {
        Self {
            reactor: info.reactor,
            swapper: info.swapper,
            nonce: info.nonce,
            deadline: U256::from(info.deadline),
        }
    }
}

impl TryFrom<contracts::OrderInfo> for OrderInfo {
    type Error = OrderCodecError;

    fn try_from(info: contracts::OrderInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            reactor: info.reactor,
            swapper: info.swapper,
            nonce: info.nonce,
            deadline: into_u64(info.deadline)?,
        })
    }
}

impl From<&DutchOrder> for contracts::DutchOrder {
    fn from(order: &DutchOrder) -> Self {
        Self {
            info: (&order.info).into(),
            decayStartTime: U256::from(order.decay_start_time),
            decayEndTime: U256::from(order.decay_end_time),
            input: contracts::DutchInput {
                token: order.input.token,
                startAmount: order.input.start_amount,
                endAmount: order.input.end_amount,
            },
            outputs: order
                .outputs
                .iter()
                .map(|output| contracts::DutchOutput {
                    token: output.token,
                    startAmount: output.start_amount,
                    endAmount: output.end_amount,
                    recipient: output.recipient,
                })
                .collect(),
        }
    }
}

impl TryFrom<contracts::DutchOrder> for DutchOrder {
    type Error = OrderCodecError;

    fn try_from(order: contracts::DutchOrder) -> Result<Self, Self::Error> {
        Ok(Self {
            info: order.info.try_into()?,
            decay_start_time: into_u64(order.decayStartTime)?,
            decay_end_time: into_u64(order.decayEndTime)?,
            input: DutchInput {
                token: order.input.token,
                start_amount: order.input.startAmount,
                end_amount: order.input.endAmount,
            },
            outputs: order
                .outputs
                .into_iter()
                .map(|output| DutchOutput {
                    token: output.token,
                    start_amount: output.startAmount,
                    end_amount: output.endAmount,
                    recipient: output.recipient,
                })
                .collect(),
        })
    }
}

impl TryFrom<&BlockDutchOrder> for contracts::BlockDutchOrder {
    type Error = DecayError;

    fn try_from(order: &BlockDutchOrder) -> Result<Self, Self::Error> {
        let curve = |curve: &DecayCurve| {
            Ok(contracts::PiecewiseCurve {
                relativeBlocks: curve.pack_relative_blocks()?,
                relativeAmounts: curve.relative_amounts.clone(),
            })
        };
        Ok(Self {
            info: (&order.info).into(),
            decayStartBlock: U256::from(order.decay_start_block),
            input: contracts::BlockDutchInput {
                token: order.input.token,
                startAmount: order.input.start_amount,
                curve: curve(&order.input.curve)?,
            },
            outputs: order
                .outputs
                .iter()
                .map(|output| {
                    Ok(contracts::BlockDutchOutput {
                        token: output.token,
                        startAmount: output.start_amount,
                        curve: curve(&output.curve)?,
                        recipient: output.recipient,
                    })
                })
                .collect::<Result<_, DecayError>>()?,
        })
    }
}

impl TryFrom<contracts::BlockDutchOrder> for BlockDutchOrder {
    type Error = OrderCodecError;

    fn try_from(order: contracts::BlockDutchOrder) -> Result<Self, Self::Error> {
        let curve = |curve: contracts::PiecewiseCurve| {
            DecayCurve::unpack(curve.relativeBlocks, curve.relativeAmounts)
        };
        Ok(Self {
            info: order.info.try_into()?,
            decay_start_block: into_u64(order.decayStartBlock)?,
            input: BlockDutchInput {
                token: order.input.token,
                start_amount: order.input.startAmount,
                curve: curve(order.input.curve)?,
            },
            outputs: order
                .outputs
                .into_iter()
                .map(|output| {
                    Ok(BlockDutchOutput {
                        token: output.token,
                        start_amount: output.startAmount,
                        curve: curve(output.curve)?,
                        recipient: output.recipient,
                    })
                })
                .collect::<Result<_, OrderCodecError>>()?,
        })
    }
}

fn into_u64(value: U256) -> Result<u64, OrderCodecError> {
    u64::try_from(value).map_err(|_| OrderCodecError::FieldOverflow)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy_primitives::{I256, address},
        contracts::deployments::{networks, reactor},
    };

    fn dutch_order() -> DutchOrder {
        DutchOrderBuilder::default()
            .with_reactor(reactor(networks::MAINNET).unwrap())
            .with_swapper(address!("0x1111111111111111111111111111111111111111"))
            .with_nonce(U256::from(1337u64))
            .with_deadline(1_700_000_120)
            .with_decay_start_time(1_700_000_000)
            .with_decay_end_time(1_700_000_100)
            .with_input(DutchInput {
                token: address!("0x2222222222222222222222222222222222222222"),
                start_amount: U256::from(1_000_000u64),
                end_amount: U256::from(1_000_000u64),
            })
            .with_output(DutchOutput {
                token: address!("0x3333333333333333333333333333333333333333"),
                start_amount: U256::from(200_000_000u64),
                end_amount: U256::from(100_000_000u64),
                recipient: address!("0x1111111111111111111111111111111111111111"),
            })
            .build()
    }

    fn block_dutch_order() -> BlockDutchOrder {
        let curve = DecayCurve::new(
            vec![10, 20],
            vec![I256::try_from(20i64).unwrap(), I256::try_from(60i64).unwrap()],
        )
        .unwrap();
        BlockDutchOrderBuilder::default()
            .with_reactor(address!("0x00000011F84B9aa48e5f8aA8B9897600006289Be"))
            .with_swapper(address!("0x1111111111111111111111111111111111111111"))
            .with_nonce(U256::from(42u64))
            .with_deadline(1_700_000_120)
            .with_decay_start_block(1_000)
            .with_input(BlockDutchInput {
                token: address!("0x2222222222222222222222222222222222222222"),
                start_amount: U256::from(1_000_000u64),
                curve: DecayCurve::default(),
            })
            .with_output(BlockDutchOutput {
                token: address!("0x3333333333333333333333333333333333333333"),
                start_amount: U256::from(100u64),
                curve,
                recipient: address!("0x1111111111111111111111111111111111111111"),
            })
            .build()
    }

    #[test]
    fn dutch_order_abi_round_trip() {
        let order = dutch_order();
        let decoded = DutchOrder::abi_decode(&order.abi_encode()).unwrap();
        assert_eq!(decoded, order);
    }

    #[test]
    fn block_dutch_order_abi_round_trip() {
        let order = block_dutch_order();
        let decoded = BlockDutchOrder::abi_decode(&order.abi_encode().unwrap()).unwrap();
        assert_eq!(decoded, order);
    }

    #[test]
    fn decoding_garbage_fails() {
        assert!(matches!(
            DutchOrder::abi_decode(&[0x13, 0x37]),
            Err(OrderCodecError::Abi(_)),
        ));
    }

    #[test]
    fn decoding_oversized_timestamp_fails() {
        let mut wire = contracts::DutchOrder::from(&dutch_order());
        wire.info.deadline = U256::MAX;
        assert!(matches!(
            DutchOrder::abi_decode(&wire.abi_encode()),
            Err(OrderCodecError::FieldOverflow),
        ));
    }

    #[test]
    fn resolves_decayed_amounts() {
        let order = dutch_order();
        let resolved = order.resolve(1_700_000_050);
        // Constant input does not decay; the output is half way through.
        assert_eq!(resolved.input.amount, U256::from(1_000_000u64));
        assert_eq!(resolved.outputs[0].amount, U256::from(150_000_000u64));
    }

    #[test]
    fn resolves_block_decayed_amounts() {
        let order = block_dutch_order();
        let resolved = order.resolve(1_015).unwrap();
        assert_eq!(resolved.input.amount, U256::from(1_000_000u64));
        assert_eq!(resolved.outputs[0].amount, U256::from(60u64));
    }

    #[test]
    fn oversized_curve_fails_resolution() {
        let mut order = block_dutch_order();
        order.outputs[0].curve = DecayCurve {
            relative_blocks: vec![0; 17],
            relative_amounts: vec![I256::ZERO; 17],
        };
        assert!(matches!(
            order.resolve(1_015),
            Err(DecayError::TooManyPoints(17)),
        ));
        assert!(matches!(
            order.abi_encode(),
            Err(OrderCodecError::Decay(DecayError::TooManyPoints(17))),
        ));
    }

    #[test]
    fn serialization_round_trip() {
        let signed = SignedOrder {
            order: Order::BlockDutch(block_dutch_order()),
            signature: vec![0x01, 0x02, 0x03].into(),
        };
        let json = serde_json::to_string(&signed).unwrap();
        assert_eq!(serde_json::from_str::<SignedOrder>(&json).unwrap(), signed);
    }
}
