//! Classification of fill simulation outcomes.

use {
    alloy_sol_types::SolError,
    std::{collections::HashMap, sync::LazyLock},
};

/// The validation outcome for a single signed order.
///
/// Variants are ordered by reporting precedence: when a batch needs a single
/// headline verdict, the smallest one wins.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum OrderValidation {
    Expired,
    AlreadyFilled,
    Cancelled,
    InsufficientFunds,
    InvalidSignature,
    InvalidOrderFields,
    UnknownError,
    Ok,
}

/// Revert selector to verdict mapping, kept as data so a new reactor
/// version's vocabulary extends the table without touching call sites.
static SELECTOR_VERDICTS: LazyLock<HashMap<[u8; 4], OrderValidation>> = LazyLock::new(|| {
    use OrderValidation::*;
    HashMap::from([
        (contracts::DeadlinePassed::SELECTOR, Expired),
        (contracts::SignatureExpired::SELECTOR, Expired),
        (contracts::OrderAlreadyFilled::SELECTOR, AlreadyFilled),
        (contracts::OrderCancelled::SELECTOR, Cancelled),
        // The nonce registry cannot tell a cancelled nonce from a filled
        // one; explicit invalidation is the common cause.
        (contracts::InvalidNonce::SELECTOR, Cancelled),
        (contracts::ERC20InsufficientBalance::SELECTOR, InsufficientFunds),
        (
            contracts::ERC20InsufficientAllowance::SELECTOR,
            InsufficientFunds,
        ),
        (contracts::InvalidSigner::SELECTOR, InvalidSignature),
        (contracts::EndTimeBeforeStartTime::SELECTOR, InvalidOrderFields),
        (contracts::DeadlineBeforeEndTime::SELECTOR, InvalidOrderFields),
        (contracts::IncorrectAmounts::SELECTOR, InvalidOrderFields),
        (contracts::InputAndOutputDecay::SELECTOR, InvalidOrderFields),
        (contracts::InvalidDecayCurve::SELECTOR, InvalidOrderFields),
        (contracts::InvalidReactor::SELECTOR, InvalidOrderFields),
    ])
});

/// Legacy tokens revert with `Error(string)` instead of typed errors; these
/// reason substrings indicate the swapper cannot fund the input transfer.
const INSUFFICIENT_FUNDS_REASONS: &[&str] = &[
    "TRANSFER_FROM_FAILED",
    "transfer amount exceeds balance",
    "insufficient allowance",
];

/// Maps the raw revert data of a failed fill simulation to a verdict.
/// Unrecognized payloads, including empty ones, are [`OrderValidation::UnknownError`].
pub fn classify_revert(revert_data: &[u8]) -> OrderValidation {
    if let Ok(revert) = alloy_sol_types::Revert::abi_decode(revert_data) {
        if INSUFFICIENT_FUNDS_REASONS
            .iter()
            .any(|reason| revert.reason.contains(reason))
        {
            return OrderValidation::InsufficientFunds;
        }
        return OrderValidation::UnknownError;
    }

    revert_data
        .get(..4)
        .and_then(|selector| <[u8; 4]>::try_from(selector).ok())
        .and_then(|selector| SELECTOR_VERDICTS.get(&selector).copied())
        .unwrap_or(OrderValidation::UnknownError)
}

#[cfg(test)]
mod tests {
    use {super::*, alloy_primitives::{Address, U256}};

    #[test]
    fn classifies_reactor_errors() {
        for (revert, expected) in [
            (
                contracts::DeadlinePassed {}.abi_encode(),
                OrderValidation::Expired,
            ),
            (
                contracts::SignatureExpired {
                    signatureDeadline: U256::from(1_700_000_000u64),
                }
                .abi_encode(),
                OrderValidation::Expired,
            ),
            (
                contracts::OrderAlreadyFilled {}.abi_encode(),
                OrderValidation::AlreadyFilled,
            ),
            (
                contracts::OrderCancelled {}.abi_encode(),
                OrderValidation::Cancelled,
            ),
            (
                contracts::InvalidNonce {}.abi_encode(),
                OrderValidation::Cancelled,
            ),
            (
                contracts::InvalidSigner {}.abi_encode(),
                OrderValidation::InvalidSignature,
            ),
            (
                contracts::EndTimeBeforeStartTime {}.abi_encode(),
                OrderValidation::InvalidOrderFields,
            ),
            (
                contracts::InvalidDecayCurve {}.abi_encode(),
                OrderValidation::InvalidOrderFields,
            ),
            (
                contracts::ERC20InsufficientBalance {
                    sender: Address::ZERO,
                    balance: U256::ZERO,
                    needed: U256::from(1u64),
                }
                .abi_encode(),
                OrderValidation::InsufficientFunds,
            ),
        ] {
            assert_eq!(classify_revert(&revert), expected, "{revert:?}");
        }
    }

    #[test]
    fn classifies_reason_strings() {
        for (reason, expected) in [
            ("TRANSFER_FROM_FAILED", OrderValidation::InsufficientFunds),
            (
                "ERC20: transfer amount exceeds balance",
                OrderValidation::InsufficientFunds,
            ),
            (
                "Dai/insufficient allowance",
                OrderValidation::InsufficientFunds,
            ),
            ("nope", OrderValidation::UnknownError),
        ] {
            let revert = alloy_sol_types::Revert {
                reason: reason.to_string(),
            }
            .abi_encode();
            assert_eq!(classify_revert(&revert), expected, "{reason}");
        }
    }

    #[test]
    fn unrecognized_payloads_are_unknown() {
        assert_eq!(classify_revert(&[]), OrderValidation::UnknownError);
        assert_eq!(classify_revert(&[0x13]), OrderValidation::UnknownError);
        assert_eq!(
            classify_revert(&[0xde, 0xad, 0xbe, 0xef]),
            OrderValidation::UnknownError,
        );
    }

    #[test]
    fn precedence_follows_declaration_order() {
        assert!(OrderValidation::Expired < OrderValidation::Cancelled);
        assert!(OrderValidation::UnknownError < OrderValidation::Ok);
        // The headline verdict of a batch is its most final element.
        let verdicts = [
            OrderValidation::Ok,
            OrderValidation::Cancelled,
            OrderValidation::UnknownError,
        ];
        assert_eq!(
            verdicts.iter().min(),
            Some(&OrderValidation::Cancelled),
        );
    }
}
