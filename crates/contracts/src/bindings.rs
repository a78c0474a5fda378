//! `sol!` bindings for the reactor order structs, the quoter entry point and
//! the nonce registry.
//!
//! Orders cross the wire as `abi.encode(order)` of the structs below, so the
//! generated codec doubles as the SDK's order serialization. The error
//! definitions are the revert vocabulary a fill simulation can bubble up;
//! their selectors feed the order validation classifier.

use alloy_sol_types::sol;

sol! {
    /// Metadata common to every order variant.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct OrderInfo {
        address reactor;
        address swapper;
        uint256 nonce;
        uint256 deadline;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct DutchInput {
        address token;
        uint256 startAmount;
        uint256 endAmount;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct DutchOutput {
        address token;
        uint256 startAmount;
        uint256 endAmount;
        address recipient;
    }

    /// Order whose amounts decay linearly in time.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct DutchOrder {
        OrderInfo info;
        uint256 decayStartTime;
        uint256 decayEndTime;
        DutchInput input;
        DutchOutput[] outputs;
    }

    /// Piecewise decay schedule. `relativeBlocks` packs up to 16 cumulative
    /// 16-bit block offsets, lowest bits first; `relativeAmounts` holds the
    /// matching cumulative decrements from the start amount.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct PiecewiseCurve {
        uint256 relativeBlocks;
        int256[] relativeAmounts;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlockDutchInput {
        address token;
        uint256 startAmount;
        PiecewiseCurve curve;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlockDutchOutput {
        address token;
        uint256 startAmount;
        PiecewiseCurve curve;
        address recipient;
    }

    /// Order whose amounts decay along a block-indexed piecewise curve.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlockDutchOrder {
        OrderInfo info;
        uint256 decayStartBlock;
        BlockDutchInput input;
        BlockDutchOutput[] outputs;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct ResolvedInput {
        address token;
        uint256 amount;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct ResolvedOutput {
        address token;
        uint256 amount;
        address recipient;
    }

    /// An order with its decay applied at the simulated timestamp/block.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct ResolvedOrder {
        OrderInfo info;
        ResolvedInput input;
        ResolvedOutput[] outputs;
        bytes32 orderHash;
    }

    /// Simulates resolving and filling an encoded signed order against
    /// current chain state, reverting with the reactor's error when the
    /// order is not fillable.
    interface IOrderQuoter {
        function quote(
            bytes calldata order,
            bytes calldata sig
        ) external returns (ResolvedOrder memory result);
    }

    /// Permit2-style unordered nonce registry. A nonce is spent by setting
    /// bit `nonce & 0xff` of the owner's word `nonce >> 8`; bits are never
    /// cleared.
    interface INonceRegistry {
        function nonceBitmap(
            address owner,
            uint256 word
        ) external view returns (uint256 bitmap);
    }

    // Reactor reverts.
    error DeadlinePassed();
    error OrderAlreadyFilled();
    error OrderCancelled();
    error EndTimeBeforeStartTime();
    error DeadlineBeforeEndTime();
    error IncorrectAmounts();
    error InputAndOutputDecay();
    error InvalidDecayCurve();
    error InvalidReactor();

    // Signature transfer reverts bubbled through the reactor.
    error InvalidSigner();
    error SignatureExpired(uint256 signatureDeadline);
    error InvalidNonce();

    // Token reverts observed when pulling the input.
    error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
    error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed);
}

#[cfg(test)]
mod tests {
    use {super::*, alloy_sol_types::SolError, hex_literal::hex};

    #[test]
    fn permit2_selectors_match_deployed_bytecode() {
        // Selectors of the shared permit2 errors are pinned on-chain.
        assert_eq!(InvalidNonce::SELECTOR, hex!("756688fe"));
        assert_eq!(InvalidSigner::SELECTOR, hex!("815e1d64"));
        assert_eq!(SignatureExpired::SELECTOR, hex!("cd21db4f"));
    }
}
