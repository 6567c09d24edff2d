//! Fee settlement through an external exchange router.
//!
//! The router is consumed through one message,
//!
//! ```text
//! swap_exact_tokens_for_native(
//!     amount_in:      Balance,        // RDX already credited to the router
//!     amount_out_min: Balance,        // minimum-output guard
//!     path:           Vec<AccountId>, // [RDX, base asset]
//!     to:             AccountId,      // receives the base-currency proceeds
//!     deadline:       Timestamp,
//! ) -> Result<Balance, SwapError>
//! ```
//!
//! and reached through [`ExchangeAdapter`] so the sequencing in the ledger
//! can be exercised off-chain against an in-memory router.

use ink::env::call::{build_call, ExecutionInput, Selector};
use ink::env::{CallFlags, DefaultEnvironment};
use ink::prelude::{vec, vec::Vec};
use ink::primitives::AccountId;

use crate::errors::Error;
use crate::{Balance, Timestamp};

/// Swap deadline relative to the claiming block (5 minutes).
pub const SWAP_DEADLINE_MS: Timestamp = 300_000;

/// Minimum base-currency output accepted for a fee swap.
pub const SWAP_AMOUNT_OUT_MIN: Balance = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct ExchangeRoute {
    /// Router contract the accumulator is swapped through.
    pub router: AccountId,
    /// Base-currency asset (wrapped native) at the end of the path.
    pub base_asset: AccountId,
}

impl ExchangeRoute {
    pub fn new(router: AccountId, base_asset: AccountId) -> Self {
        Self { router, base_asset }
    }

    pub fn path(&self, token: AccountId) -> Vec<AccountId> {
        vec![token, self.base_asset]
    }
}

/// How a claim was settled; carried by the `FeeClaimed` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum ClaimRoute {
    /// Collector credited in RDX.
    Direct,
    /// Swapped through the router; collector received `proceeds` in base
    /// currency.
    Exchange { proceeds: Balance },
}

/// Router-side failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum SwapError {
    Expired,
    InvalidPath,
    InsufficientLiquidity,
    InsufficientOutputAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub amount_in: Balance,
    pub amount_out_min: Balance,
    pub path: Vec<AccountId>,
    pub to: AccountId,
    pub deadline: Timestamp,
}

impl SwapRequest {
    pub fn new(route: &ExchangeRoute, token: AccountId, amount_in: Balance, to: AccountId, now: Timestamp) -> Self {
        Self {
            amount_in,
            amount_out_min: SWAP_AMOUNT_OUT_MIN,
            path: route.path(token),
            to,
            deadline: now.saturating_add(SWAP_DEADLINE_MS),
        }
    }
}

pub trait ExchangeAdapter {
    /// Account the claimed RDX is funded to before the swap.
    fn router(&self) -> AccountId;

    /// Swaps exactly `request.amount_in` and returns the base-currency
    /// amount delivered to `request.to`.
    fn swap_exact_tokens_for_native(&mut self, request: &SwapRequest) -> Result<Balance, Error>;
}

/// Cross-contract call into the configured router.
///
/// The claimed RDX is already on the router's balance when the call is made
/// and the contract grants it no allowance. A router that pulls its input
/// with `transfer_from(caller, ..)` finds nothing to draw and fails with
/// `InsufficientAllowance`; the router must `transfer` the funded balance on
/// to its pool itself.
pub struct RouterCall {
    router: AccountId,
}

impl RouterCall {
    pub fn new(router: AccountId) -> Self {
        Self { router }
    }
}

impl ExchangeAdapter for RouterCall {
    fn router(&self) -> AccountId {
        self.router
    }

    /// Re-entry is allowed so the router can `transfer` the funded RDX on to
    /// its pool during the swap.
    fn swap_exact_tokens_for_native(&mut self, request: &SwapRequest) -> Result<Balance, Error> {
        let result = build_call::<DefaultEnvironment>()
            .call(self.router)
            .call_flags(CallFlags::ALLOW_REENTRY)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!(
                    "swap_exact_tokens_for_native"
                )))
                .push_arg(request.amount_in)
                .push_arg(request.amount_out_min)
                .push_arg(&request.path)
                .push_arg(request.to)
                .push_arg(request.deadline),
            )
            .returns::<Result<Balance, SwapError>>()
            .try_invoke();

        match result {
            Ok(Ok(Ok(proceeds))) => Ok(proceeds),
            _ => Err(Error::ExchangeCallFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> ExchangeRoute {
        ExchangeRoute::new(AccountId::from([0xA0; 32]), AccountId::from([0xB0; 32]))
    }

    #[test]
    fn path_runs_token_to_base_asset() {
        let token = AccountId::from([0x01; 32]);
        assert_eq!(route().path(token), vec![token, AccountId::from([0xB0; 32])]);
    }

    #[test]
    fn request_carries_deadline_and_guard() {
        let token = AccountId::from([0x01; 32]);
        let collector = AccountId::from([0x02; 32]);
        let request = SwapRequest::new(&route(), token, 45, collector, 1_000);
        assert_eq!(request.amount_in, 45);
        assert_eq!(request.amount_out_min, SWAP_AMOUNT_OUT_MIN);
        assert_eq!(request.to, collector);
        assert_eq!(request.deadline, 1_000 + SWAP_DEADLINE_MS);
    }

    #[test]
    fn deadline_saturates() {
        let token = AccountId::from([0x01; 32]);
        let request = SwapRequest::new(&route(), token, 1, token, Timestamp::MAX);
        assert_eq!(request.deadline, Timestamp::MAX);
    }
}
