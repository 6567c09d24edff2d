#![cfg_attr(not(feature = "std"), no_std, no_main)]

//! # RandomDEX (RDX) — Fee-Bearing Token Ledger
//!
//! **Role:** Ground-truth ledger for RDX (18 decimals), pre-listing transfer
//! gate, buy/sell fee collector and fee settlement through an exchange
//! router.
//!
//! ## Transfer pipeline
//!
//! ```text
//! transfer / transfer_from
//!   1. Transfer gate     caller may move tokens now?         TransferRestricted
//!   2. Sufficiency       allowance (delegated), balance      InsufficientAllowance / InsufficientBalance
//!   3. Fee engine        fee for (sender, recipient, now)
//!   4. Apply             sender −amount, recipient +(amount − fee), self +fee
//! ```
//!
//! Every check runs before the first write, so a failed transfer leaves no
//! trace.
//!
//! ## Two clocks
//!
//! | Boundary         | Before                                 | After (permanent)        |
//! |------------------|----------------------------------------|--------------------------|
//! | `antibot_end_at` | antibot schedule (e.g. 25%)            | normal schedule (≤ cap)  |
//! | `listing_at`     | only `AllowedPreListingTransfer` callers | everyone               |
//!
//! ## Fee accumulator
//!
//! Fees accrue to the contract's own balance. `claim_in_base` pays it out to
//! the fee collector in RDX; `claim_via_exchange` funds the router with it
//! and swaps it into the base currency for the collector.

pub mod errors;
pub mod fees;
pub mod gate;
pub mod roles;
pub mod settlement;

pub type Balance = u128;
pub type Timestamp = u64;

pub use errors::Error;
pub use fees::{FeeEngine, FeeSchedule, TradeSide};
pub use gate::{ListingState, TransferGate};
pub use roles::{Role, RoleRegistry};
pub use settlement::{ClaimRoute, ExchangeAdapter, ExchangeRoute, RouterCall, SwapError, SwapRequest};

#[ink::contract]
mod random_dex {
    use ink::prelude::string::String;
    use ink::storage::Mapping;

    use crate::errors::Error;
    use crate::fees::{FeeEngine, FeeSchedule};
    use crate::gate::{ListingState, TransferGate};
    use crate::roles::{Role, RoleRegistry};
    use crate::settlement::{ClaimRoute, ExchangeAdapter, ExchangeRoute, RouterCall, SwapRequest};

    // =========================================================================
    // CONSTANTS
    // =========================================================================

    pub const TOKEN_NAME: &str = "RandomDEX";
    pub const TOKEN_SYMBOL: &str = "RDX";
    pub const TOKEN_DECIMALS: u8 = 18;

    /// Allowance value that `transfer_from` never decrements.
    pub const UNLIMITED_ALLOWANCE: Balance = Balance::MAX;

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct RandomDex {
        // ── Ledger ────────────────────────────────────────────────────────
        balances: Mapping<AccountId, Balance>,
        allowances: Mapping<(AccountId, AccountId), Balance>,
        total_supply: Balance,
        total_minted: Balance,
        total_burned: Balance,

        // ── Access control ────────────────────────────────────────────────
        roles: RoleRegistry,

        // ── Transfer gate & fees ──────────────────────────────────────────
        gate: TransferGate,
        fees: FeeEngine,

        // ── Settlement ────────────────────────────────────────────────────
        fee_collector: AccountId,
        exchange: ExchangeRoute,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// `from: None` is a mint, `to: None` a burn. A fee-bearing transfer
    /// emits two: the net leg to the recipient and the fee leg to the
    /// contract.
    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)]
        from: Option<AccountId>,
        #[ink(topic)]
        to: Option<AccountId>,
        value: Balance,
    }

    #[ink(event)]
    pub struct Approval {
        #[ink(topic)]
        owner: AccountId,
        #[ink(topic)]
        spender: AccountId,
        value: Balance,
    }

    #[ink(event)]
    pub struct RoleGranted {
        #[ink(topic)]
        role: Role,
        #[ink(topic)]
        account: AccountId,
        sender: AccountId,
    }

    #[ink(event)]
    pub struct RoleRevoked {
        #[ink(topic)]
        role: Role,
        #[ink(topic)]
        account: AccountId,
        sender: AccountId,
    }

    #[ink(event)]
    pub struct FeesUpdated {
        buy: u16,
        sell: u16,
    }

    #[ink(event)]
    pub struct FeeCollectorUpdated {
        previous: AccountId,
        #[ink(topic)]
        fee_collector: AccountId,
    }

    #[ink(event)]
    pub struct ListingTimestampUpdated {
        previous: Timestamp,
        listing_at: Timestamp,
    }

    /// Emitted once per successful claim. `amount` is the RDX drained from
    /// the accumulator.
    #[ink(event)]
    pub struct FeeClaimed {
        amount: Balance,
        #[ink(topic)]
        collector: AccountId,
        route: ClaimRoute,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl RandomDex {
        /// Deploy the ledger with zero supply.
        ///
        /// `admin` receives `Role::Admin` and nothing else; minters, burners,
        /// pre-listing senders and market participants are granted
        /// afterwards.
        ///
        /// # Errors
        /// - [`Error::InvalidFeeConfig`] — `denominator` is zero.
        /// - [`Error::FeeCapExceeded`]   — `fees` exceeds `maximum_numerator`.
        #[ink(constructor)]
        #[allow(clippy::too_many_arguments)]
        pub fn new(
            admin: AccountId,
            fee_collector: AccountId,
            maximum_numerator: u16,
            denominator: u16,
            fees: FeeSchedule,
            antibot_fees: FeeSchedule,
            antibot_end_at: Timestamp,
            exchange: ExchangeRoute,
            listing_at: Timestamp,
        ) -> Result<Self, Error> {
            let fees = FeeEngine::new(maximum_numerator, denominator, fees, antibot_fees, antibot_end_at)?;

            Self::env().emit_event(RoleGranted {
                role: Role::Admin,
                account: admin,
                sender: Self::env().caller(),
            });

            Ok(Self {
                balances: Mapping::default(),
                allowances: Mapping::default(),
                total_supply: 0,
                total_minted: 0,
                total_burned: 0,
                roles: RoleRegistry::with_admin(admin),
                gate: TransferGate::new(listing_at),
                fees,
                fee_collector,
                exchange,
            })
        }

        // =====================================================================
        // SUPPLY — Mint & Burn
        // =====================================================================

        /// Mint bypasses the transfer gate and the fee engine.
        #[ink(message)]
        pub fn mint(&mut self, to: AccountId, value: Balance) -> Result<(), Error> {
            self.ensure_role(Role::Minter)?;

            let total_supply = self.total_supply.checked_add(value).ok_or(Error::Overflow)?;
            let total_minted = self.total_minted.checked_add(value).ok_or(Error::Overflow)?;

            self.total_supply = total_supply;
            self.total_minted = total_minted;
            self.credit_balance(to, value);

            self.env().emit_event(Transfer {
                from: None,
                to: Some(to),
                value,
            });
            Ok(())
        }

        /// Burn from any account; no allowance is consulted.
        #[ink(message)]
        pub fn burn(&mut self, from: AccountId, value: Balance) -> Result<(), Error> {
            self.ensure_role(Role::Burner)?;

            let balance = self.balance_of(from);
            if balance < value {
                return Err(Error::InsufficientBalance);
            }

            self.balances.insert(from, &(balance - value));
            self.total_supply = self.total_supply.saturating_sub(value);
            self.total_burned = self.total_burned.saturating_add(value);

            self.env().emit_event(Transfer {
                from: Some(from),
                to: None,
                value,
            });
            Ok(())
        }

        // =====================================================================
        // PSP22 — Standard Token Interface
        // =====================================================================

        #[ink(message)]
        pub fn name(&self) -> String { String::from(TOKEN_NAME) }

        #[ink(message)]
        pub fn symbol(&self) -> String { String::from(TOKEN_SYMBOL) }

        #[ink(message)]
        pub fn decimals(&self) -> u8 { TOKEN_DECIMALS }

        #[ink(message)]
        pub fn total_supply(&self) -> Balance { self.total_supply }

        #[ink(message)]
        pub fn total_minted(&self) -> Balance { self.total_minted }

        #[ink(message)]
        pub fn total_burned(&self) -> Balance { self.total_burned }

        #[ink(message)]
        pub fn balance_of(&self, account: AccountId) -> Balance {
            self.balances.get(account).unwrap_or(0)
        }

        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, value: Balance) -> Result<(), Error> {
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval { owner, spender, value });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, value: Balance) -> Result<(), Error> {
            let caller = self.env().caller();
            self.ensure_transfer_permitted(caller)?;
            self.transfer_impl(caller, to, value)
        }

        /// The gate is evaluated against the spender (the caller), not the
        /// owner. The allowance drops by the gross `value`, fee included.
        #[ink(message)]
        pub fn transfer_from(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            let caller = self.env().caller();
            self.ensure_transfer_permitted(caller)?;

            let current_allowance = self.allowance(from, caller);
            if current_allowance < value {
                return Err(Error::InsufficientAllowance);
            }

            self.transfer_impl(from, to, value)?;

            if current_allowance != UNLIMITED_ALLOWANCE {
                self.allowances
                    .insert((from, caller), &(current_allowance - value));
            }
            Ok(())
        }

        // =====================================================================
        // ACCESS CONTROL
        // =====================================================================

        #[ink(message)]
        pub fn has_role(&self, role: Role, account: AccountId) -> bool {
            self.roles.has(role, account)
        }

        #[ink(message)]
        pub fn grant_role(&mut self, role: Role, account: AccountId) -> Result<(), Error> {
            let sender = self.env().caller();
            if self.roles.grant(sender, role, account)? {
                self.env().emit_event(RoleGranted { role, account, sender });
            }
            Ok(())
        }

        #[ink(message)]
        pub fn revoke_role(&mut self, role: Role, account: AccountId) -> Result<(), Error> {
            let sender = self.env().caller();
            if self.roles.revoke(sender, role, account)? {
                self.env().emit_event(RoleRevoked { role, account, sender });
            }
            Ok(())
        }

        #[ink(message)]
        pub fn renounce_role(&mut self, role: Role) {
            let sender = self.env().caller();
            if self.roles.renounce(sender, role) {
                self.env().emit_event(RoleRevoked {
                    role,
                    account: sender,
                    sender,
                });
            }
        }

        // =====================================================================
        // FEES
        // =====================================================================

        /// Replace the normal schedule. Each side is capped at
        /// `maximum_numerator`; the antibot schedule cannot be changed.
        #[ink(message)]
        pub fn update_fees(&mut self, fees: FeeSchedule) -> Result<(), Error> {
            self.ensure_role(Role::Admin)?;
            self.fees.update_fees(fees)?;
            self.env().emit_event(FeesUpdated {
                buy: fees.buy,
                sell: fees.sell,
            });
            Ok(())
        }

        #[ink(message)]
        pub fn update_fee_collector(&mut self, fee_collector: AccountId) -> Result<(), Error> {
            self.ensure_role(Role::Admin)?;
            let previous = self.fee_collector;
            self.fee_collector = fee_collector;
            self.env().emit_event(FeeCollectorUpdated {
                previous,
                fee_collector,
            });
            Ok(())
        }

        /// Normal schedule.
        #[ink(message)]
        pub fn fees(&self) -> FeeSchedule { self.fees.normal() }

        #[ink(message)]
        pub fn antibot_fees(&self) -> FeeSchedule { self.fees.antibot() }

        /// Schedule applied to a transfer in the current block.
        #[ink(message)]
        pub fn active_fees(&self) -> FeeSchedule {
            self.fees.active_schedule(self.env().block_timestamp())
        }

        #[ink(message)]
        pub fn maximum_numerator(&self) -> u16 { self.fees.maximum_numerator() }

        #[ink(message)]
        pub fn denominator(&self) -> u16 { self.fees.denominator() }

        #[ink(message)]
        pub fn antibot_end_at(&self) -> Timestamp { self.fees.antibot_end_at() }

        #[ink(message)]
        pub fn is_antibot_active(&self) -> bool {
            self.fees.is_antibot_active(self.env().block_timestamp())
        }

        #[ink(message)]
        pub fn fee_collector(&self) -> AccountId { self.fee_collector }

        /// `(fee, net)` a transfer of `value` from `from` to `to` would incur
        /// in the current block. Ignores the gate and balances.
        #[ink(message)]
        pub fn quote_fee(
            &self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(Balance, Balance), Error> {
            self.fees.quote(
                value,
                self.is_market(from),
                self.is_market(to),
                self.env().block_timestamp(),
            )
        }

        // =====================================================================
        // LISTING GATE
        // =====================================================================

        /// # Errors
        /// - [`Error::Unauthorized`]  — caller is not an admin.
        /// - [`Error::AlreadyListed`] — the current listing time has passed.
        #[ink(message)]
        pub fn set_listing_at(&mut self, listing_at: Timestamp) -> Result<(), Error> {
            self.ensure_role(Role::Admin)?;
            let now = self.env().block_timestamp();
            let previous = self.gate.reschedule(now, listing_at)?;
            self.env().emit_event(ListingTimestampUpdated {
                previous,
                listing_at,
            });
            Ok(())
        }

        #[ink(message)]
        pub fn listing_at(&self) -> Timestamp { self.gate.listing_at() }

        #[ink(message)]
        pub fn is_listed(&self) -> bool {
            self.gate.state(self.env().block_timestamp()) == ListingState::Listed
        }

        // =====================================================================
        // SETTLEMENT — Fee Accumulator → Collector
        // =====================================================================

        /// RDX currently held by the contract and awaiting settlement.
        #[ink(message)]
        pub fn claimable_fee(&self) -> Balance {
            self.balance_of(self.env().account_id())
        }

        #[ink(message)]
        pub fn exchange_route(&self) -> ExchangeRoute { self.exchange }

        /// Pay the whole accumulator to the fee collector in RDX.
        ///
        /// # Errors
        /// - [`Error::Unauthorized`]            — caller is not an admin.
        /// - [`Error::InsufficientClaimAmount`] — accumulator is empty.
        #[ink(message)]
        pub fn claim_in_base(&mut self) -> Result<Balance, Error> {
            self.ensure_role(Role::Admin)?;

            let treasury = self.env().account_id();
            let amount = self.balance_of(treasury);
            if amount == 0 {
                return Err(Error::InsufficientClaimAmount);
            }
            let collector = self.fee_collector;

            self.balances.insert(treasury, &0);
            self.credit_balance(collector, amount);

            self.env().emit_event(Transfer {
                from: Some(treasury),
                to: Some(collector),
                value: amount,
            });
            self.env().emit_event(FeeClaimed {
                amount,
                collector,
                route: ClaimRoute::Direct,
            });
            Ok(amount)
        }

        /// Swap the whole accumulator into the base currency through the
        /// configured router; proceeds go straight to the fee collector.
        /// Returns the base-currency amount delivered.
        ///
        /// The router re-enters `transfer` to move the funded RDX into its
        /// pool, so before listing it needs `AllowedPreListingTransfer`. It
        /// counts as a market participant, so that leg to the pool is
        /// fee-free and the accumulator stays at zero.
        ///
        /// # Errors
        /// - [`Error::Unauthorized`]            — caller is not an admin.
        /// - [`Error::InsufficientClaimAmount`] — accumulator is empty.
        /// - [`Error::ExchangeCallFailed`]      — the router call failed; the
        ///   accumulator is left intact.
        #[ink(message)]
        pub fn claim_via_exchange(&mut self) -> Result<Balance, Error> {
            let mut router = RouterCall::new(self.exchange.router);
            self.settle_through(&mut router)
        }

        /// Effects before the external call: the accumulator is emptied into
        /// the router's balance first, so a re-entrant call observes zero.
        /// A failed swap puts both balances back.
        ///
        /// Re-entrant calls only touch the `balances`/`allowances` mappings,
        /// never root storage fields, so nothing written during the swap is
        /// overwritten when this message returns.
        fn settle_through(&mut self, adapter: &mut dyn ExchangeAdapter) -> Result<Balance, Error> {
            self.ensure_role(Role::Admin)?;

            let treasury = self.env().account_id();
            let amount = self.balance_of(treasury);
            if amount == 0 {
                return Err(Error::InsufficientClaimAmount);
            }
            let collector = self.fee_collector;
            let router = adapter.router();
            let request = SwapRequest::new(
                &self.exchange,
                treasury,
                amount,
                collector,
                self.env().block_timestamp(),
            );

            // ── State update (before external call) ───────────────────────
            let router_balance = self.balance_of(router);
            self.balances.insert(treasury, &0);
            self.credit_balance(router, amount);

            let proceeds = match adapter.swap_exact_tokens_for_native(&request) {
                Ok(proceeds) => proceeds,
                Err(err) => {
                    self.balances.insert(router, &router_balance);
                    self.balances.insert(treasury, &amount);
                    return Err(err);
                }
            };

            self.env().emit_event(Transfer {
                from: Some(treasury),
                to: Some(router),
                value: amount,
            });
            self.env().emit_event(FeeClaimed {
                amount,
                collector,
                route: ClaimRoute::Exchange { proceeds },
            });
            Ok(proceeds)
        }

        // =====================================================================
        // INTERNAL HELPERS
        // =====================================================================

        fn ensure_role(&self, role: Role) -> Result<(), Error> {
            self.roles.ensure(role, self.env().caller())
        }

        /// The configured router is a market participant whether or not it
        /// holds the role.
        fn is_market(&self, account: AccountId) -> bool {
            account == self.exchange.router || self.roles.has(Role::MarketParticipant, account)
        }

        /// The listing state is re-derived from the block timestamp on every
        /// call.
        fn ensure_transfer_permitted(&self, caller: AccountId) -> Result<(), Error> {
            let now = self.env().block_timestamp();
            self.gate
                .check(now, self.roles.has(Role::AllowedPreListingTransfer, caller))
        }

        fn transfer_impl(&mut self, from: AccountId, to: AccountId, value: Balance) -> Result<(), Error> {
            let from_balance = self.balance_of(from);
            if from_balance < value {
                return Err(Error::InsufficientBalance);
            }

            let (fee, net) = self.fees.quote(
                value,
                self.is_market(from),
                self.is_market(to),
                self.env().block_timestamp(),
            )?;
            let treasury = self.env().account_id();

            self.balances.insert(from, &(from_balance - value));
            self.credit_balance(to, net);
            if fee > 0 {
                self.credit_balance(treasury, fee);
            }

            self.env().emit_event(Transfer {
                from: Some(from),
                to: Some(to),
                value: net,
            });
            if fee > 0 {
                self.env().emit_event(Transfer {
                    from: Some(from),
                    to: Some(treasury),
                    value: fee,
                });
            }
            Ok(())
        }

        /// Balances never exceed `total_supply`, so the addition cannot
        /// saturate.
        fn credit_balance(&mut self, account: AccountId, amount: Balance) {
            let balance = self.balance_of(account);
            self.balances.insert(account, &balance.saturating_add(amount));
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================
    //
    // Accounts:
    //   alice   = deployer / admin (+ AllowedPreListingTransfer)
    //   bob     = ordinary holder
    //   charlie = fee collector
    //   django  = DEX pair (MarketParticipant)
    //   eve     = minter
    //   frank   = burner
    //
    // Clock: antibot ends 20 min after START, listing 60 min after START.

}
