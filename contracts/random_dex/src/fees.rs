//! Fee engine.
//!
//! ```text
//! sender market? │ recipient market? │ side  │ rate
//! ───────────────┼───────────────────┼───────┼──────────────────────────
//!      yes       │        no         │ BUY   │ schedule.buy  / denominator
//!      no        │        yes        │ SELL  │ schedule.sell / denominator
//!      no        │        no         │   —   │ 0
//!      yes       │        yes        │   —   │ 0
//!
//! schedule = antibot  while now < antibot_end_at
//!          = normal   afterwards
//! ```
//!
//! Only the normal schedule is bounded by `maximum_numerator`. The antibot
//! schedule is taken as given at construction and never re-validated.

use crate::errors::Error;
use crate::{Balance, Timestamp};

/// Buy/sell rates in units of `1 / denominator`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct FeeSchedule {
    pub buy: u16,
    pub sell: u16,
}

impl FeeSchedule {
    pub const fn new(buy: u16, sell: u16) -> Self {
        Self { buy, sell }
    }

    pub fn rate(&self, side: TradeSide) -> u16 {
        match side {
            TradeSide::Buy => self.buy,
            TradeSide::Sell => self.sell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    /// Tokens leave a market participant.
    Buy,
    /// Tokens enter a market participant.
    Sell,
}

impl TradeSide {
    /// `None` when the transfer is fee-free.
    pub fn classify(sender_is_market: bool, recipient_is_market: bool) -> Option<Self> {
        match (sender_is_market, recipient_is_market) {
            (true, false) => Some(TradeSide::Buy),
            (false, true) => Some(TradeSide::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct FeeEngine {
    normal: FeeSchedule,
    antibot: FeeSchedule,
    maximum_numerator: u16,
    denominator: u16,
    antibot_end_at: Timestamp,
}

impl FeeEngine {
    pub fn new(
        maximum_numerator: u16,
        denominator: u16,
        normal: FeeSchedule,
        antibot: FeeSchedule,
        antibot_end_at: Timestamp,
    ) -> Result<Self, Error> {
        if denominator == 0 {
            return Err(Error::InvalidFeeConfig);
        }
        ensure_within_cap(&normal, maximum_numerator)?;
        Ok(Self {
            normal,
            antibot,
            maximum_numerator,
            denominator,
            antibot_end_at,
        })
    }

    pub fn normal(&self) -> FeeSchedule {
        self.normal
    }

    pub fn antibot(&self) -> FeeSchedule {
        self.antibot
    }

    pub fn maximum_numerator(&self) -> u16 {
        self.maximum_numerator
    }

    pub fn denominator(&self) -> u16 {
        self.denominator
    }

    pub fn antibot_end_at(&self) -> Timestamp {
        self.antibot_end_at
    }

    pub fn is_antibot_active(&self, now: Timestamp) -> bool {
        now < self.antibot_end_at
    }

    pub fn active_schedule(&self, now: Timestamp) -> FeeSchedule {
        if self.is_antibot_active(now) {
            self.antibot
        } else {
            self.normal
        }
    }

    /// `floor(amount * rate / denominator)` for the side the transfer falls
    /// on, zero when it falls on neither.
    pub fn compute_fee(
        &self,
        amount: Balance,
        sender_is_market: bool,
        recipient_is_market: bool,
        now: Timestamp,
    ) -> Result<Balance, Error> {
        let side = match TradeSide::classify(sender_is_market, recipient_is_market) {
            Some(side) => side,
            None => return Ok(0),
        };
        let rate = self.active_schedule(now).rate(side);
        scale_by_rate(amount, rate, self.denominator)
    }

    /// `(fee, net)` where `net` is what the recipient receives.
    pub fn quote(
        &self,
        amount: Balance,
        sender_is_market: bool,
        recipient_is_market: bool,
        now: Timestamp,
    ) -> Result<(Balance, Balance), Error> {
        let fee = self.compute_fee(amount, sender_is_market, recipient_is_market, now)?;
        let net = amount.checked_sub(fee).ok_or(Error::Overflow)?;
        Ok((fee, net))
    }

    /// Replaces the normal schedule. Leaves the engine untouched on error.
    pub fn update_fees(&mut self, schedule: FeeSchedule) -> Result<(), Error> {
        ensure_within_cap(&schedule, self.maximum_numerator)?;
        self.normal = schedule;
        Ok(())
    }
}

fn ensure_within_cap(schedule: &FeeSchedule, maximum_numerator: u16) -> Result<(), Error> {
    if schedule.buy > maximum_numerator || schedule.sell > maximum_numerator {
        return Err(Error::FeeCapExceeded);
    }
    Ok(())
}

/// Exact `floor(amount * rate / denominator)` without forming the full
/// product: with `amount = q * d + r` the result is `q * rate + r * rate / d`.
fn scale_by_rate(amount: Balance, rate: u16, denominator: u16) -> Result<Balance, Error> {
    let rate = Balance::from(rate);
    let denominator = Balance::from(denominator);
    let whole = (amount / denominator)
        .checked_mul(rate)
        .ok_or(Error::Overflow)?;
    let part = (amount % denominator) * rate / denominator;
    whole.checked_add(part).ok_or(Error::Overflow)
}
