//! Transfer gate: the pre-listing restriction.
//!
//! ```text
//!   UNLISTED ──(now ≥ listing_at)──► LISTED   (terminal)
//! ```
//!
//! The state is never stored. It is derived from the block timestamp on every
//! check, so crossing `listing_at` lists the token without a transaction and
//! no later call can move it back.

use crate::errors::Error;
use crate::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    Unlisted,
    Listed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct TransferGate {
    listing_at: Timestamp,
}

impl TransferGate {
    pub fn new(listing_at: Timestamp) -> Self {
        Self { listing_at }
    }

    pub fn listing_at(&self) -> Timestamp {
        self.listing_at
    }

    pub fn state(&self, now: Timestamp) -> ListingState {
        if now >= self.listing_at {
            ListingState::Listed
        } else {
            ListingState::Unlisted
        }
    }

    /// `caller_may_pre_list` is whether the identity *initiating* the
    /// transfer (owner or spender) holds `AllowedPreListingTransfer`.
    pub fn check(&self, now: Timestamp, caller_may_pre_list: bool) -> Result<(), Error> {
        match self.state(now) {
            ListingState::Listed => Ok(()),
            ListingState::Unlisted if caller_may_pre_list => Ok(()),
            ListingState::Unlisted => Err(Error::TransferRestricted),
        }
    }

    /// Moves the listing time. Any value is accepted while unlisted, a past
    /// one included (which lists immediately). Returns the previous value.
    pub fn reschedule(&mut self, now: Timestamp, listing_at: Timestamp) -> Result<Timestamp, Error> {
        if self.state(now) == ListingState::Listed {
            return Err(Error::AlreadyListed);
        }
        let previous = self.listing_at;
        self.listing_at = listing_at;
        Ok(previous)
    }
}
