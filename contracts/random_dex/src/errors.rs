// =============================================================================
// ERRORS
// =============================================================================

/// Every message is all-or-nothing: any of these aborts the whole call with
/// no state change and no events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    /// Caller lacks the role the message requires.
    Unauthorized,
    /// Transfer attempted before listing by a caller without
    /// `AllowedPreListingTransfer`.
    TransferRestricted,
    /// A normal fee side exceeds `maximum_numerator`.
    FeeCapExceeded,
    /// The listing timestamp has passed; it can no longer be rescheduled.
    AlreadyListed,
    /// Sender's RDX balance is insufficient.
    InsufficientBalance,
    /// Spender's allowance is insufficient.
    InsufficientAllowance,
    /// The fee accumulator is empty; nothing to claim.
    InsufficientClaimAmount,
    /// Constructor parameters are inconsistent (zero denominator).
    InvalidFeeConfig,
    /// The exchange router call reverted or reported a failed swap.
    ExchangeCallFailed,
    /// An arithmetic operation overflowed.
    Overflow,
}
