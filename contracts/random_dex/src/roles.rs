//! Capability registry: role tag → holder set.
//!
//! Roles never imply one another. `Admin` administers every role, itself
//! included, but holding it does not satisfy a `Minter`, `Burner` or any
//! other check; each role is granted explicitly.

use ink::primitives::AccountId;
use ink::storage::Mapping;

use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Role {
    /// Grants/revokes roles, tunes fees, reschedules listing, claims fees.
    Admin,
    /// May mint new supply.
    Minter,
    /// May burn from any account.
    Burner,
    /// May initiate transfers before the listing timestamp.
    AllowedPreListingTransfer,
    /// Automated-market address (pool/router); transfers touching it pay fees.
    MarketParticipant,
}

#[ink::storage_item]
#[derive(Debug)]
pub struct RoleRegistry {
    members: Mapping<(Role, AccountId), bool>,
}

impl RoleRegistry {
    /// Registry with `admin` as the only member of `Role::Admin`.
    pub fn with_admin(admin: AccountId) -> Self {
        let mut members = Mapping::default();
        members.insert((Role::Admin, admin), &true);
        Self { members }
    }

    pub fn has(&self, role: Role, account: AccountId) -> bool {
        self.members.get((role, account)).unwrap_or(false)
    }

    /// The single capability check every privileged message starts with.
    pub fn ensure(&self, role: Role, account: AccountId) -> Result<(), Error> {
        if !self.has(role, account) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    /// Adds `account` to `role`. Returns `true` if membership changed.
    pub fn grant(&mut self, caller: AccountId, role: Role, account: AccountId) -> Result<bool, Error> {
        self.ensure(Role::Admin, caller)?;
        if self.has(role, account) {
            return Ok(false);
        }
        self.members.insert((role, account), &true);
        Ok(true)
    }

    /// Removes `account` from `role`. Returns `true` if membership changed.
    pub fn revoke(&mut self, caller: AccountId, role: Role, account: AccountId) -> Result<bool, Error> {
        self.ensure(Role::Admin, caller)?;
        Ok(self.remove(role, account))
    }

    /// Drops the caller's own membership; needs no admin rights.
    pub fn renounce(&mut self, caller: AccountId, role: Role) -> bool {
        self.remove(role, caller)
    }

    fn remove(&mut self, role: Role, account: AccountId) -> bool {
        if !self.has(role, account) {
            return false;
        }
        self.members.remove((role, account));
        true
    }
}
