//! Option structs shared by account and asset operations

use bytes::{BufMut, BytesMut};
use echo_codec::{check_length, Encode};
use echo_primitives::serde_helpers::u64_from_number_or_string;
use echo_primitives::{AccountId, AssetAmount, AssetId, ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{Extensions, TypesError};

/// 100% in the chain's basis-point percentages
pub const PERCENT_100: u16 = 10_000;

/// Largest supply an asset may declare (2^62 - 1)
pub const MAX_SHARE_SUPPLY: u64 = (1 << 62) - 1;

/// Largest asset precision
pub const MAX_PRECISION: u8 = 12;

/// Account voting and delegation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOptions {
    /// Account that votes on this account's behalf
    pub voting_account: AccountId,
    /// Account receiving delegated stake
    pub delegating_account: AccountId,
    /// Share of rewards passed to the delegate, in basis points
    #[serde(default)]
    pub delegate_share: u16,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Default for AccountOptions {
    fn default() -> Self {
        // 1.2.5 is the chain's "proxy to self" account
        let proxy_to_self = AccountId::account(5);
        Self {
            voting_account: proxy_to_self,
            delegating_account: proxy_to_self,
            delegate_share: 0,
            extensions: Extensions,
        }
    }
}

impl AccountOptions {
    /// Reject out-of-range percentages
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.delegate_share > PERCENT_100 {
            return Err(TypesError::malformed(format!(
                "delegate_share {} exceeds {}",
                self.delegate_share, PERCENT_100
            )));
        }
        Ok(())
    }
}

impl Encode for AccountOptions {
    fn encode_to(&self, out: &mut BytesMut) {
        self.voting_account.encode_to(out);
        self.delegating_account.encode_to(out);
        out.put_u16_le(self.delegate_share);
        self.extensions.encode_to(out);
    }
}

/// Exchange rate between two assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Base side
    pub base: AssetAmount,
    /// Quote side
    pub quote: AssetAmount,
}

impl Price {
    /// 1:1 rate of the core asset against `asset`
    pub fn unit(asset: AssetId) -> Self {
        Self {
            base: AssetAmount::core(1),
            quote: AssetAmount::new(1, asset),
        }
    }

    /// Reject zero sides
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.base.is_zero() || self.quote.is_zero() {
            return Err(TypesError::malformed("price sides must be positive"));
        }
        Ok(())
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::unit(ObjectId::asset(1))
    }
}

impl Encode for Price {
    fn encode_to(&self, out: &mut BytesMut) {
        self.base.encode_to(out);
        self.quote.encode_to(out);
    }
}

/// Options common to every asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOptions {
    /// Maximum supply in the smallest unit
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub max_supply: u64,
    /// Permission bits the issuer may ever set
    #[serde(default)]
    pub issuer_permissions: u16,
    /// Currently active permission bits
    #[serde(default)]
    pub flags: u16,
    /// Rate used to pay fees in this asset
    pub core_exchange_rate: Price,
    /// Accounts allowed to whitelist holders
    #[serde(default)]
    pub whitelist_authorities: BTreeSet<AccountId>,
    /// Accounts allowed to blacklist holders
    #[serde(default)]
    pub blacklist_authorities: BTreeSet<AccountId>,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            max_supply: MAX_SHARE_SUPPLY,
            issuer_permissions: 0,
            flags: 0,
            core_exchange_rate: Price::default(),
            whitelist_authorities: BTreeSet::new(),
            blacklist_authorities: BTreeSet::new(),
            description: String::new(),
            extensions: Extensions,
        }
    }
}

impl AssetOptions {
    /// Check supply, flag and length constraints
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.max_supply == 0 || self.max_supply > MAX_SHARE_SUPPLY {
            return Err(TypesError::malformed(format!(
                "max_supply {} out of range",
                self.max_supply
            )));
        }
        if self.flags & !self.issuer_permissions != 0 {
            return Err(TypesError::malformed(
                "flags must be a subset of issuer_permissions",
            ));
        }
        self.core_exchange_rate.validate()?;
        check_length("whitelist_authorities", self.whitelist_authorities.len())?;
        check_length("blacklist_authorities", self.blacklist_authorities.len())?;
        check_length("description", self.description.len())?;
        Ok(())
    }
}

impl Encode for AssetOptions {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u64_le(self.max_supply);
        out.put_u16_le(self.issuer_permissions);
        out.put_u16_le(self.flags);
        self.core_exchange_rate.encode_to(out);
        self.whitelist_authorities.encode_to(out);
        self.blacklist_authorities.encode_to(out);
        self.description.encode_to(out);
        self.extensions.encode_to(out);
    }
}

/// Options of market-pegged assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitassetOptions {
    /// Lifetime of a price feed in seconds
    pub feed_lifetime_sec: u32,
    /// Feeds needed before a price is valid
    pub minimum_feeds: u8,
    /// Asset backing this one
    pub short_backing_asset: AssetId,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl BitassetOptions {
    /// Check feed parameters
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.minimum_feeds == 0 {
            return Err(TypesError::malformed("minimum_feeds must be positive"));
        }
        if self.feed_lifetime_sec == 0 {
            return Err(TypesError::malformed("feed_lifetime_sec must be positive"));
        }
        Ok(())
    }
}

impl Encode for BitassetOptions {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u32_le(self.feed_lifetime_sec);
        out.put_u8(self.minimum_feeds);
        self.short_backing_asset.encode_to(out);
        self.extensions.encode_to(out);
    }
}
