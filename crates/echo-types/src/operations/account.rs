//! Account lifecycle operations

use bytes::{BufMut, BytesMut};
use echo_codec::{encode_optional, Encode, Presence};
use echo_primitives::{AccountId, AssetAmount, PublicKey};
use serde::{Deserialize, Serialize};

use super::{ensure_text, operation_body, Validate};
use crate::{AccountOptions, Authority, Extensions, TypesError};

/// Longest account name the chain accepts
pub const MAX_ACCOUNT_NAME_LEN: usize = 63;

fn validate_account_name(name: &str) -> Result<(), TypesError> {
    if name.is_empty() || name.len() > MAX_ACCOUNT_NAME_LEN {
        return Err(TypesError::malformed(format!(
            "account name length {} out of range",
            name.len()
        )));
    }
    for label in name.split('.') {
        let valid = label.len() >= 2
            && label.starts_with(|c: char| c.is_ascii_lowercase())
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(TypesError::malformed(format!("invalid account name: {name}")));
        }
    }
    Ok(())
}

/// Register a new account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreateOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Account paying for the registration
    pub registrar: AccountId,
    /// Unique account name
    pub name: String,
    /// Active authority
    pub active: Authority,
    /// Key used for block production
    pub echorand_key: PublicKey,
    /// Voting and delegation options
    pub options: AccountOptions,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AccountCreateOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.registrar.encode_to(out);
        self.name.encode_to(out);
        self.active.encode_to(out);
        self.echorand_key.encode_to(out);
        self.options.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for AccountCreateOperation {
    fn validate(&self) -> Result<(), TypesError> {
        validate_account_name(&self.name)?;
        self.active.validate()?;
        self.options.validate()
    }
}

operation_body!(AccountCreateOperation => AccountCreate);

/// Change an account's authority, key or options.
///
/// At least one of the optional fields must be set; use
/// [`AccountUpdateOperation::builder`] to get that checked at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdateOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Account being updated
    pub account: AccountId,
    /// New active authority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<Authority>,
    /// New block production key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echorand_key: Option<PublicKey>,
    /// New options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_options: Option<AccountOptions>,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl AccountUpdateOperation {
    /// Start building an update of `account`
    pub fn builder(account: AccountId) -> AccountUpdateBuilder {
        AccountUpdateBuilder {
            account,
            active: None,
            echorand_key: None,
            new_options: None,
        }
    }
}

impl Encode for AccountUpdateOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.account.encode_to(out);
        encode_optional(out, self.active.as_ref(), Presence::Flagged);
        encode_optional(out, self.echorand_key.as_ref(), Presence::Flagged);
        encode_optional(out, self.new_options.as_ref(), Presence::Flagged);
        self.extensions.encode_to(out);
    }
}

impl Validate for AccountUpdateOperation {
    fn validate(&self) -> Result<(), TypesError> {
        if self.active.is_none() && self.echorand_key.is_none() && self.new_options.is_none() {
            return Err(TypesError::malformed(
                "account update changes neither authority, key nor options",
            ));
        }
        if let Some(active) = &self.active {
            active.validate()?;
        }
        if let Some(options) = &self.new_options {
            options.validate()?;
        }
        Ok(())
    }
}

operation_body!(AccountUpdateOperation => AccountUpdate);

/// Builder for [`AccountUpdateOperation`]
#[derive(Debug, Clone)]
pub struct AccountUpdateBuilder {
    account: AccountId,
    active: Option<Authority>,
    echorand_key: Option<PublicKey>,
    new_options: Option<AccountOptions>,
}

impl AccountUpdateBuilder {
    /// Replace the active authority
    pub fn active(mut self, authority: Authority) -> Self {
        self.active = Some(authority);
        self
    }

    /// Replace the block production key
    pub fn echorand_key(mut self, key: PublicKey) -> Self {
        self.echorand_key = Some(key);
        self
    }

    /// Replace the options
    pub fn options(mut self, options: AccountOptions) -> Self {
        self.new_options = Some(options);
        self
    }

    /// Build, rejecting an update that changes nothing
    pub fn build(self) -> Result<AccountUpdateOperation, TypesError> {
        let op = AccountUpdateOperation {
            fee: AssetAmount::default(),
            account: self.account,
            active: self.active,
            echorand_key: self.echorand_key,
            new_options: self.new_options,
            extensions: Extensions,
        };
        op.validate()?;
        Ok(op)
    }
}

/// Listing states of [`AccountWhitelistOperation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Listing {
    /// Remove from both lists
    NoListing = 0,
    /// Whitelisted
    WhiteListed = 1,
    /// Blacklisted
    BlackListed = 2,
    /// On both lists
    WhiteAndBlackListed = 3,
}

impl From<Listing> for u8 {
    fn from(listing: Listing) -> u8 {
        listing as u8
    }
}

impl TryFrom<u8> for Listing {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Listing::NoListing),
            1 => Ok(Listing::WhiteListed),
            2 => Ok(Listing::BlackListed),
            3 => Ok(Listing::WhiteAndBlackListed),
            other => Err(TypesError::malformed(format!("invalid listing {other}"))),
        }
    }
}

/// Whitelist or blacklist an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWhitelistOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Account maintaining the list
    pub authorizing_account: AccountId,
    /// Account being listed
    pub account_to_list: AccountId,
    /// New listing state
    pub new_listing: Listing,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AccountWhitelistOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.authorizing_account.encode_to(out);
        self.account_to_list.encode_to(out);
        out.put_u8(self.new_listing.into());
        self.extensions.encode_to(out);
    }
}

impl Validate for AccountWhitelistOperation {}

operation_body!(AccountWhitelistOperation => AccountWhitelist);

/// Create a labelled deposit address for an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAddressCreateOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Owner of the address
    pub owner: AccountId,
    /// Free-form label
    pub label: String,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AccountAddressCreateOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.owner.encode_to(out);
        self.label.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for AccountAddressCreateOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_text("label", &self.label)
    }
}

operation_body!(AccountAddressCreateOperation => AccountAddressCreate);
