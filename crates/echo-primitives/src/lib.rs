//! # echo-primitives
//!
//! Primitive types for the Echo SDK.
//!
//! This crate provides the fundamental identifiers and values every
//! operation is built from: chain object ids, asset amounts, public keys and
//! fixed-size hashes. Each type carries both its JSON form (serde) and its
//! binary wire form ([`echo_codec::Encode`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod asset_amount;
mod error;
mod hash;
mod object_id;
mod public_key;
pub mod serde_helpers;

pub use address::Address;
pub use asset_amount::AssetAmount;
pub use error::PrimitiveError;
pub use hash::{ChainId, H256};
pub use object_id::ObjectId;
pub use public_key::PublicKey;

/// Account object id (`1.2.x`)
pub type AccountId = ObjectId;

/// Asset object id (`1.3.x`)
pub type AssetId = ObjectId;

/// Contract object id (`1.9.x`)
pub type ContractId = ObjectId;
