//! Asset amounts

use bytes::BytesMut;
use echo_codec::Encode;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::serde_helpers::u64_from_number_or_string;
use crate::{AssetId, ObjectId, PrimitiveError};

/// An amount of a specific asset.
///
/// Arithmetic is only defined between amounts of the same asset and wraps on
/// unsigned overflow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAmount {
    /// Amount in the asset's smallest unit
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub amount: u64,
    /// Asset id (`1.3.x`)
    pub asset_id: AssetId,
}

impl AssetAmount {
    /// Create a new amount
    pub const fn new(amount: u64, asset_id: AssetId) -> Self {
        Self { amount, asset_id }
    }

    /// Zero of the given asset
    pub const fn zero(asset_id: AssetId) -> Self {
        Self::new(0, asset_id)
    }

    /// Amount of the core asset
    pub const fn core(amount: u64) -> Self {
        Self::new(amount, ObjectId::CORE_ASSET)
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    fn ensure_same_asset(&self, other: &AssetAmount) -> Result<(), PrimitiveError> {
        if self.asset_id != other.asset_id {
            return Err(PrimitiveError::IncompatibleAssets {
                left: self.asset_id.to_string(),
                right: other.asset_id.to_string(),
            });
        }
        Ok(())
    }

    /// Add an amount of the same asset
    pub fn try_add(&self, other: &AssetAmount) -> Result<AssetAmount, PrimitiveError> {
        self.ensure_same_asset(other)?;
        Ok(Self::new(self.amount.wrapping_add(other.amount), self.asset_id))
    }

    /// Subtract an amount of the same asset
    pub fn try_sub(&self, other: &AssetAmount) -> Result<AssetAmount, PrimitiveError> {
        self.ensure_same_asset(other)?;
        Ok(Self::new(self.amount.wrapping_sub(other.amount), self.asset_id))
    }

    /// Scale by an integer factor
    pub fn multiply_by(&self, factor: u64) -> AssetAmount {
        Self::new(self.amount.wrapping_mul(factor), self.asset_id)
    }
}

impl Default for AssetAmount {
    fn default() -> Self {
        Self::zero(ObjectId::CORE_ASSET)
    }
}

impl fmt::Debug for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetAmount({} of {})", self.amount, self.asset_id)
    }
}

impl Encode for AssetAmount {
    fn encode_to(&self, out: &mut BytesMut) {
        self.amount.encode_to(out);
        self.asset_id.encode_to(out);
    }
}
