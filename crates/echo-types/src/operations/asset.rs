//! Asset management operations

use bytes::{BufMut, BytesMut};
use echo_codec::{encode_optional, Encode, Presence};
use echo_primitives::serde_helpers::u64_from_number_or_string;
use echo_primitives::{AccountId, AssetAmount, AssetId};
use serde::{Deserialize, Serialize};

use super::{ensure_positive, operation_body, Validate};
use crate::options::MAX_PRECISION;
use crate::{AssetOptions, BitassetOptions, Extensions, TypesError};

fn validate_symbol(symbol: &str) -> Result<(), TypesError> {
    let shape_ok = (3..=16).contains(&symbol.len())
        && symbol.starts_with(|c: char| c.is_ascii_uppercase())
        && !symbol.ends_with('.')
        && symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.')
        && symbol.matches('.').count() <= 1;
    if !shape_ok {
        return Err(TypesError::malformed(format!("invalid asset symbol: {symbol}")));
    }
    Ok(())
}

/// Create a new asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCreateOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Issuing account
    pub issuer: AccountId,
    /// Ticker symbol
    pub symbol: String,
    /// Decimal places
    pub precision: u8,
    /// Options shared by every asset
    pub common_options: AssetOptions,
    /// Present for market-pegged assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitasset_opts: Option<BitassetOptions>,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AssetCreateOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.issuer.encode_to(out);
        self.symbol.encode_to(out);
        out.put_u8(self.precision);
        self.common_options.encode_to(out);
        encode_optional(out, self.bitasset_opts.as_ref(), Presence::Flagged);
        self.extensions.encode_to(out);
    }
}

impl Validate for AssetCreateOperation {
    fn validate(&self) -> Result<(), TypesError> {
        validate_symbol(&self.symbol)?;
        if self.precision > MAX_PRECISION {
            return Err(TypesError::malformed(format!(
                "precision {} exceeds {}",
                self.precision, MAX_PRECISION
            )));
        }
        self.common_options.validate()?;
        if let Some(opts) = &self.bitasset_opts {
            opts.validate()?;
        }
        Ok(())
    }
}

operation_body!(AssetCreateOperation => AssetCreate);

/// Change an asset's issuer or options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUpdateOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Current issuer
    pub issuer: AccountId,
    /// Asset being changed
    pub asset_to_update: AssetId,
    /// Transfer issuer rights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_issuer: Option<AccountId>,
    /// Replacement options
    pub new_options: AssetOptions,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AssetUpdateOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.issuer.encode_to(out);
        self.asset_to_update.encode_to(out);
        encode_optional(out, self.new_issuer.as_ref(), Presence::Flagged);
        self.new_options.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for AssetUpdateOperation {
    fn validate(&self) -> Result<(), TypesError> {
        if self.new_issuer == Some(self.issuer) {
            return Err(TypesError::malformed("new issuer equals current issuer"));
        }
        self.new_options.validate()
    }
}

operation_body!(AssetUpdateOperation => AssetUpdate);

/// Issue new supply to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIssueOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Issuer of the asset
    pub issuer: AccountId,
    /// Amount issued
    pub asset_to_issue: AssetAmount,
    /// Receiving account
    pub issue_to_account: AccountId,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AssetIssueOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.issuer.encode_to(out);
        self.asset_to_issue.encode_to(out);
        self.issue_to_account.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for AssetIssueOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("asset_to_issue", &self.asset_to_issue)
    }
}

operation_body!(AssetIssueOperation => AssetIssue);

/// Burn supply held by the payer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReserveOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Holder burning the amount
    pub payer: AccountId,
    /// Amount burned
    pub amount_to_reserve: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AssetReserveOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.payer.encode_to(out);
        self.amount_to_reserve.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for AssetReserveOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("amount_to_reserve", &self.amount_to_reserve)
    }
}

operation_body!(AssetReserveOperation => AssetReserve);

/// Top up an asset's fee pool with core asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFundFeePoolOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Funding account
    pub from_account: AccountId,
    /// Asset whose pool is funded
    pub asset_id: AssetId,
    /// Core asset amount
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub amount: u64,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AssetFundFeePoolOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.from_account.encode_to(out);
        self.asset_id.encode_to(out);
        out.put_u64_le(self.amount);
        self.extensions.encode_to(out);
    }
}

impl Validate for AssetFundFeePoolOperation {
    fn validate(&self) -> Result<(), TypesError> {
        if self.amount == 0 {
            return Err(TypesError::malformed("amount must be positive"));
        }
        Ok(())
    }
}

operation_body!(AssetFundFeePoolOperation => AssetFundFeePool);

/// Withdraw accumulated fees to the issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetClaimFeesOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Issuer of the asset
    pub issuer: AccountId,
    /// Amount claimed
    pub amount_to_claim: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for AssetClaimFeesOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.issuer.encode_to(out);
        self.amount_to_claim.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for AssetClaimFeesOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("amount_to_claim", &self.amount_to_claim)
    }
}

operation_body!(AssetClaimFeesOperation => AssetClaimFees);

#[cfg(test)]
mod tests {
    use super::*;
    use echo_primitives::ObjectId;

    fn create(symbol: &str, precision: u8) -> AssetCreateOperation {
        AssetCreateOperation {
            fee: AssetAmount::default(),
            issuer: AccountId::account(10),
            symbol: symbol.to_string(),
            precision,
            common_options: AssetOptions::default(),
            bitasset_opts: None,
            extensions: Extensions,
        }
    }

    #[test]
    fn test_symbol_shape() {
        assert!(create("GOLD", 4).validate().is_ok());
        assert!(create("GO.LD", 4).validate().is_ok());
        assert!(create("GO", 4).validate().is_err());
        assert!(create("gold", 4).validate().is_err());
        assert!(create("1GOLD", 4).validate().is_err());
        assert!(create("GOLD.", 4).validate().is_err());
    }

    #[test]
    fn test_precision_limit() {
        assert!(create("GOLD", 12).validate().is_ok());
        assert!(matches!(
            create("GOLD", 13).validate(),
            Err(TypesError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_bitasset_presence_flag() {
        let plain = create("GOLD", 4).encode();
        let mut pegged = create("GOLD", 4);
        pegged.bitasset_opts = Some(BitassetOptions {
            feed_lifetime_sec: 86_400,
            minimum_feeds: 1,
            short_backing_asset: ObjectId::CORE_ASSET,
            extensions: Extensions,
        });
        let pegged = pegged.encode();
        // flag(1) + lifetime(4) + feeds(1) + backing(8) + ext(1)
        assert_eq!(pegged.len(), plain.len() + 15);
        assert_eq!(plain[plain.len() - 2], 0);
    }

    #[test]
    fn test_update_rejects_same_issuer() {
        let op = AssetUpdateOperation {
            fee: AssetAmount::default(),
            issuer: AccountId::account(10),
            asset_to_update: ObjectId::asset(1),
            new_issuer: Some(AccountId::account(10)),
            new_options: AssetOptions::default(),
            extensions: Extensions,
        };
        assert!(op.validate().is_err());
    }
}
