//! Concrete socket operations

use echo_primitives::{AccountId, AssetAmount, AssetId, ChainId, ObjectId};
use echo_types::{DynamicGlobalProperties, Operation, SignedTransaction};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{Api, SocketOperation};
use crate::SdkError;

fn decode_as<T: DeserializeOwned>(method: &str, result: Value) -> Result<T, SdkError> {
    serde_json::from_value(result).map_err(|e| SdkError::Decode(format!("{method}: {e}")))
}

/// Account object as returned by the database API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountObject {
    /// Account id
    pub id: AccountId,
    /// Account name
    pub name: String,
    /// Remaining fields, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authenticate on the login API
#[derive(Debug, Clone)]
pub struct Login {
    /// User name
    pub user: String,
    /// Password
    pub password: String,
}

impl SocketOperation for Login {
    type Output = bool;

    fn api(&self) -> Api {
        Api::Login
    }

    fn method(&self) -> &'static str {
        "login"
    }

    fn params(&self) -> Value {
        json!([self.user, self.password])
    }

    fn decode(&self, result: Value) -> Result<bool, SdkError> {
        decode_as(self.method(), result)
    }
}

/// Ask the login API for the id of another API
#[derive(Debug, Clone, Copy)]
pub struct AccessApi {
    /// API to access
    pub api: Api,
}

impl SocketOperation for AccessApi {
    type Output = u64;

    fn api(&self) -> Api {
        Api::Login
    }

    fn method(&self) -> &'static str {
        self.api.name()
    }

    fn params(&self) -> Value {
        json!([])
    }

    fn decode(&self, result: Value) -> Result<u64, SdkError> {
        decode_as(self.method(), result)
    }
}

/// `get_chain_id`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetChainId;

impl SocketOperation for GetChainId {
    type Output = ChainId;

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "get_chain_id"
    }

    fn params(&self) -> Value {
        json!([])
    }

    fn decode(&self, result: Value) -> Result<ChainId, SdkError> {
        decode_as(self.method(), result)
    }
}

/// `get_dynamic_global_properties`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetDynamicGlobalProperties;

impl SocketOperation for GetDynamicGlobalProperties {
    type Output = DynamicGlobalProperties;

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "get_dynamic_global_properties"
    }

    fn params(&self) -> Value {
        json!([])
    }

    fn decode(&self, result: Value) -> Result<DynamicGlobalProperties, SdkError> {
        decode_as(self.method(), result)
    }
}

/// `get_objects`; unknown ids come back as `null`.
///
/// Fetching an object also subscribes to it once a subscribe callback is set.
#[derive(Debug, Clone)]
pub struct GetObjects {
    /// Ids to fetch
    pub ids: Vec<ObjectId>,
}

impl SocketOperation for GetObjects {
    type Output = Vec<Value>;

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "get_objects"
    }

    fn params(&self) -> Value {
        json!([self.ids])
    }

    fn decode(&self, result: Value) -> Result<Vec<Value>, SdkError> {
        decode_as(self.method(), result)
    }
}

/// `get_account_by_name`
#[derive(Debug, Clone)]
pub struct GetAccountByName {
    /// Account name
    pub name: String,
}

impl SocketOperation for GetAccountByName {
    type Output = Option<AccountObject>;

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "get_account_by_name"
    }

    fn params(&self) -> Value {
        json!([self.name])
    }

    fn decode(&self, result: Value) -> Result<Option<AccountObject>, SdkError> {
        decode_as(self.method(), result)
    }
}

/// `get_full_accounts`; with `subscribe` the node pushes account updates
#[derive(Debug, Clone)]
pub struct GetFullAccounts {
    /// Names or ids
    pub names_or_ids: Vec<String>,
    /// Subscribe to updates of the returned accounts
    pub subscribe: bool,
}

impl SocketOperation for GetFullAccounts {
    type Output = Vec<(String, Value)>;

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "get_full_accounts"
    }

    fn params(&self) -> Value {
        json!([self.names_or_ids, self.subscribe])
    }

    fn decode(&self, result: Value) -> Result<Vec<(String, Value)>, SdkError> {
        decode_as(self.method(), result)
    }
}

/// `lookup_account_names`
#[derive(Debug, Clone)]
pub struct LookupAccountNames {
    /// Names to look up
    pub names: Vec<String>,
}

impl SocketOperation for LookupAccountNames {
    type Output = Vec<Option<AccountObject>>;

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "lookup_account_names"
    }

    fn params(&self) -> Value {
        json!([self.names])
    }

    fn decode(&self, result: Value) -> Result<Vec<Option<AccountObject>>, SdkError> {
        decode_as(self.method(), result)
    }
}

/// Contract operations quote their fee together with the caller's share
#[derive(Deserialize)]
#[serde(untagged)]
enum RequiredFee {
    Plain(AssetAmount),
    WithCallerShare { fee: AssetAmount },
}

/// `get_required_fees`, one fee per operation in order
#[derive(Debug, Clone)]
pub struct GetRequiredFees {
    /// Operations to quote
    pub operations: Vec<Operation>,
    /// Asset to pay in
    pub asset: AssetId,
}

impl SocketOperation for GetRequiredFees {
    type Output = Vec<AssetAmount>;

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "get_required_fees"
    }

    fn params(&self) -> Value {
        json!([self.operations, self.asset])
    }

    fn decode(&self, result: Value) -> Result<Vec<AssetAmount>, SdkError> {
        let fees: Vec<RequiredFee> = decode_as(self.method(), result)?;
        if fees.len() != self.operations.len() {
            return Err(SdkError::Decode(format!(
                "get_required_fees: expected {} fees, got {}",
                self.operations.len(),
                fees.len()
            )));
        }
        Ok(fees
            .into_iter()
            .map(|fee| match fee {
                RequiredFee::Plain(fee) | RequiredFee::WithCallerShare { fee } => fee,
            })
            .collect())
    }
}

/// `get_block`
#[derive(Debug, Clone, Copy)]
pub struct GetBlock {
    /// Block number
    pub number: u64,
}

impl SocketOperation for GetBlock {
    type Output = Option<Value>;

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "get_block"
    }

    fn params(&self) -> Value {
        json!([self.number])
    }

    fn decode(&self, result: Value) -> Result<Option<Value>, SdkError> {
        Ok(match result {
            Value::Null => None,
            block => Some(block),
        })
    }
}

/// `broadcast_transaction_with_callback`; the result arrives as a notice
/// under `callback_id`
#[derive(Debug, Clone)]
pub struct BroadcastTransactionWithCallback {
    /// Callback id of the result notice
    pub callback_id: u64,
    /// Signed transaction
    pub transaction: SignedTransaction,
}

impl SocketOperation for BroadcastTransactionWithCallback {
    type Output = ();

    fn api(&self) -> Api {
        Api::NetworkBroadcast
    }

    fn method(&self) -> &'static str {
        "broadcast_transaction_with_callback"
    }

    fn params(&self) -> Value {
        json!([self.callback_id, self.transaction])
    }

    fn decode(&self, _result: Value) -> Result<(), SdkError> {
        Ok(())
    }
}

/// `set_subscribe_callback`; object updates arrive as notices under `callback_id`
#[derive(Debug, Clone, Copy)]
pub struct SetSubscribeCallback {
    /// Callback id of the update notices
    pub callback_id: u64,
    /// Drop the node-side bloom filter of previously seen objects
    pub clear_filter: bool,
}

impl SocketOperation for SetSubscribeCallback {
    type Output = ();

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "set_subscribe_callback"
    }

    fn params(&self) -> Value {
        json!([self.callback_id, self.clear_filter])
    }

    fn decode(&self, _result: Value) -> Result<(), SdkError> {
        Ok(())
    }
}

/// `cancel_all_subscriptions`
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelAllSubscriptions;

impl SocketOperation for CancelAllSubscriptions {
    type Output = ();

    fn api(&self) -> Api {
        Api::Database
    }

    fn method(&self) -> &'static str {
        "cancel_all_subscriptions"
    }

    fn params(&self) -> Value {
        json!([])
    }

    fn decode(&self, _result: Value) -> Result<(), SdkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_types::operations::TransferOperation;

    #[test]
    fn test_params_are_pure() {
        let op = GetFullAccounts {
            names_or_ids: vec!["alice".to_string()],
            subscribe: true,
        };
        assert_eq!(op.params(), op.params());
        assert_eq!(op.params(), json!([["alice"], true]));
    }

    #[test]
    fn test_access_api_method_is_api_name() {
        let op = AccessApi { api: Api::NetworkBroadcast };
        assert_eq!(op.api(), Api::Login);
        assert_eq!(op.method(), "network_broadcast");
        assert_eq!(op.decode(json!(3)).unwrap(), 3);
    }

    #[test]
    fn test_null_result_is_decode_failure() {
        assert!(matches!(
            GetDynamicGlobalProperties.decode(Value::Null),
            Err(SdkError::Decode(_))
        ));
        assert!(GetChainId.decode(Value::Null).is_err());
    }

    #[test]
    fn test_chain_id_decode() {
        let hex = "ab".repeat(32);
        let id = GetChainId.decode(json!(hex)).unwrap();
        assert_eq!(id.as_bytes(), &[0xab; 32]);
    }

    #[test]
    fn test_account_by_name_null() {
        let op = GetAccountByName { name: "ghost".to_string() };
        assert_eq!(op.decode(Value::Null).unwrap(), None);
        let account = op
            .decode(json!({"id": "1.2.22", "name": "ghost", "active": {}}))
            .unwrap()
            .unwrap();
        assert_eq!(account.id, AccountId::account(22));
        assert!(account.extra.contains_key("active"));
    }

    #[test]
    fn test_required_fees_shapes() {
        let transfer: Operation = TransferOperation::new(
            AccountId::account(1),
            AccountId::account(2),
            AssetAmount::core(3),
        )
        .into();
        let op = GetRequiredFees {
            operations: vec![transfer.clone(), transfer],
            asset: ObjectId::CORE_ASSET,
        };
        let fees = op
            .decode(json!([
                {"amount": 20, "asset_id": "1.3.0"},
                {"fee": {"amount": "35", "asset_id": "1.3.0"}, "user_to_pay": {"amount": 5, "asset_id": "1.3.0"}}
            ]))
            .unwrap();
        assert_eq!(fees, vec![AssetAmount::core(20), AssetAmount::core(35)]);

        assert!(op.decode(json!([{"amount": 20, "asset_id": "1.3.0"}])).is_err());
    }

    #[test]
    fn test_required_fees_params() {
        let op = GetRequiredFees {
            operations: vec![],
            asset: ObjectId::asset(1),
        };
        assert_eq!(op.params(), json!([[], "1.3.1"]));
    }
}
