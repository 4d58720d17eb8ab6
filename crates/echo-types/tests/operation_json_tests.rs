//! Operation JSON contract tests for echo-types

use echo_codec::Encode;
use echo_primitives::{AccountId, AssetAmount};
use echo_types::operations::{AccountUpdateOperation, TransferOperation};
use echo_types::{AccountOptions, Operation, OperationKind, TypesError};
use serde_json::json;

// ==================== Decode Tests ====================

#[test]
fn test_decode_tagged_transfer() {
    let raw = json!([0, {
        "fee": {"amount": "20", "asset_id": "1.3.0"},
        "from": "1.2.100",
        "to": "1.2.200",
        "amount": {"amount": 500, "asset_id": "1.3.0"},
        "extensions": []
    }]);
    let op: Operation = serde_json::from_value(raw).unwrap();
    assert_eq!(op.kind(), OperationKind::Transfer);
    assert_eq!(op.fee(), &AssetAmount::core(20));
    match op {
        Operation::Transfer(t) => assert_eq!(t.to, AccountId::account(200)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_decode_block_reward() {
    let raw = json!([29, {"receiver": "1.2.6", "amount": "150000"}]);
    let op: Operation = serde_json::from_value(raw).unwrap();
    assert_eq!(op.kind(), OperationKind::BlockReward);
}

#[test]
fn test_decode_unknown_tag() {
    let raw = json!([77, {}]);
    let err = serde_json::from_value::<Operation>(raw).unwrap_err();
    assert!(err.to_string().contains("unknown operation tag"));
    assert_eq!(
        Operation::from_tagged_json(77, json!({})),
        Err(TypesError::UnknownOperation(77))
    );
}

#[test]
fn test_decode_wrong_body_shape() {
    let raw = json!([0, {"from": "1.2.1"}]);
    assert!(serde_json::from_value::<Operation>(raw).is_err());
}

// ==================== Round Trip Tests ====================

#[test]
fn test_json_round_trip_preserves_encoding() {
    let update = AccountUpdateOperation::builder(AccountId::account(44))
        .options(AccountOptions::default())
        .build()
        .unwrap();
    let ops: Vec<Operation> = vec![
        TransferOperation::new(AccountId::account(1), AccountId::account(2), AssetAmount::core(3)).into(),
        update.into(),
    ];
    for op in ops {
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json[0], op.kind().tag());
        let back: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(back.encode(), op.encode());
        assert_eq!(back, op);
    }
}
