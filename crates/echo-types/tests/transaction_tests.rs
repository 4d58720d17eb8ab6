//! Transaction assembly tests for echo-types
//!
//! Tests the signing payload layout, fee handling and signing.

use echo_codec::Encode;
use echo_crypto::{decode_wif, derive_public_key, verify, Secp256k1Provider};
use echo_primitives::{AccountId, AssetAmount, ChainId, ObjectId};
use echo_types::operations::TransferOperation;
use echo_types::{BlockData, Operation, Transaction, TxBuilder, TypesError};

const WIF: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";

fn sample_transfer() -> TransferOperation {
    TransferOperation::new(
        "1.2.100".parse().unwrap(),
        "1.2.200".parse().unwrap(),
        AssetAmount::new(500, "1.3.0".parse().unwrap()),
    )
}

fn sample_tx() -> Transaction {
    Transaction::new(
        BlockData::new(4464, 0xd4c3b2a1, 1_546_300_840),
        vec![sample_transfer().into()],
        ChainId::from_bytes([0xab; 32]),
    )
    .unwrap()
}

// ==================== Operation Encoding Tests ====================

#[test]
fn test_transfer_encoding_vector() {
    let mut op = sample_transfer();
    op.fee = AssetAmount::core(100);

    let mut expected = Vec::new();
    expected.extend_from_slice(&100u64.to_le_bytes()); // fee amount
    expected.extend_from_slice(&0u64.to_le_bytes()); // fee asset 1.3.0
    expected.extend_from_slice(&100u64.to_le_bytes()); // from 1.2.100
    expected.extend_from_slice(&200u64.to_le_bytes()); // to 1.2.200
    expected.extend_from_slice(&500u64.to_le_bytes()); // amount
    expected.extend_from_slice(&0u64.to_le_bytes()); // amount asset 1.3.0
    expected.push(0); // extensions

    assert_eq!(op.encode(), expected);
    assert_eq!(
        op.encode(),
        [
            op.fee.encode(),
            op.from.encode(),
            op.to.encode(),
            op.amount.encode(),
            vec![0]
        ]
        .concat()
    );
}

// ==================== Signing Payload Tests ====================

#[test]
fn test_signing_bytes_layout() {
    let mut tx = sample_tx();
    tx.set_fees(&[AssetAmount::core(100)]).unwrap();
    let bytes = tx.signing_bytes().unwrap();

    assert_eq!(&bytes[..32], &[0xab; 32]);
    assert_eq!(&bytes[32..34], &4464u16.to_le_bytes());
    assert_eq!(&bytes[34..38], &0xd4c3b2a1u32.to_le_bytes());
    assert_eq!(&bytes[38..42], &1_546_300_840u32.to_le_bytes());
    assert_eq!(bytes[42], 1); // operation count
    assert_eq!(bytes[43], 0); // transfer tag
    assert_eq!(&bytes[44..bytes.len() - 1], tx.operations()[0].encode().as_slice());
    assert_eq!(bytes[bytes.len() - 1], 0); // extensions
}

#[test]
fn test_signing_bytes_deterministic() {
    let mut tx = sample_tx();
    tx.set_fees(&[AssetAmount::core(100)]).unwrap();
    let first = tx.signing_bytes().unwrap();
    let second = tx.signing_bytes().unwrap();
    assert_eq!(first, second);
    assert_eq!(tx.digest().unwrap(), tx.digest().unwrap());
}

#[test]
fn test_signing_bytes_before_fees() {
    let tx = sample_tx();
    assert_eq!(tx.signing_bytes(), Err(TypesError::FeesNotSet));
}

#[test]
fn test_fee_count_mismatch() {
    let mut tx = sample_tx();
    let err = tx
        .set_fees(&[AssetAmount::core(1), AssetAmount::core(2)])
        .unwrap_err();
    assert_eq!(err, TypesError::FeeCountMismatch { expected: 1, got: 2 });
    assert!(!tx.fees_set());
}

#[test]
fn test_fees_assigned_positionally() {
    let mut tx = sample_tx();
    tx.push_operation(TransferOperation::new(
        AccountId::account(1),
        AccountId::account(2),
        AssetAmount::core(7),
    ))
    .unwrap();
    let fee_asset = ObjectId::asset(1);
    tx.set_fees(&[AssetAmount::core(10), AssetAmount::new(20, fee_asset)])
        .unwrap();
    assert_eq!(tx.operations()[0].fee(), &AssetAmount::core(10));
    assert_eq!(tx.operations()[1].fee(), &AssetAmount::new(20, fee_asset));
}

#[test]
fn test_invalid_operation_blocks_signing() {
    let zero = TransferOperation::new(
        AccountId::account(1),
        AccountId::account(2),
        AssetAmount::core(0),
    );
    let mut tx = Transaction::new(BlockData::default(), vec![zero.into()], ChainId::ZERO).unwrap();
    tx.set_fees(&[AssetAmount::core(1)]).unwrap();
    assert!(matches!(tx.signing_bytes(), Err(TypesError::MalformedInput(_))));
}

// ==================== Signing Tests ====================

#[test]
fn test_sign_verifies_against_payload() {
    let key = decode_wif(WIF).unwrap();
    let public_key = derive_public_key(&key).unwrap();

    let mut tx = sample_tx();
    tx.set_fees(&[AssetAmount::core(100)]).unwrap();
    tx.add_signing_key(key);

    let signed = tx.sign(&Secp256k1Provider).unwrap();
    assert_eq!(signed.signatures.len(), 1);
    assert!(verify(&tx.signing_bytes().unwrap(), &signed.signatures[0], &public_key).unwrap());
    assert_eq!(signed.expiration, "2019-01-01T00:00:40");
    assert_eq!(signed.ref_block_num, 4464);
}

#[test]
fn test_multi_signature_keeps_duplicates() {
    let key = decode_wif(WIF).unwrap();
    let mut tx = sample_tx();
    tx.set_fees(&[AssetAmount::core(100)]).unwrap();
    tx.add_signing_key(key.clone());
    tx.add_signing_key(key);
    assert_eq!(tx.signing_key_count(), 2);

    let signed = tx.sign(&Secp256k1Provider).unwrap();
    assert_eq!(signed.signatures.len(), 2);
    assert_eq!(signed.signatures[0], signed.signatures[1]);
}

#[test]
fn test_signed_transaction_json() {
    let key = decode_wif(WIF).unwrap();
    let tx = TxBuilder::new()
        .chain_id(ChainId::ZERO)
        .block_data(BlockData::new(1, 2, 1_546_300_800))
        .operation(sample_transfer())
        .fees(vec![AssetAmount::core(100)])
        .signing_key(key)
        .build()
        .unwrap();
    let signed = tx.sign(&Secp256k1Provider).unwrap();

    let json = serde_json::to_value(&signed).unwrap();
    assert_eq!(json["ref_block_num"], 1);
    assert_eq!(json["ref_block_prefix"], 2);
    assert_eq!(json["expiration"], "2019-01-01T00:00:00");
    assert_eq!(json["operations"][0][0], 0);
    assert_eq!(json["operations"][0][1]["from"], "1.2.100");
    assert_eq!(json["extensions"], serde_json::json!([]));
    assert_eq!(json["signatures"][0].as_str().unwrap().len(), 130);

    let back: echo_types::SignedTransaction = serde_json::from_value(json).unwrap();
    assert_eq!(back, signed);
    assert!(matches!(back.operations[0], Operation::Transfer(_)));
}
