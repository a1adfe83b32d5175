// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sign / verify round trips for decryption permits

use ethers::signers::{LocalWallet, Signer as _};
use ethers::types::Address;
use fhevm_session::crypto::{
    build_domain, sign, typed_data_hash, verify, DecryptionPermit, EIP712_DOMAIN_NAME,
    EIP712_DOMAIN_VERSION,
};
use fhevm_session::FhevmError;

const CHAIN_ID: u64 = 11155111;

fn handle(byte: u8) -> String {
    format!("0x{}", hex::encode([byte; 32]))
}

fn contract() -> Address {
    Address::repeat_byte(0x42)
}

fn wallet() -> LocalWallet {
    LocalWallet::new(&mut rand::thread_rng())
}

#[tokio::test]
async fn test_sign_then_verify() {
    let wallet = wallet();
    let user = wallet.address();
    let domain = build_domain(CHAIN_ID, contract());

    let result = sign(&wallet, &domain, &handle(0xaa), user).await.unwrap();

    assert_eq!(result.signer, user);
    assert!(result.signature.starts_with("0x"));
    assert_eq!(result.signature.len(), 2 + 65 * 2);
    assert_eq!(
        result.message_hash,
        typed_data_hash(
            &domain,
            &DecryptionPermit::from_handle(&handle(0xaa), user).unwrap()
        )
    );
    assert!(verify(
        &result.signature,
        &domain,
        &handle(0xaa),
        user,
        &format!("{:?}", user)
    ));
}

#[tokio::test]
async fn test_domain_constants() {
    let domain = build_domain(CHAIN_ID, contract());
    assert_eq!(domain.name, EIP712_DOMAIN_NAME);
    assert_eq!(domain.name, "FhevmDecryption");
    assert_eq!(domain.version, EIP712_DOMAIN_VERSION);
    assert_eq!(domain.version, "1");
    assert_eq!(domain.chain_id, CHAIN_ID);
}

#[tokio::test]
async fn test_signature_is_bound_to_handle() {
    let wallet = wallet();
    let user = wallet.address();
    let domain = build_domain(CHAIN_ID, contract());

    let result = sign(&wallet, &domain, &handle(0x0a), user).await.unwrap();

    assert!(!verify(
        &result.signature,
        &domain,
        &handle(0x0b),
        user,
        &format!("{:?}", user)
    ));
}

#[tokio::test]
async fn test_signature_is_bound_to_domain_and_user() {
    let wallet = wallet();
    let user = wallet.address();
    let domain = build_domain(CHAIN_ID, contract());
    let result = sign(&wallet, &domain, &handle(1), user).await.unwrap();
    let expected = format!("{:?}", user);

    let other_chain = build_domain(31337, contract());
    assert!(!verify(&result.signature, &other_chain, &handle(1), user, &expected));

    let other_contract = build_domain(CHAIN_ID, Address::repeat_byte(0x43));
    assert!(!verify(&result.signature, &other_contract, &handle(1), user, &expected));

    let other_user = Address::repeat_byte(0x99);
    assert!(!verify(&result.signature, &domain, &handle(1), other_user, &expected));
}

#[tokio::test]
async fn test_verify_compares_case_insensitively() {
    let wallet = wallet();
    let user = wallet.address();
    let domain = build_domain(CHAIN_ID, contract());
    let result = sign(&wallet, &domain, &handle(2), user).await.unwrap();

    let upper = format!("0x{}", hex::encode(user.as_bytes()).to_uppercase());
    assert!(verify(&result.signature, &domain, &handle(2), user, &upper));
}

#[tokio::test]
async fn test_verify_rejects_other_signer() {
    let alice = wallet();
    let bob = wallet();
    let domain = build_domain(CHAIN_ID, contract());
    let result = sign(&alice, &domain, &handle(3), alice.address())
        .await
        .unwrap();

    assert!(!verify(
        &result.signature,
        &domain,
        &handle(3),
        alice.address(),
        &format!("{:?}", bob.address())
    ));
}

#[test]
fn test_verify_never_panics_on_garbage() {
    let domain = build_domain(CHAIN_ID, contract());
    let user = Address::repeat_byte(1);
    let expected = format!("{:?}", user);

    for signature in ["", "0x", "0x1234", "not hex", &format!("0x{}", "00".repeat(65))] {
        assert!(!verify(signature, &domain, &handle(4), user, &expected));
    }
    assert!(!verify(
        &format!("0x{}", "11".repeat(65)),
        &domain,
        "0xshort",
        user,
        &expected
    ));
}

#[tokio::test]
async fn test_sign_rejects_short_handle() {
    let wallet = wallet();
    let domain = build_domain(CHAIN_ID, contract());

    let err = sign(&wallet, &domain, "0x1234", wallet.address())
        .await
        .unwrap_err();
    assert!(matches!(err, FhevmError::Signature(_)));

    let err = sign(&wallet, &domain, &"ab".repeat(32), wallet.address())
        .await
        .unwrap_err();
    assert!(matches!(err, FhevmError::Signature(_)));
}
