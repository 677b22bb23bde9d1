// tests/crypto_tests.rs
mod common;

use common::{aarav, crypto_with};
use encrypted_record_vault::consts::TRAPDOOR_HEX_LEN;
use encrypted_record_vault::{normalize_term, CoreError, Record};

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let crypto = crypto_with(1, 2);
    let record = aarav().with_field("tags", serde_json::json!(["vip", 3, null]));

    let blob = crypto.encrypt_record(&record).unwrap();
    let decrypted = crypto.decrypt_record(&blob).unwrap();

    assert_eq!(decrypted, record);
}

#[test]
fn test_same_record_encrypts_to_different_blobs() {
    let crypto = crypto_with(1, 2);
    let record = aarav();

    let first = crypto.encrypt_record(&record).unwrap();
    let second = crypto.encrypt_record(&record).unwrap();

    assert_ne!(first, second);
    assert_eq!(crypto.decrypt_record(&first).unwrap(), record);
    assert_eq!(crypto.decrypt_record(&second).unwrap(), record);
}

#[test]
fn test_blob_does_not_contain_plaintext() {
    let crypto = crypto_with(1, 2);
    let blob = crypto.encrypt_record(&aarav()).unwrap();

    assert!(!blob.windows(5).any(|w| w == b"Aarav"));
    assert!(!blob.windows(5).any(|w| w == b"20001"));
}

#[test]
fn test_every_bit_flip_fails_authentication() {
    let crypto = crypto_with(1, 2);
    let blob = crypto
        .encrypt_record(&Record::new("id", "7").with_field("name", "Yash"))
        .unwrap();

    for byte in 0..blob.len() {
        for bit in 0..8 {
            let mut tampered = blob.clone();
            tampered[byte] ^= 1 << bit;
            let result = crypto.decrypt_record(&tampered);
            assert!(
                matches!(result, Err(CoreError::AuthenticationFailure)),
                "flip at byte {byte} bit {bit} was not rejected"
            );
        }
    }
}

#[test]
fn test_truncated_blob_fails_authentication() {
    let crypto = crypto_with(1, 2);
    let blob = crypto.encrypt_record(&aarav()).unwrap();

    for len in [0, 1, 25, blob.len() - 1] {
        assert!(matches!(
            crypto.decrypt_record(&blob[..len]),
            Err(CoreError::AuthenticationFailure)
        ));
    }
}

#[test]
fn test_trapdoor_ignores_case_and_surrounding_whitespace() {
    let crypto = crypto_with(1, 2);
    let expected = crypto.trapdoor("aarav").unwrap();

    for variant in ["Aarav", "AARAV", "  aarav", "aarav\t\n", " AaRaV "] {
        assert_eq!(crypto.trapdoor(variant).unwrap(), expected);
        assert_eq!(
            crypto.trapdoor(variant).unwrap(),
            crypto.trapdoor(&normalize_term(variant)).unwrap()
        );
    }
}

#[test]
fn test_trapdoor_is_deterministic_across_engines() {
    let a = crypto_with(1, 2);
    let b = crypto_with(1, 2);

    assert_eq!(a.trapdoor("sharma").unwrap(), b.trapdoor("sharma").unwrap());
    assert_eq!(a.trapdoor("sharma").unwrap().as_str().len(), TRAPDOOR_HEX_LEN);
}

#[test]
fn test_trapdoor_depends_on_salt_and_root() {
    let base = crypto_with(1, 2).trapdoor("sharma").unwrap();

    assert_ne!(crypto_with(1, 3).trapdoor("sharma").unwrap(), base);
    assert_ne!(crypto_with(9, 2).trapdoor("sharma").unwrap(), base);
}

#[test]
fn test_trapdoor_is_not_the_plain_term_hash() {
    let crypto = crypto_with(1, 2);
    let t = crypto.trapdoor("aarav").unwrap();

    assert!(!t.as_str().contains("aarav"));
    assert_ne!(
        crypto.trapdoor("aarav").unwrap(),
        crypto.trapdoor("aarav sharma").unwrap()
    );
}
