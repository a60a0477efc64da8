#![cfg(feature = "serde")]

mod common;

use blockdelta::{Delta, DeltaOp, Digest, Signature};
use common::{chunk_size, diff, reconstruct, sign};

#[test]
fn test_signature_serde() {
    let data = b"Hello, world! This is a test for serde serialization.";
    let sig = sign(data, chunk_size(8));

    let json = serde_json::to_string(&sig).unwrap();
    let deserialized: Signature = serde_json::from_str(&json).unwrap();

    assert_eq!(sig, deserialized);
}

#[test]
fn test_signature_serde_rejects_single_block() {
    let json = r#"{"chunk_size":4,"chunk_digests":[[1,2,3]]}"#;
    let err = serde_json::from_str::<Signature>(json).unwrap_err();

    assert!(err.to_string().contains("Insufficient data"));
}

#[test]
fn test_signature_serde_rejects_zero_chunk_size() {
    let json = r#"{"chunk_size":0,"chunk_digests":[[1],[2]]}"#;
    assert!(serde_json::from_str::<Signature>(json).is_err());
}

#[test]
fn test_digest_is_transparent() {
    let digest = Digest::from([1u8, 2, 3]);
    assert_eq!(serde_json::to_string(&digest).unwrap(), "[1,2,3]");
}

#[test]
fn test_delta_ops_serde() {
    let addition = DeltaOp::Addition {
        chunk_index: 3,
        data: vec![1, 2, 3, 4, 5],
    };
    let deletion = DeltaOp::Deletion { chunk_index: 42 };

    for op in [addition, deletion] {
        let json = serde_json::to_string(&op).unwrap();
        let deserialized: DeltaOp = serde_json::from_str(&json).unwrap();
        assert_eq!(op, deserialized);
    }
}

#[test]
fn test_roundtrip_with_serde() {
    let old_data = b"The quick brown fox jumps over the lazy dog.";
    let new_data = b"The quick brown fox leaps over the lazy cat.";
    let size = chunk_size(4);

    let sig = sign(old_data, size);
    let sig_json = serde_json::to_string(&sig).unwrap();
    let sig_restored: Signature = serde_json::from_str(&sig_json).unwrap();

    let delta = diff(&sig_restored, new_data);
    let delta_json = serde_json::to_string(&delta).unwrap();
    let delta_restored: Delta = serde_json::from_str(&delta_json).unwrap();

    assert_eq!(delta, delta_restored);
    assert_eq!(reconstruct(old_data, size, &delta_restored), new_data);
}
