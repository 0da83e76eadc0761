//! Property-based tests for request fingerprinting

use application::{KEY_PREFIX, fingerprint};
use domain::{ProcessingOptions, ProcessingRequest, ProcessingType};
use proptest::prelude::*;

fn processing_type() -> impl Strategy<Value = ProcessingType> {
    prop::sample::select(ProcessingType::ALL.to_vec())
}

fn options() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(("[a-zA-Z]{1,8}", any::<i64>()), 0..6)
}

fn build(kind: ProcessingType, content: &str, entries: &[(String, i64)]) -> ProcessingRequest {
    let options = entries
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::from(*v)))
        .collect::<ProcessingOptions>();
    ProcessingRequest::new(kind, content).with_options(options)
}

proptest! {
    #[test]
    fn fingerprint_is_deterministic(
        kind in processing_type(),
        content in ".{1,100}",
        entries in options()
    ) {
        let a = build(kind, &content, &entries);
        let b = build(kind, &content, &entries);
        prop_assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn fingerprint_ignores_option_order(
        kind in processing_type(),
        content in ".{1,100}",
        entries in prop::collection::btree_map("[a-zA-Z]{1,8}", any::<i64>(), 0..6)
    ) {
        let forward: Vec<_> = entries.clone().into_iter().collect();
        let reversed: Vec<_> = entries.into_iter().rev().collect();
        prop_assert_eq!(
            fingerprint(&build(kind, &content, &forward)),
            fingerprint(&build(kind, &content, &reversed))
        );
    }

    #[test]
    fn fingerprint_is_namespaced_by_type(
        kind in processing_type(),
        content in ".{1,100}"
    ) {
        let key = fingerprint(&ProcessingRequest::new(kind, content));
        let expected_prefix = format!("{KEY_PREFIX}:{kind}:");
        prop_assert!(key.starts_with(&expected_prefix));
        prop_assert_eq!(key.len(), expected_prefix.len() + 64);
    }

    #[test]
    fn distinct_types_never_share_a_key(
        a in processing_type(),
        b in processing_type(),
        content in ".{1,100}"
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            fingerprint(&ProcessingRequest::new(a, content.clone())),
            fingerprint(&ProcessingRequest::new(b, content))
        );
    }

    #[test]
    fn distinct_content_changes_the_key(
        kind in processing_type(),
        a in "[a-z]{1,30}",
        b in "[a-z]{1,30}"
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            fingerprint(&ProcessingRequest::new(kind, a)),
            fingerprint(&ProcessingRequest::new(kind, b))
        );
    }
}
